use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-assigned task identifier. The REST API hands out integers, the
/// local store hands out UUID strings; both round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Number(u64),
    Text(String),
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for TaskId {
    fn from(n: u64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Created,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" => Some(Self::Created),
            "completed" => Some(Self::Completed),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Completed and cancelled tasks can no longer have their text edited.
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Status a task moves to when its checkbox is toggled.
    pub fn toggled(&self) -> Self {
        match self {
            Self::Created => Self::Completed,
            Self::Completed | Self::Cancelled => Self::Created,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub task: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn with_status(&self, status: TaskStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            task: text.into(),
            ..self.clone()
        }
    }
}

/// Body of a create request; the backend fills in the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub task: String,
    pub description: String,
    pub status: TaskStatus,
}

impl NewTask {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            task: text.into(),
            description: String::new(),
            status: TaskStatus::Created,
        }
    }

    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            task: self.task,
            description: self.description,
            status: self.status,
        }
    }
}
