use std::fmt;
use std::str::FromStr;

use super::task::TaskStatus;

/// Which statuses a load asks the backend for. Applied server-side; the
/// controller never filters a loaded list itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    /// Value of the `status` query parameter, empty for no filter.
    pub fn as_query(&self) -> &'static str {
        match self {
            Self::All => "",
            Self::Only(status) => status.as_str(),
        }
    }

    pub fn matches(&self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

impl From<TaskStatus> for StatusFilter {
    fn from(status: TaskStatus) -> Self {
        Self::Only(status)
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        TaskStatus::parse(trimmed)
            .map(Self::Only)
            .ok_or_else(|| format!("unknown status filter '{}'", s))
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => write!(f, "{}", status),
        }
    }
}
