use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex as StdMutex;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::SyncGateway;
use crate::core::filter::StatusFilter;
use crate::core::task::{NewTask, Task, TaskId};
use crate::error::{Error, Result};

/// Key the task list is stored under.
pub const TASKS_KEY: &str = "tasks";

/// String key-value storage the local gateway persists into.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: StdMutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Backend used when no task API is available. Keeps the full list in memory
/// and writes it back as a JSON array after every change.
pub struct LocalGateway<S: KeyValueStore> {
    store: S,
    tasks: Mutex<Vec<Task>>,
}

impl<S: KeyValueStore> LocalGateway<S> {
    /// Missing or unreadable data starts an empty list.
    pub fn open(store: S) -> Self {
        let tasks = load_tasks(&store);
        log::info!("Local task store opened with {} tasks", tasks.len());
        Self {
            store,
            tasks: Mutex::new(tasks),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks)?;
        self.store.set(TASKS_KEY, &json).map_err(|e| {
            log::error!("Failed to save tasks: {}", e);
            e
        })
    }
}

fn load_tasks(store: &impl KeyValueStore) -> Vec<Task> {
    match store.get(TASKS_KEY) {
        Ok(Some(content)) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable saved tasks: {}", e);
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            log::warn!("Failed to read saved tasks: {}", e);
            Vec::new()
        }
    }
}

#[async_trait]
impl<S: KeyValueStore> SyncGateway for LocalGateway<S> {
    async fn list(&self, filter: StatusFilter) -> Result<Vec<Task>> {
        let tasks = self.tasks.lock().await;
        Ok(tasks
            .iter()
            .filter(|t| filter.matches(t.status))
            .cloned()
            .collect())
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        if task.task.trim().is_empty() {
            return Err(Error::Validation("Task text is required".into()));
        }

        let mut tasks = self.tasks.lock().await;
        let created = task.into_task(TaskId::Text(Uuid::new_v4().to_string()));

        let mut next = tasks.clone();
        next.push(created.clone());
        self.save(&next)?;
        *tasks = next;

        log::debug!("Stored new local task {}", created.id);
        Ok(created)
    }

    async fn update(&self, id: &TaskId, task: Task) -> Result<Task> {
        let mut tasks = self.tasks.lock().await;
        let index = tasks
            .iter()
            .position(|t| t.id == *id)
            .ok_or_else(|| Error::NotFound(id.clone()))?;

        let current = &tasks[index];
        if current.status.is_locked() && current.task != task.task {
            return Err(Error::BusinessRule(format!(
                "Cannot edit a {} task",
                current.status.as_str().to_lowercase()
            )));
        }

        let stored = Task {
            id: id.clone(),
            ..task
        };
        let mut next = tasks.clone();
        next[index] = stored.clone();
        self.save(&next)?;
        *tasks = next;

        Ok(stored)
    }

    async fn delete(&self, id: &TaskId) -> Result<()> {
        let mut tasks = self.tasks.lock().await;
        let index = tasks
            .iter()
            .position(|t| t.id == *id)
            .ok_or_else(|| Error::NotFound(id.clone()))?;

        let mut next = tasks.clone();
        next.remove(index);
        self.save(&next)?;
        *tasks = next;

        Ok(())
    }
}
