pub mod local;
pub mod rest;

use async_trait::async_trait;

use crate::core::filter::StatusFilter;
use crate::core::task::{NewTask, Task, TaskId};
use crate::error::Result;

pub use local::{FileStore, KeyValueStore, LocalGateway, MemoryStore};
pub use rest::{RestConfig, RestGateway};

/// Backend the controller keeps its task list in sync with.
///
/// Every call may fail; the backend owns ids, ordering and the rule that
/// completed or cancelled tasks cannot have their text changed.
#[async_trait]
pub trait SyncGateway: Send + Sync {
    /// Tasks matching `filter`, in the backend's order.
    async fn list(&self, filter: StatusFilter) -> Result<Vec<Task>>;

    /// Store a new task and return it with its assigned id.
    async fn create(&self, task: NewTask) -> Result<Task>;

    /// Overwrite the task with `id` and return the stored record.
    async fn update(&self, id: &TaskId, task: Task) -> Result<Task>;

    async fn delete(&self, id: &TaskId) -> Result<()>;
}
