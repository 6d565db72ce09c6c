pub mod config;
pub mod controller;
pub mod core;
pub mod error;
pub mod logging;
pub mod message;
pub mod notify;
pub mod sync;

use std::sync::atomic::{AtomicBool, Ordering};

pub use controller::{ControllerOptions, TaskListController};
pub use crate::core::filter::StatusFilter;
pub use crate::core::summary::Summary;
pub use crate::core::task::{NewTask, Task, TaskId, TaskStatus};
pub use error::{Error, Result};
pub use message::Message;
pub use notify::{NoticeKind, NotificationSink};
pub use sync::SyncGateway;

/// Whether debug logging is active, shared between the logger filter and the config flag.
static DEBUG_LOGGING: AtomicBool = AtomicBool::new(false);

pub fn set_debug_logging(enabled: bool) {
    DEBUG_LOGGING.store(enabled, Ordering::Relaxed);
}

pub fn debug_logging() -> bool {
    DEBUG_LOGGING.load(Ordering::Relaxed)
}
