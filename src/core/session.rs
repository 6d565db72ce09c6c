use super::task::TaskId;

/// In-progress text edit of a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub index: usize,
    pub id: TaskId,
    pub draft: String,
}

/// A delete waiting for the user to confirm it. Remembers the id so a reload
/// in between cannot redirect the delete to another task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub index: usize,
    pub id: TaskId,
}
