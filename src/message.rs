use crate::core::filter::StatusFilter;

/// User actions on the task list. Positions index the currently loaded list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Loading
    Load(StatusFilter),
    SetFilter(StatusFilter),

    // Task CRUD
    AddTask(String),
    ToggleTask(usize),
    CancelTask(usize),

    // Delete with inline confirmation
    RequestDelete(usize),
    ConfirmDelete(usize),
    CancelDeleteRequest,

    // Editing
    StartEdit(usize),
    UpdateDraft(String),
    SaveEdit(usize),
    CancelEdit,
}
