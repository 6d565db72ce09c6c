use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::filter::StatusFilter;
use crate::core::session::{DeleteRequest, EditSession};
use crate::core::store::TaskStore;
use crate::core::summary::Summary;
use crate::core::task::{NewTask, Task, TaskStatus};
use crate::error::{Error, Result};
use crate::message::Message;
use crate::notify::{NoticeKind, NotificationSink};
use crate::sync::SyncGateway;

pub const LOCKED_EDIT_MESSAGE: &str = "Completed or cancelled tasks cannot be edited";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Discard a list response when a newer load was started after it.
    /// Off by default: the last response to arrive wins.
    pub sequence_loads: bool,
}

#[derive(Debug, Default)]
struct State {
    store: TaskStore,
    input: String,
    edit: Option<EditSession>,
    pending_delete: Option<DeleteRequest>,
    load_seq: u64,
}

impl State {
    /// Point the edit session at wherever its task now sits, or end it when the
    /// task is gone.
    fn reconcile_edit(&mut self) {
        let Some(session) = self.edit.as_mut() else {
            return;
        };
        if self.store.get(session.index).is_some_and(|t| t.id == session.id) {
            return;
        }
        match self.store.position(&session.id) {
            Some(index) => session.index = index,
            None => {
                log::debug!("Task {} left the list, ending edit", session.id);
                self.edit = None;
            }
        }
    }
}

/// Owns the task list and keeps it in step with a [`SyncGateway`].
///
/// Operations take `&self` and never hold the state lock across a gateway
/// call, so reads and other actions proceed while a request is in flight.
/// Requests are not serialized against each other.
pub struct TaskListController {
    gateway: Arc<dyn SyncGateway>,
    notifier: Arc<dyn NotificationSink>,
    options: ControllerOptions,
    state: Mutex<State>,
}

impl TaskListController {
    pub fn new(gateway: Arc<dyn SyncGateway>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            gateway,
            notifier,
            options: ControllerOptions::default(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_options(mut self, options: ControllerOptions) -> Self {
        self.options = options;
        self
    }

    /// Initial load with the current filter.
    pub async fn mount(&self) -> Result<()> {
        let filter = self.filter().await;
        self.load(filter).await
    }

    pub async fn load(&self, filter: StatusFilter) -> Result<()> {
        let seq = {
            let mut state = self.state.lock().await;
            // The filter switches before the fetch; a failed load leaves the
            // new filter over the previous list.
            state.store.set_filter(filter);
            state.load_seq += 1;
            state.load_seq
        };

        match self.gateway.list(filter).await {
            Ok(tasks) => {
                let mut state = self.state.lock().await;
                if self.options.sequence_loads && seq != state.load_seq {
                    log::debug!(
                        "Discarding stale task list (request {} of {})",
                        seq,
                        state.load_seq
                    );
                    return Ok(());
                }
                log::debug!("Loaded {} tasks (filter: {})", tasks.len(), filter);
                state.store.replace_all(tasks);
                state.reconcile_edit();
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load tasks: {}", e);
                self.notify(&format!("Failed to load tasks: {}", e), NoticeKind::Error);
                Err(e)
            }
        }
    }

    pub async fn set_filter(&self, filter: StatusFilter) -> Result<()> {
        self.load(filter).await
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        self.state.lock().await.input = text.into();
    }

    /// Create a task from `text`. The text stays in the input until the create
    /// succeeds; the list is then reloaded rather than patched locally.
    pub async fn add_task(&self, text: impl Into<String>) -> Result<Task> {
        let text = text.into();
        let trimmed = text.trim().to_string();
        self.set_input(text).await;

        if trimmed.is_empty() {
            return Err(self.warn("Please enter a task"));
        }

        let created = match self.gateway.create(NewTask::new(trimmed)).await {
            Ok(task) => task,
            Err(e) => {
                log::error!("Failed to add task: {}", e);
                self.notify(&format!("Failed to add task: {}", e), NoticeKind::Error);
                return Err(e);
            }
        };

        let filter = {
            let mut state = self.state.lock().await;
            state.input.clear();
            state.store.filter()
        };
        self.notify("Task added", NoticeKind::Success);

        // load() reports its own failure; the create itself went through
        if let Err(e) = self.load(filter).await {
            log::debug!("Reload after create failed: {}", e);
        }
        Ok(created)
    }

    pub async fn submit_input(&self) -> Result<Task> {
        let input = self.input().await;
        self.add_task(input).await
    }

    /// Completed goes back to Created, everything else flips the other way.
    pub async fn toggle_task(&self, index: usize) -> Result<Task> {
        let task = self.task_at(index).await?;
        let next = task.status.toggled();
        self.update_status(task, next, None).await
    }

    pub async fn cancel_task(&self, index: usize) -> Result<Task> {
        let task = self.task_at(index).await?;
        self.update_status(task, TaskStatus::Cancelled, Some("Task cancelled"))
            .await
    }

    async fn update_status(
        &self,
        task: Task,
        status: TaskStatus,
        success: Option<&str>,
    ) -> Result<Task> {
        match self.gateway.update(&task.id, task.with_status(status)).await {
            Ok(updated) => {
                self.apply_update(updated.clone()).await;
                if let Some(message) = success {
                    self.notify(message, NoticeKind::Success);
                }
                Ok(updated)
            }
            Err(e) => {
                log::error!("Failed to set task {} to {}: {}", task.id, status, e);
                self.notify(&format!("Failed to update task: {}", e), NoticeKind::Error);
                Err(e)
            }
        }
    }

    pub async fn request_delete(&self, index: usize) -> Result<()> {
        let task = self.task_at(index).await?;
        self.state.lock().await.pending_delete = Some(DeleteRequest { index, id: task.id });
        Ok(())
    }

    /// Delete the task a pending request was made for. Nothing is deleted if
    /// the task at `index` is no longer the requested one.
    pub async fn confirm_delete(&self, index: usize) -> Result<()> {
        let (request, current) = {
            let mut state = self.state.lock().await;
            let request = state.pending_delete.take();
            let current = state.store.get(index).map(|t| t.id.clone());
            (request, current)
        };

        let request = match request {
            Some(request) if request.index == index => request,
            _ => return Err(self.warn(&format!("No delete pending for task {}", index + 1))),
        };

        if current.as_ref() != Some(&request.id) {
            log::warn!(
                "Task at position {} is no longer {}, not deleting",
                index,
                request.id
            );
            self.notify(
                "The task list changed before the delete was confirmed; nothing was deleted",
                NoticeKind::Error,
            );
            return Err(Error::StaleIndex {
                index,
                expected: request.id,
            });
        }

        match self.gateway.delete(&request.id).await {
            Ok(()) => {
                {
                    let mut state = self.state.lock().await;
                    state.store.remove(&request.id);
                    state.reconcile_edit();
                }
                self.notify("Task deleted", NoticeKind::Success);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to delete task {}: {}", request.id, e);
                self.notify(&format!("Failed to delete task: {}", e), NoticeKind::Error);
                Err(e)
            }
        }
    }

    pub async fn cancel_delete_request(&self) {
        self.state.lock().await.pending_delete = None;
    }

    /// Modal variant: ask the notification sink, then request and confirm in
    /// one go. Returns whether the user agreed.
    pub async fn delete_with_confirmation(&self, index: usize) -> Result<bool> {
        let task = self.task_at(index).await?;
        if !self.notifier.confirm(&format!("Delete \"{}\"?", task.task)) {
            return Ok(false);
        }
        self.request_delete(index).await?;
        self.confirm_delete(index).await?;
        Ok(true)
    }

    pub async fn start_edit(&self, index: usize) -> Result<()> {
        let task = self.task_at(index).await?;
        self.state.lock().await.edit = Some(EditSession {
            index,
            id: task.id,
            draft: task.task,
        });
        Ok(())
    }

    pub async fn update_draft(&self, text: impl Into<String>) {
        if let Some(session) = self.state.lock().await.edit.as_mut() {
            session.draft = text.into();
        }
    }

    /// Send the draft text for the task being edited. Completed and cancelled
    /// tasks are refused without a backend call, even when the draft matches
    /// the current text. A backend refusal (the status changed remotely) is
    /// reported the same way, as [`Error::BusinessRule`].
    pub async fn save_edit(&self, index: usize) -> Result<Task> {
        let session = self.state.lock().await.edit.clone();
        let session = match session {
            Some(session) if session.index == index => session,
            _ => return Err(self.warn(&format!("No edit in progress for task {}", index + 1))),
        };

        let draft = session.draft.trim().to_string();
        if draft.is_empty() {
            return Err(self.warn("Task text cannot be empty"));
        }

        let task = {
            let state = self.state.lock().await;
            state
                .store
                .position(&session.id)
                .and_then(|i| state.store.get(i).cloned())
        };
        let Some(task) = task else {
            self.end_edit(&session).await;
            self.notify("The task being edited no longer exists", NoticeKind::Error);
            return Err(Error::NotFound(session.id));
        };
        if task.status.is_locked() {
            self.end_edit(&session).await;
            log::warn!("Edit of {} task {} refused", task.status, session.id);
            self.notify(LOCKED_EDIT_MESSAGE, NoticeKind::Error);
            return Err(Error::BusinessRule(LOCKED_EDIT_MESSAGE.to_string()));
        }

        let result = self.gateway.update(&session.id, task.with_text(draft)).await;
        self.end_edit(&session).await;

        match result {
            Ok(updated) => {
                self.apply_update(updated.clone()).await;
                self.notify("Task updated", NoticeKind::Success);
                Ok(updated)
            }
            Err(e) if e.is_rejection() => {
                log::warn!("Edit of task {} refused: {}", session.id, e);
                self.notify(LOCKED_EDIT_MESSAGE, NoticeKind::Error);
                Err(Error::BusinessRule(LOCKED_EDIT_MESSAGE.to_string()))
            }
            Err(e) => {
                log::error!("Failed to save task {}: {}", session.id, e);
                self.notify(&format!("Failed to update task: {}", e), NoticeKind::Error);
                Err(e)
            }
        }
    }

    pub async fn cancel_edit(&self) {
        self.state.lock().await.edit = None;
    }

    /// Route a [`Message`] to the matching operation.
    pub async fn update(&self, message: Message) -> Result<()> {
        match message {
            Message::Load(filter) => self.load(filter).await,
            Message::SetFilter(filter) => self.set_filter(filter).await,
            Message::AddTask(text) => self.add_task(text).await.map(|_| ()),
            Message::ToggleTask(index) => self.toggle_task(index).await.map(|_| ()),
            Message::CancelTask(index) => self.cancel_task(index).await.map(|_| ()),
            Message::RequestDelete(index) => self.request_delete(index).await,
            Message::ConfirmDelete(index) => self.confirm_delete(index).await,
            Message::CancelDeleteRequest => {
                self.cancel_delete_request().await;
                Ok(())
            }
            Message::StartEdit(index) => self.start_edit(index).await,
            Message::UpdateDraft(text) => {
                self.update_draft(text).await;
                Ok(())
            }
            Message::SaveEdit(index) => self.save_edit(index).await.map(|_| ()),
            Message::CancelEdit => {
                self.cancel_edit().await;
                Ok(())
            }
        }
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.state.lock().await.store.tasks().to_vec()
    }

    pub async fn filter(&self) -> StatusFilter {
        self.state.lock().await.store.filter()
    }

    pub async fn input(&self) -> String {
        self.state.lock().await.input.clone()
    }

    pub async fn edit_session(&self) -> Option<EditSession> {
        self.state.lock().await.edit.clone()
    }

    pub async fn pending_delete(&self) -> Option<DeleteRequest> {
        self.state.lock().await.pending_delete.clone()
    }

    pub async fn summary(&self) -> Summary {
        self.state.lock().await.store.summary()
    }

    async fn task_at(&self, index: usize) -> Result<Task> {
        let task = self.state.lock().await.store.get(index).cloned();
        match task {
            Some(task) => Ok(task),
            None => Err(self.warn(&format!("No task at position {}", index + 1))),
        }
    }

    async fn apply_update(&self, updated: Task) {
        let mut state = self.state.lock().await;
        if state.store.replace(updated.clone()).is_none() {
            log::debug!("Task {} left the list before its update landed", updated.id);
        }
    }

    /// End the edit session only if it is still the one `session` describes.
    async fn end_edit(&self, session: &EditSession) {
        let mut state = self.state.lock().await;
        if state.edit.as_ref().is_some_and(|e| e.id == session.id) {
            state.edit = None;
        }
    }

    fn notify(&self, message: &str, kind: NoticeKind) {
        self.notifier.notify(message, kind);
    }

    fn warn(&self, message: &str) -> Error {
        self.notify(message, NoticeKind::Warning);
        Error::Validation(message.to_string())
    }
}
