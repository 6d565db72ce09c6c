//! Shared fixtures: an in-memory gateway that records calls and can be told
//! to fail or stall, and a sink that records notices.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use todolist::sync::SyncGateway;
use todolist::{
    Error, NewTask, NoticeKind, NotificationSink, Result, StatusFilter, Task, TaskId, TaskListController,
    TaskStatus,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Default)]
struct FakeState {
    tasks: Vec<Task>,
    next_id: u64,
    calls: Vec<(Op, String)>,
    failures: HashMap<Op, (u16, String)>,
    list_override: Option<Vec<Task>>,
    list_gates: HashMap<StatusFilter, Arc<Notify>>,
}

/// Backend double that behaves like the task API: assigns numeric ids, filters
/// by status and refuses text edits of completed or cancelled tasks.
#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<FakeState>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks
            .iter()
            .filter_map(|t| match t.id {
                TaskId::Number(n) => Some(n),
                TaskId::Text(_) => None,
            })
            .max()
            .unwrap_or(0);
        let gateway = Self::new();
        {
            let mut state = gateway.state.lock().unwrap();
            state.tasks = tasks;
            state.next_id = next_id;
        }
        gateway
    }

    /// Make every call of `op` fail with an HTTP status.
    pub fn fail(&self, op: Op, status: u16, message: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(op, (status, message.to_string()));
    }

    pub fn recover(&self, op: Op) {
        self.state.lock().unwrap().failures.remove(&op);
    }

    /// Return exactly these tasks from every list call, whatever the filter.
    pub fn respond_with(&self, tasks: Vec<Task>) {
        self.state.lock().unwrap().list_override = Some(tasks);
    }

    /// Hold the next list call for `filter` until the returned handle is
    /// notified. The response is taken when the call arrives.
    pub fn hold_list(&self, filter: StatusFilter) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state
            .lock()
            .unwrap()
            .list_gates
            .insert(filter, gate.clone());
        gate
    }

    /// Change the backend behind the controller's back, like another client would.
    pub fn insert_front(&self, text: &str) -> Task {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let task = NewTask::new(text).into_task(TaskId::Number(state.next_id));
        state.tasks.insert(0, task.clone());
        task
    }

    /// Set a task's status on the backend only; the controller keeps its copy.
    pub fn set_status(&self, id: &TaskId, status: TaskStatus) {
        let mut state = self.state.lock().unwrap();
        if let Some(task) = state.tasks.iter_mut().find(|t| t.id == *id) {
            task.status = status;
        }
    }

    pub fn backend_tasks(&self) -> Vec<Task> {
        self.state.lock().unwrap().tasks.clone()
    }

    pub fn calls(&self) -> Vec<(Op, String)> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls().iter().filter(|(o, _)| *o == op).count()
    }

    fn record(&self, op: Op, detail: String) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push((op, detail));
        match state.failures.get(&op) {
            Some((status, message)) => Err(Error::Backend {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SyncGateway for FakeGateway {
    async fn list(&self, filter: StatusFilter) -> Result<Vec<Task>> {
        self.record(Op::List, filter.as_query().to_string())?;
        let (tasks, gate) = {
            let mut state = self.state.lock().unwrap();
            let tasks = match &state.list_override {
                Some(tasks) => tasks.clone(),
                None => state
                    .tasks
                    .iter()
                    .filter(|t| filter.matches(t.status))
                    .cloned()
                    .collect(),
            };
            (tasks, state.list_gates.remove(&filter))
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(tasks)
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        self.record(Op::Create, task.task.clone())?;
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let created = task.into_task(TaskId::Number(state.next_id));
        state.tasks.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &TaskId, task: Task) -> Result<Task> {
        self.record(Op::Update, id.to_string())?;
        let mut state = self.state.lock().unwrap();
        let Some(current) = state.tasks.iter_mut().find(|t| t.id == *id) else {
            return Err(Error::Backend {
                status: 404,
                message: "Not found.".into(),
            });
        };
        if current.status.is_locked() && current.task != task.task {
            return Err(Error::Backend {
                status: 400,
                message: "Cannot edit a completed or cancelled task.".into(),
            });
        }
        *current = Task {
            id: id.clone(),
            ..task
        };
        Ok(current.clone())
    }

    async fn delete(&self, id: &TaskId) -> Result<()> {
        self.record(Op::Delete, id.to_string())?;
        let mut state = self.state.lock().unwrap();
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != *id);
        if state.tasks.len() == before {
            return Err(Error::Backend {
                status: 404,
                message: "Not found.".into(),
            });
        }
        Ok(())
    }
}

/// Records every notice and answers confirmations with a fixed value.
pub struct RecordingSink {
    notices: Mutex<Vec<(NoticeKind, String)>>,
    prompts: Mutex<Vec<String>>,
    answer: bool,
}

impl RecordingSink {
    pub fn answering(answer: bool) -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
            answer,
        }
    }

    pub fn notices(&self) -> Vec<(NoticeKind, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<(NoticeKind, String)> {
        self.notices().last().cloned()
    }

    pub fn count(&self, kind: NoticeKind) -> usize {
        self.notices().iter().filter(|(k, _)| *k == kind).count()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, message: &str, kind: NoticeKind) {
        self.notices.lock().unwrap().push((kind, message.to_string()));
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}

pub fn task(id: u64, text: &str, status: TaskStatus) -> Task {
    Task {
        id: TaskId::Number(id),
        task: text.to_string(),
        description: String::new(),
        status,
    }
}

pub struct Harness {
    pub gateway: Arc<FakeGateway>,
    pub sink: Arc<RecordingSink>,
    pub controller: Arc<TaskListController>,
}

pub fn harness(gateway: FakeGateway) -> Harness {
    harness_with(gateway, Default::default())
}

pub fn harness_with(gateway: FakeGateway, options: todolist::ControllerOptions) -> Harness {
    let gateway = Arc::new(gateway);
    let sink = Arc::new(RecordingSink::answering(true));
    let controller = Arc::new(
        TaskListController::new(gateway.clone(), sink.clone()).with_options(options),
    );
    Harness {
        gateway,
        sink,
        controller,
    }
}

/// A harness whose list is already loaded with the given tasks.
pub async fn mounted(tasks: Vec<Task>) -> Harness {
    let h = harness(FakeGateway::with_tasks(tasks));
    h.controller.mount().await.unwrap();
    h
}

/// Yield until the gateway has seen `n` calls of `op`.
pub async fn wait_for_calls(gateway: &FakeGateway, op: Op, n: usize) {
    while gateway.count(op) < n {
        tokio::task::yield_now().await;
    }
}
