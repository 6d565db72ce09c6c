use std::collections::HashSet;

use super::filter::StatusFilter;
use super::summary::Summary;
use super::task::{Task, TaskId};

/// The loaded task list in server order, plus the filter it was loaded with.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    filter: StatusFilter,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == *id)
    }

    /// Replace the whole list with a fresh load. Ids stay unique: a repeated
    /// id keeps its first occurrence.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        let mut seen = HashSet::new();
        let before = tasks.len();
        self.tasks = tasks
            .into_iter()
            .filter(|t| seen.insert(t.id.clone()))
            .collect();
        if self.tasks.len() != before {
            log::warn!(
                "Dropped {} duplicate task ids from loaded list",
                before - self.tasks.len()
            );
        }
    }

    /// Swap in the server's copy of a task, matched by id. Returns the index
    /// it landed at, or None when the task is no longer in the list.
    pub fn replace(&mut self, task: Task) -> Option<usize> {
        let index = self.position(&task.id)?;
        self.tasks[index] = task;
        Some(index)
    }

    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.position(id)?;
        Some(self.tasks.remove(index))
    }

    pub fn summary(&self) -> Summary {
        Summary::of(&self.tasks)
    }
}
