use std::sync::Arc;

use crate::core::models::{Task, TaskStatus};

/// Immutable view of the task list.
///
/// Cloning is cheap and never copies tasks. Every change produces a new
/// snapshot, so anything holding an older one keeps seeing what it saw.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    tasks: Arc<[Task]>,
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl BoardSnapshot {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks: tasks.into() }
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

    pub fn find(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn status_of(&self, task_id: &str) -> Option<TaskStatus> {
        self.find(task_id).map(|t| t.status)
    }

    /// New snapshot with `task_id` moved to `status`, keeping its position in
    /// the list. `None` if the task is unknown or already has that status.
    pub fn with_status(&self, task_id: &str, status: TaskStatus) -> Option<BoardSnapshot> {
        let index = self.tasks.iter().position(|t| t.id == task_id)?;
        if self.tasks[index].status == status {
            return None;
        }

        let tasks: Vec<Task> = self
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| if i == index { task.with_status(status) } else { task.clone() })
            .collect();
        Some(BoardSnapshot::new(tasks))
    }

    pub fn columns(&self) -> Vec<Column> {
        columns_for(&self.tasks)
    }
}

/// One board column: a status and its tasks in list order.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub status: TaskStatus,
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn title(&self) -> &'static str {
        self.status.as_str()
    }
}

/// Splits a flat task list into the fixed status columns, in
/// [`TaskStatus::all`] order. Relative order within a column follows the input.
pub fn columns_for(tasks: &[Task]) -> Vec<Column> {
    TaskStatus::all()
        .into_iter()
        .map(|status| Column {
            status,
            tasks: tasks.iter().filter(|t| t.status == status).cloned().collect(),
        })
        .collect()
}
