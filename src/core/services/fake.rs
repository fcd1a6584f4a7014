//! In-memory [`TaskStore`] for tests. Clones share the same tasks.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::core::error::StoreError;
use crate::core::models::{Task, TaskStatus};
use super::TaskStore;

type SideEffect = Box<dyn Fn(&mut Vec<Task>)>;

#[derive(Default)]
struct Inner {
    tasks: Vec<Task>,
    list_calls: usize,
    status_calls: Vec<(String, TaskStatus)>,
    list_failure: Option<StoreError>,
    status_failure: Option<StoreError>,
    // None: fail every call while `status_failure` is set
    status_failures_left: Option<u32>,
    side_effect: Option<SideEffect>,
    list_gates: VecDeque<oneshot::Receiver<()>>,
    status_gates: VecDeque<oneshot::Receiver<()>>,
}

#[derive(Clone, Default)]
pub struct FakeTaskStore {
    inner: Rc<RefCell<Inner>>,
}

impl FakeTaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        let store = Self::default();
        store.inner.borrow_mut().tasks = tasks;
        store
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.inner.borrow().tasks.clone()
    }

    pub fn remove(&self, task_id: &str) {
        self.inner.borrow_mut().tasks.retain(|t| t.id != task_id);
    }

    pub fn list_calls(&self) -> usize {
        self.inner.borrow().list_calls
    }

    pub fn status_calls(&self) -> usize {
        self.inner.borrow().status_calls.len()
    }

    pub fn last_status_call(&self) -> Option<(String, TaskStatus)> {
        self.inner.borrow().status_calls.last().cloned()
    }

    pub fn fail_lists(&self, error: StoreError) {
        self.inner.borrow_mut().list_failure = Some(error);
    }

    pub fn fail_status_changes(&self, error: StoreError) {
        let mut inner = self.inner.borrow_mut();
        inner.status_failure = Some(error);
        inner.status_failures_left = None;
    }

    pub fn fail_next_status_changes(&self, count: u32, error: StoreError) {
        let mut inner = self.inner.borrow_mut();
        inner.status_failure = Some(error);
        inner.status_failures_left = Some(count);
    }

    /// Runs after every accepted status change, like a server recomputing order.
    pub fn on_status_change(&self, effect: impl Fn(&mut Vec<Task>) + 'static) {
        self.inner.borrow_mut().side_effect = Some(Box::new(effect));
    }

    /// The next `list_tasks` reads its data immediately but only answers
    /// once `gate` fires.
    pub fn gate_next_list(&self, gate: oneshot::Receiver<()>) {
        self.inner.borrow_mut().list_gates.push_back(gate);
    }

    /// The next `set_task_status` is only processed once `gate` fires.
    pub fn gate_next_status_change(&self, gate: oneshot::Receiver<()>) {
        self.inner.borrow_mut().status_gates.push_back(gate);
    }

    fn take_status_failure(&self) -> Option<StoreError> {
        let mut inner = self.inner.borrow_mut();
        let error = inner.status_failure.clone()?;
        match inner.status_failures_left {
            None => Some(error),
            Some(0) => {
                inner.status_failure = None;
                inner.status_failures_left = None;
                None
            }
            Some(left) => {
                inner.status_failures_left = Some(left - 1);
                Some(error)
            }
        }
    }
}

#[async_trait(?Send)]
impl TaskStore for FakeTaskStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let (result, gate) = {
            let mut inner = self.inner.borrow_mut();
            inner.list_calls += 1;
            let result = match &inner.list_failure {
                Some(error) => Err(error.clone()),
                None => Ok(inner.tasks.clone()),
            };
            (result, inner.list_gates.pop_front())
        };

        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }

    async fn set_task_status(&self, task_id: &str, status: TaskStatus) -> Result<Task, StoreError> {
        let gate = {
            let mut inner = self.inner.borrow_mut();
            inner.status_calls.push((task_id.to_string(), status));
            inner.status_gates.pop_front()
        };

        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if let Some(error) = self.take_status_failure() {
            return Err(error);
        }

        let mut inner = self.inner.borrow_mut();
        let Some(index) = inner.tasks.iter().position(|t| t.id == task_id) else {
            return Err(StoreError::NotFound { task_id: task_id.to_string() });
        };
        inner.tasks[index].status = status;
        let updated = inner.tasks[index].clone();

        if let Some(effect) = inner.side_effect.take() {
            effect(&mut inner.tasks);
            inner.side_effect = Some(effect);
        }
        Ok(updated)
    }
}
