//! Drag-and-drop status changes for the board.
//!
//! [`BoardReconciler`] owns the only mutable copy of the task list. A drag
//! gesture moves a card optimistically while the pointer travels, then on
//! drop pushes the final status to the [`TaskStore`] and replaces the local
//! list with a fresh read, whether the push worked or not.
//!
//! Gesture states: `Idle -> Dragging -> (Committing | Idle)`. Gestures may
//! overlap while a commit is in flight; reloads are sequenced so that an
//! older reload resolving late never overwrites a newer one.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::core::error::StoreError;
use crate::core::models::{Task, TaskStatus};
use crate::core::services::TaskStore;
use super::board::{BoardSnapshot, Column};

/// What the pointer is over: a column, or another card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragTarget {
    Column(TaskStatus),
    Task(String),
}

impl DragTarget {
    /// Column ids win; anything else is treated as a task id.
    pub fn parse(raw: &str) -> DragTarget {
        match TaskStatus::from_wire(raw) {
            Some(status) => DragTarget::Column(status),
            None => DragTarget::Task(raw.to_string()),
        }
    }
}

impl From<TaskStatus> for DragTarget {
    fn from(status: TaskStatus) -> Self {
        DragTarget::Column(status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Dragging,
    /// No drag in progress but at least one status change is still being
    /// pushed or reconciled.
    Committing,
}

/// Result of a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Dropped where it started; nothing was sent.
    Unchanged,
    /// Dropped on nothing, or the task is unknown; nothing was sent.
    Cancelled,
    /// The new status was accepted and the board reloaded.
    Committed(TaskStatus),
}

/// Human-readable message for the notice area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// How often a status change that never reached the server is re-sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
}

#[derive(Debug, Clone)]
struct ActiveDrag {
    task_id: String,
    origin: TaskStatus,
}

#[derive(Debug, Default)]
struct BoardState {
    snapshot: BoardSnapshot,
    drag: Option<ActiveDrag>,
    loads_issued: u64,
    loads_applied: u64,
    commits_in_flight: usize,
}

impl BoardState {
    fn resolve(&self, target: &DragTarget) -> Option<TaskStatus> {
        match target {
            DragTarget::Column(status) => Some(*status),
            DragTarget::Task(id) => self.snapshot.status_of(id),
        }
    }

    /// Moves `task_id` to `status`, returning the new snapshot if anything changed.
    fn set_status(&mut self, task_id: &str, status: TaskStatus) -> Option<BoardSnapshot> {
        let next = self.snapshot.with_status(task_id, status)?;
        self.snapshot = next.clone();
        Some(next)
    }

    /// Ends a gesture on any task other than `keep`, putting that task back
    /// in its origin column. Returns whether the snapshot changed.
    fn release_other(&mut self, keep: Option<&str>) -> bool {
        match self.drag.take() {
            Some(drag) if Some(drag.task_id.as_str()) == keep => {
                self.drag = Some(drag);
                false
            }
            Some(drag) => {
                tracing::debug!(task_id = %drag.task_id, "abandoned gesture reverted");
                self.set_status(&drag.task_id, drag.origin).is_some()
            }
            None => false,
        }
    }

    /// Latest snapshot if either step of an operation changed it.
    fn changed(&self, reverted: bool, moved: Option<BoardSnapshot>) -> Option<BoardSnapshot> {
        moved.or_else(|| reverted.then(|| self.snapshot.clone()))
    }

    fn phase(&self) -> GesturePhase {
        if self.drag.is_some() {
            GesturePhase::Dragging
        } else if self.commits_in_flight > 0 {
            GesturePhase::Committing
        } else {
            GesturePhase::Idle
        }
    }

    fn gesture(&self) -> (GesturePhase, Option<String>) {
        (self.phase(), self.drag.as_ref().map(|d| d.task_id.clone()))
    }
}

/// First, synchronous half of a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPlan {
    /// Nothing to send; the gesture is over.
    Settled(DropOutcome),
    /// The status has been applied locally and must be pushed with
    /// [`BoardReconciler::commit_drop`].
    Commit(TaskStatus),
}

type Listener = Rc<dyn Fn(&BoardSnapshot)>;
type GestureWatcher = Rc<dyn Fn(GesturePhase, Option<&str>)>;

pub struct BoardReconciler<S> {
    store: Rc<S>,
    state: Rc<RefCell<BoardState>>,
    listeners: Rc<RefCell<Vec<Listener>>>,
    watchers: Rc<RefCell<Vec<GestureWatcher>>>,
    notices: UnboundedSender<Notice>,
    retry: RetryPolicy,
}

impl<S> Clone for BoardReconciler<S> {
    fn clone(&self) -> Self {
        Self {
            store: Rc::clone(&self.store),
            state: Rc::clone(&self.state),
            listeners: Rc::clone(&self.listeners),
            watchers: Rc::clone(&self.watchers),
            notices: self.notices.clone(),
            retry: self.retry,
        }
    }
}

impl<S: TaskStore> BoardReconciler<S> {
    /// Creates an empty board. Failure notices arrive on the returned receiver.
    pub fn new(store: S, retry: RetryPolicy) -> (Self, UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded();
        let reconciler = Self {
            store: Rc::new(store),
            state: Rc::new(RefCell::new(BoardState::default())),
            listeners: Rc::new(RefCell::new(Vec::new())),
            watchers: Rc::new(RefCell::new(Vec::new())),
            notices: tx,
            retry,
        };
        (reconciler, rx)
    }

    /// Registers a callback run after every snapshot replacement.
    pub fn subscribe(&self, listener: impl Fn(&BoardSnapshot) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Registers a callback run whenever the phase or the dragged task changes.
    pub fn watch_gesture(&self, watcher: impl Fn(GesturePhase, Option<&str>) + 'static) {
        self.watchers.borrow_mut().push(Rc::new(watcher));
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        self.state.borrow().snapshot.clone()
    }

    pub fn get_columns(&self) -> Vec<Column> {
        self.state.borrow().snapshot.columns()
    }

    pub fn phase(&self) -> GesturePhase {
        self.state.borrow().phase()
    }

    pub fn active_task_id(&self) -> Option<String> {
        self.state.borrow().drag.as_ref().map(|d| d.task_id.clone())
    }

    /// Task currently being dragged, as it looks right now.
    pub fn active_task(&self) -> Option<Task> {
        let state = self.state.borrow();
        let drag = state.drag.as_ref()?;
        state.snapshot.find(&drag.task_id).cloned()
    }

    // Runs `f` with the state borrowed, then tells listeners and watchers
    // about what changed once the borrow is released.
    fn apply<T>(&self, f: impl FnOnce(&mut BoardState) -> (T, Option<BoardSnapshot>)) -> T {
        let (result, changed, before, after) = {
            let mut state = self.state.borrow_mut();
            let before = state.gesture();
            let (result, changed) = f(&mut state);
            (result, changed, before, state.gesture())
        };

        if let Some(snapshot) = changed {
            let listeners: Vec<Listener> = self.listeners.borrow().clone();
            for listener in listeners {
                listener(&snapshot);
            }
        }
        if before != after {
            let watchers: Vec<GestureWatcher> = self.watchers.borrow().clone();
            for watcher in watchers {
                watcher(after.0, after.1.as_deref());
            }
        }
        result
    }

    fn notify(&self, message: String) {
        // A dropped receiver just means nobody is showing notices.
        let _ = self.notices.unbounded_send(Notice { message });
    }

    /// Replaces the board with a fresh read from the store.
    ///
    /// On failure the current snapshot is kept and a notice is emitted. A
    /// result that arrives after a later-issued load was already applied is
    /// discarded.
    pub async fn load_board(&self) -> Result<BoardSnapshot, StoreError> {
        let ticket = self.apply(|state| {
            state.loads_issued += 1;
            (state.loads_issued, None)
        });

        match self.store.list_tasks().await {
            Ok(tasks) => Ok(self.apply(|state| {
                if ticket <= state.loads_applied {
                    tracing::debug!(ticket, applied = state.loads_applied, "discarding stale reload");
                    return (state.snapshot.clone(), None);
                }
                state.loads_applied = ticket;
                state.snapshot = BoardSnapshot::new(tasks);
                tracing::info!(count = state.snapshot.len(), "board loaded");
                (state.snapshot.clone(), Some(state.snapshot.clone()))
            })),
            Err(e) => {
                tracing::error!(error = %e, "failed to load tasks");
                self.notify(format!("Failed to load tasks: {}", e));
                Err(e)
            }
        }
    }

    /// Starts a fresh gesture. Any gesture still open, even on the same
    /// task, is reverted first so its origin is not lost.
    pub fn on_drag_start(&self, task_id: &str) {
        self.apply(|state| {
            let reverted = state.release_other(None);
            match state.snapshot.status_of(task_id) {
                Some(origin) => {
                    tracing::debug!(task_id, ?origin, "drag started");
                    state.drag = Some(ActiveDrag { task_id: task_id.to_string(), origin });
                }
                None => tracing::debug!(task_id, "drag start for unknown task ignored"),
            }
            ((), state.changed(reverted, None))
        })
    }

    /// Moves the dragged card to the column under the pointer, locally only.
    pub fn on_drag_over(&self, task_id: &str, target: &DragTarget) {
        self.apply(|state| {
            let reverted = state.release_other(Some(task_id));
            if state.drag.is_none() {
                let Some(origin) = state.snapshot.status_of(task_id) else {
                    return ((), state.changed(reverted, None));
                };
                state.drag = Some(ActiveDrag { task_id: task_id.to_string(), origin });
            }

            let moved = state
                .resolve(target)
                .and_then(|candidate| state.set_status(task_id, candidate));
            ((), state.changed(reverted, moved))
        })
    }

    /// Puts the dragged card back where the gesture started.
    pub fn cancel_drag(&self) {
        self.apply(|state| {
            let reverted = state.release_other(None);
            ((), state.changed(reverted, None))
        })
    }

    /// Synchronous half of a drop: ends the gesture and applies the final
    /// status locally. Only a net change of status yields
    /// [`DropPlan::Commit`], which the caller must hand to
    /// [`commit_drop`](Self::commit_drop).
    pub fn begin_drop(&self, task_id: &str, target: &DragTarget) -> DropPlan {
        self.apply(|state| {
            let reverted = state.release_other(Some(task_id));
            let drag = state.drag.take();
            let Some(origin) = drag.map(|d| d.origin).or_else(|| state.snapshot.status_of(task_id)) else {
                return (DropPlan::Settled(DropOutcome::Cancelled), state.changed(reverted, None));
            };

            let (plan, moved) = match state.resolve(target) {
                None => (DropPlan::Settled(DropOutcome::Cancelled), state.set_status(task_id, origin)),
                Some(status) if status == origin => {
                    (DropPlan::Settled(DropOutcome::Unchanged), state.set_status(task_id, origin))
                }
                Some(status) => {
                    state.commits_in_flight += 1;
                    (DropPlan::Commit(status), state.set_status(task_id, status))
                }
            };
            (plan, state.changed(reverted, moved))
        })
    }

    /// Pushes a status planned by [`begin_drop`](Self::begin_drop), then
    /// reloads the board whether the push worked or not.
    pub async fn commit_drop(&self, task_id: &str, status: TaskStatus) -> Result<DropOutcome, StoreError> {
        tracing::info!(task_id, ?status, "moving task");
        let pushed = self.push_status(task_id, status).await;

        let result = match pushed {
            Ok(_) => self.load_board().await.map(|_| DropOutcome::Committed(status)),
            Err(e) => {
                tracing::error!(task_id, error = %e, "failed to update task status");
                self.notify(format!("Failed to update task status: {}", e));
                if let Err(reload) = self.load_board().await {
                    tracing::warn!(error = %reload, "rollback reload failed; keeping last known board");
                }
                Err(e)
            }
        };

        self.apply(|state| {
            state.commits_in_flight = state.commits_in_flight.saturating_sub(1);
            ((), None)
        });
        result
    }

    /// Finishes a gesture. Only a net change of status reaches the store;
    /// either way the outcome of a push is a full reload.
    pub async fn on_drag_end(&self, task_id: &str, target: &DragTarget) -> Result<DropOutcome, StoreError> {
        match self.begin_drop(task_id, target) {
            DropPlan::Settled(outcome) => Ok(outcome),
            DropPlan::Commit(status) => self.commit_drop(task_id, status).await,
        }
    }

    async fn push_status(&self, task_id: &str, status: TaskStatus) -> Result<Task, StoreError> {
        let mut attempt = 0;
        loop {
            match self.store.set_task_status(task_id, status).await {
                Ok(task) => return Ok(task),
                Err(e) if e.is_retryable() && attempt < self.retry.max_retries => {
                    attempt += 1;
                    tracing::warn!(task_id, attempt, error = %e, "retrying status change");
                }
                Err(e) => return Err(e),
            }
        }
    }
}
