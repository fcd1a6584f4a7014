use futures::StreamExt;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::config::AppConfig;
use crate::core::models::{Task, TaskStatus};
use crate::core::services::HttpTaskStore;
use crate::features::kanban::board::BoardSnapshot;
use crate::features::kanban::reconciler::{
    BoardReconciler, DragTarget, DropPlan, GesturePhase, Notice, RetryPolicy,
};

const NOTICE_TIMEOUT_MS: u32 = 5_000;

/// A notice on screen. The id tells repeated messages apart, so a timer
/// started for an earlier copy never hides a later one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownNotice {
    pub id: u64,
    pub notice: Notice,
}

impl ShownNotice {
    pub fn message(&self) -> &str {
        &self.notice.message
    }
}

fn is_still_shown(current: Option<&ShownNotice>, id: u64) -> bool {
    current.is_some_and(|shown| shown.id == id)
}

/// Reactive handle on the board for components.
///
/// `Copy`, so it can be moved into as many view closures as needed. The
/// reconciler itself is `!Send` and lives in local storage; `phase` and the
/// active task are mirrored from it and never written from the UI side.
#[derive(Clone, Copy)]
pub struct BoardHandle {
    pub board: RwSignal<BoardSnapshot>,
    pub notice: RwSignal<Option<ShownNotice>>,
    pub phase: RwSignal<GesturePhase>,
    pending_loads: RwSignal<usize>,
    active: RwSignal<Option<String>>,
    reconciler: StoredValue<BoardReconciler<HttpTaskStore>, LocalStorage>,
}

impl BoardHandle {
    fn reconciler(&self) -> BoardReconciler<HttpTaskStore> {
        self.reconciler.get_value()
    }

    /// Task id of the open gesture, read from the reconciler.
    pub fn active_id(&self) -> Option<String> {
        self.reconciler().active_task_id()
    }

    pub fn is_active(&self, task_id: &str) -> bool {
        self.active.with(|active| active.as_deref() == Some(task_id))
    }

    /// Dragged task for the ghost, tracking its optimistic status.
    pub fn active_task(&self) -> Option<Task> {
        let id = self.active.get()?;
        self.board.with(|board| board.find(&id).cloned())
    }

    /// True while at least one reload is outstanding.
    pub fn is_loading(&self) -> bool {
        self.pending_loads.get() > 0
    }

    pub fn is_saving(&self) -> bool {
        self.phase.get() == GesturePhase::Committing
    }

    /// Tasks of one column, through the same partition the reconciler uses.
    pub fn tasks_in(&self, status: TaskStatus) -> Vec<Task> {
        self.board.with(|board| {
            board
                .columns()
                .into_iter()
                .find(|column| column.status == status)
                .map(|column| column.tasks)
                .unwrap_or_default()
        })
    }

    pub fn count_in(&self, status: TaskStatus) -> usize {
        self.board.with(|board| board.tasks().iter().filter(|t| t.status == status).count())
    }

    pub fn drag_start(&self, task_id: String) {
        let reconciler = self.reconciler();
        // The previous card's dragend can be lost when its element is
        // replaced mid-drag; put that card back first.
        if reconciler.active_task_id().is_some() {
            reconciler.cancel_drag();
        }
        reconciler.on_drag_start(&task_id);
    }

    pub fn drag_over(&self, target: DragTarget) {
        let reconciler = self.reconciler();
        if let Some(task_id) = reconciler.active_task_id() {
            reconciler.on_drag_over(&task_id, &target);
        }
    }

    /// Settles the board right away; only the push and reload run async.
    /// The trailing `dragend` then finds no open gesture and does nothing.
    pub fn drop_on(&self, target: DragTarget) {
        let reconciler = self.reconciler();
        let Some(task_id) = reconciler.active_task_id() else {
            return;
        };

        match reconciler.begin_drop(&task_id, &target) {
            DropPlan::Settled(outcome) => tracing::debug!(task_id = %task_id, ?outcome, "drop handled"),
            DropPlan::Commit(status) => spawn_local(async move {
                match reconciler.commit_drop(&task_id, status).await {
                    Ok(outcome) => tracing::debug!(task_id = %task_id, ?outcome, "drop handled"),
                    Err(e) => tracing::warn!(task_id = %task_id, error = %e, "drop failed"),
                }
            }),
        }
    }

    /// `dragend` without a preceding drop, or Escape on a card.
    pub fn drag_end(&self) {
        let reconciler = self.reconciler();
        if reconciler.active_task_id().is_some() {
            reconciler.cancel_drag();
        }
    }

    /// Keyboard move: one whole gesture onto `status`.
    pub fn move_task(&self, task_id: String, status: TaskStatus) {
        self.drag_start(task_id);
        self.drag_over(DragTarget::Column(status));
        self.drop_on(DragTarget::Column(status));
    }

    pub fn refresh(&self) {
        let reconciler = self.reconciler();
        let pending = self.pending_loads;
        pending.update(|n| *n += 1);
        spawn_local(async move {
            let _ = reconciler.load_board().await;
            pending.update(|n| *n = n.saturating_sub(1));
        });
    }

    pub fn dismiss_notice(&self) {
        self.notice.set(None);
    }
}

pub fn use_board() -> BoardHandle {
    let config = use_context::<AppConfig>().unwrap_or_default();
    let store = HttpTaskStore::new(config.clone());
    let (reconciler, mut notices) = BoardReconciler::new(
        store,
        RetryPolicy { max_retries: config.status_retries },
    );

    let board = RwSignal::new(BoardSnapshot::default());
    reconciler.subscribe(move |snapshot| board.set(snapshot.clone()));

    let phase = RwSignal::new(GesturePhase::Idle);
    let active = RwSignal::new(None::<String>);
    reconciler.watch_gesture(move |next, task_id| {
        phase.set(next);
        active.set(task_id.map(str::to_string));
    });

    let handle = BoardHandle {
        board,
        notice: RwSignal::new(None),
        phase,
        pending_loads: RwSignal::new(0),
        active,
        reconciler: StoredValue::new_local(reconciler),
    };

    // Surface failure notices, each one clearing itself after a while
    {
        let notice = handle.notice;
        spawn_local(async move {
            let mut next_id = 0u64;
            while let Some(next) = notices.next().await {
                next_id += 1;
                let id = next_id;
                notice.set(Some(ShownNotice { id, notice: next }));
                spawn_local(async move {
                    TimeoutFuture::new(NOTICE_TIMEOUT_MS).await;
                    if notice.with_untracked(|current| is_still_shown(current.as_ref(), id)) {
                        notice.set(None);
                    }
                });
            }
        });
    }

    // Load tasks on mount
    handle.refresh();

    handle
}
