use leptos::prelude::*;
use web_sys::DragEvent;

use crate::core::models::TaskStatus;
use crate::features::kanban::components::TaskCard;
use crate::features::kanban::hooks::BoardHandle;
use crate::features::kanban::reconciler::DragTarget;

/// Drop zone for one status. Cards inside handle their own drag events and
/// stop propagation, so anything reaching the column is "over the column".
/// The column stops propagation in turn so the board-level fallback only
/// sees drops outside every column.
#[component]
pub fn KanbanColumn(status: TaskStatus, board: BoardHandle) -> impl IntoView {
    let on_dragover = move |ev: DragEvent| {
        // required for the element to accept a drop
        ev.prevent_default();
        board.drag_over(DragTarget::Column(status));
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        board.drop_on(DragTarget::Column(status));
    };

    view! {
        <div
            class="kanban-column"
            data-column=status.wire_name()
            on:dragover=on_dragover
            on:drop=on_drop
        >
            <div class="column-header" style=format!("border-top-color: {}", status.accent_color())>
                <h2>{status.as_str()}</h2>
                <span class="task-count">{move || board.count_in(status)}</span>
            </div>
            <div class="column-content">
                {move || {
                    let tasks = board.tasks_in(status);
                    if tasks.is_empty() {
                        view! { <div class="empty-column">"No tasks"</div> }.into_any()
                    } else {
                        tasks
                            .into_iter()
                            .map(|task| view! { <TaskCard task=task board=board /> })
                            .collect::<Vec<_>>()
                            .into_any()
                    }
                }}
            </div>
        </div>
    }
}
