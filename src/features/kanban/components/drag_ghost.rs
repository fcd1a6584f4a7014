use leptos::prelude::*;

use crate::features::kanban::hooks::BoardHandle;

// Floating label for the card being dragged
#[component]
pub fn DragGhost(board: BoardHandle) -> impl IntoView {
    move || {
        board.active_task().map(|task| {
            view! {
                <div class="task-card dragging drag-ghost">
                    {task.title}
                    <span class="drag-ghost-status">{task.status.as_str()}</span>
                </div>
            }
        })
    }
}
