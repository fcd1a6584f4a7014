use leptos::prelude::*;

use crate::features::kanban::hooks::BoardHandle;

#[component]
pub fn KanbanHeader(board: BoardHandle) -> impl IntoView {
    let total = move || board.board.with(|b| b.len());

    view! {
        <header class="kanban-header">
            <div class="kanban-header-left">
                <h1>"Kanban Board"</h1>
                <span class="task-total">{move || format!("{} tasks", total())}</span>
                <Show when=move || board.is_saving()>
                    <span class="saving-indicator">"Saving…"</span>
                </Show>
            </div>
            <div class="kanban-actions">
                <button
                    class="btn-secondary refresh-btn"
                    title="Reload tasks from the server"
                    disabled=move || board.is_loading()
                    on:click=move |_| board.refresh()
                >
                    "🔄 Refresh"
                </button>
            </div>
        </header>
    }
}
