use leptos::prelude::*;
use web_sys::DragEvent;

use crate::core::models::TaskStatus;
use crate::features::kanban::{use_board, DragGhost, KanbanColumn, KanbanHeader, NoticeBanner};

#[component]
pub fn Kanban() -> impl IntoView {
    let board = use_board();

    // Drops outside any column, or whose source card was re-rendered away
    // before its dragend fired, still end the gesture here.
    let on_dragover = move |ev: DragEvent| ev.prevent_default();
    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        board.drag_end();
    };

    view! {
        <div class="kanban-container" on:dragover=on_dragover on:drop=on_drop>
            <KanbanHeader board=board />
            <NoticeBanner board=board />
            {move || {
                // Only the first load blocks the board; refreshes keep it visible
                if board.is_loading() && board.board.with(|b| b.is_empty()) {
                    view! { <div class="kanban-loading">"Loading Kanban board..."</div> }.into_any()
                } else {
                    view! {
                        <div class="kanban-board">
                            {TaskStatus::all()
                                .into_iter()
                                .map(|status| view! { <KanbanColumn status=status board=board /> })
                                .collect::<Vec<_>>()}
                        </div>
                    }
                        .into_any()
                }
            }}
            <DragGhost board=board />
        </div>
    }
}
