use leptos::prelude::*;

use crate::features::kanban::hooks::BoardHandle;

#[component]
pub fn NoticeBanner(board: BoardHandle) -> impl IntoView {
    move || {
        board.notice.get().map(|shown| {
            view! {
                <div class="notice-banner" role="alert">
                    <span>{shown.notice.message}</span>
                    <button class="notice-close" on:click=move |_| board.dismiss_notice()>"x"</button>
                </div>
            }
        })
    }
}
