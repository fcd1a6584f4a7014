use leptos::prelude::*;

use crate::config::AppConfig;
use crate::pages::Kanban;

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    provide_context(config);

    view! {
        <main class="app">
            <Kanban />
        </main>
    }
}
