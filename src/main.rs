use leptos::prelude::*;
use togglenest_board::{logging, App, AppConfig};

fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::from_build_env();
    logging::init(&config);
    tracing::info!(api = %config.api_base_url, "starting ToggleNest board");

    mount_to_body(move || view! { <App config=config /> });
}
