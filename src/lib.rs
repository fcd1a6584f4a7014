pub mod app;
pub mod config;
pub mod core;
pub mod features;
pub mod logging;
pub mod pages;

pub use app::App;
pub use config::AppConfig;
