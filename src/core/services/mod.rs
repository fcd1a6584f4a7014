pub mod api;
pub mod task_store;

pub use api::*;
pub use task_store::*;

#[cfg(test)]
pub mod fake;
