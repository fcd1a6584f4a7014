pub mod board;
pub mod components;
pub mod hooks;
pub mod reconciler;

pub use board::{columns_for, BoardSnapshot, Column};
pub use components::*;
pub use hooks::*;
pub use reconciler::{BoardReconciler, DragTarget, DropOutcome, GesturePhase, Notice, RetryPolicy};
