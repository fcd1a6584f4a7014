pub mod task;

pub use task::{ProjectRef, Task, TaskStatus, UserRef};
