pub mod header;
pub mod column;
pub mod task_card;
pub mod notice;
pub mod drag_ghost;

pub use header::KanbanHeader;
pub use column::KanbanColumn;
pub use task_card::TaskCard;
pub use notice::NoticeBanner;
pub use drag_ghost::DragGhost;
