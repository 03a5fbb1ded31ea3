pub mod config;
pub mod error;
pub mod model;
pub mod profile;
pub mod query;
pub mod stats;
pub mod storage;
pub mod task_store;

pub use error::AppError;
pub use model::Task;
pub use query::{FilterMode, visible_tasks};
pub use stats::{TaskStats, compute_stats};
pub use task_store::TaskStore;

/// The host's local offset, or UTC when it cannot be determined.
pub fn local_offset() -> time::UtcOffset {
    time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC)
}
