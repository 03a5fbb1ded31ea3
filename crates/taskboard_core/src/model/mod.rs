mod deadline;
mod task;

pub use deadline::{normalize_deadline, parse_instant};
pub use task::Task;
