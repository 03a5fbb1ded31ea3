use crate::model::Task;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub not_completed: usize,
    pub overdue: usize,
}

/// Counts over the full, unfiltered task sequence.
pub fn compute_stats(all: &[Task], now: OffsetDateTime) -> TaskStats {
    all.iter().fold(TaskStats::default(), |mut stats, task| {
        stats.total += 1;
        if task.completed {
            stats.completed += 1;
        } else {
            stats.not_completed += 1;
            if task.is_overdue(now) {
                stats.overdue += 1;
            }
        }
        stats
    })
}
