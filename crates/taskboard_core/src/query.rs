use crate::error::AppError;
use crate::model::Task;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    #[default]
    All,
    Completed,
    NotCompleted,
    Due,
}

impl FilterMode {
    pub const MODES: [FilterMode; 4] = [
        FilterMode::All,
        FilterMode::Completed,
        FilterMode::NotCompleted,
        FilterMode::Due,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::NotCompleted => "not-completed",
            Self::Due => "due",
        }
    }

    pub fn matches(self, task: &Task, now: OffsetDateTime) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.completed,
            Self::NotCompleted => !task.completed,
            Self::Due => task.is_overdue(now),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "all" => Ok(Self::All),
            "completed" | "done" => Ok(Self::Completed),
            "not-completed" | "notcompleted" | "pending" => Ok(Self::NotCompleted),
            "due" | "overdue" => Ok(Self::Due),
            _ => Err(AppError::invalid_input(format!(
                "unknown filter '{}', expected one of: all, completed, not-completed, due",
                raw.trim()
            ))),
        }
    }
}

/// Case-insensitive title match; an empty query matches every task.
///
/// The query is used as given, so leading or trailing spaces must match too.
pub fn matches_search(task: &Task, query: &str) -> bool {
    query.is_empty() || task.title.to_lowercase().contains(&query.to_lowercase())
}

/// Tasks passing both the search text and `mode`, incomplete first, then by deadline.
///
/// The sort is stable, so equal deadlines keep their input order. Deadlines that
/// do not parse sort after every valid one within their bucket.
pub fn visible_tasks(all: &[Task], query: &str, mode: FilterMode, now: OffsetDateTime) -> Vec<Task> {
    let mut keyed: Vec<(Option<OffsetDateTime>, &Task)> = all
        .iter()
        .filter(|task| matches_search(task, query) && mode.matches(task, now))
        .map(|task| (task.deadline_at(), task))
        .collect();

    keyed.sort_by(|(left_deadline, left), (right_deadline, right)| {
        left.completed
            .cmp(&right.completed)
            .then_with(|| compare_deadlines(*left_deadline, *right_deadline))
    });

    keyed.into_iter().map(|(_, task)| task.clone()).collect()
}

fn compare_deadlines(left: Option<OffsetDateTime>, right: Option<OffsetDateTime>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
