use super::deadline::parse_instant;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub deadline: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

impl Task {
    /// Parsed deadline, or `None` when the stored value is not RFC 3339.
    pub fn deadline_at(&self) -> Option<OffsetDateTime> {
        parse_instant(&self.deadline)
    }

    /// An incomplete task is overdue when its deadline is strictly before `now`.
    /// Unparseable deadlines always count as overdue.
    pub fn is_overdue(&self, now: OffsetDateTime) -> bool {
        if self.completed {
            return false;
        }
        match self.deadline_at() {
            Some(deadline) => deadline < now,
            None => true,
        }
    }
}
