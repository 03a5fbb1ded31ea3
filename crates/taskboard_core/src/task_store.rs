use crate::error::AppError;
use crate::model::{Task, normalize_deadline};
use crate::storage::{KeyValueStore, TASKS_KEY};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

/// Owns the task sequence and mirrors it to `K` after every mutation.
///
/// Lookups that miss (`update`, `toggle_completion`, `delete`) are no-ops
/// returning `Ok(None)` and do not touch the backend.
#[derive(Debug)]
pub struct TaskStore<K: KeyValueStore> {
    backend: K,
    tasks: Vec<Task>,
    offset: UtcOffset,
}

impl<K: KeyValueStore> TaskStore<K> {
    pub fn load(backend: K) -> Result<Self, AppError> {
        let tasks = match backend.read(TASKS_KEY)? {
            Some(value) => serde_json::from_value::<Vec<Task>>(value)
                .map_err(|err| AppError::invalid_data(format!("{TASKS_KEY}: {err}")))?,
            None => Vec::new(),
        };

        for task in tasks.iter().filter(|task| task.deadline_at().is_none()) {
            tracing::warn!(task_id = %task.id, deadline = %task.deadline, "stored deadline is not RFC3339");
        }
        tracing::debug!(count = tasks.len(), "loaded tasks");

        Ok(Self {
            backend,
            tasks,
            offset: UtcOffset::UTC,
        })
    }

    /// Offset used to read wall-clock deadline input such as `2025-12-25 10:00`.
    pub fn with_offset(mut self, offset: UtcOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        let trimmed_id = id.trim();
        self.tasks.iter().find(|task| task.id == trimmed_id)
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut K {
        &mut self.backend
    }

    pub fn add(&mut self, title: &str, deadline: &str, now: OffsetDateTime) -> Result<Task, AppError> {
        let title = validate_title(title)?;
        let deadline = normalize_deadline(deadline, self.offset)?;
        let created_at = format_timestamp(now)?;

        let task = Task {
            id: self.next_id(now),
            title,
            deadline,
            completed: false,
            created_at,
            completed_at: None,
        };

        let mut candidate = self.tasks.clone();
        candidate.push(task.clone());
        self.commit(candidate)?;
        tracing::info!(task_id = %task.id, "added task");

        Ok(task)
    }

    /// Unknown ids are ignored before the new title and deadline are validated.
    pub fn update(&mut self, id: &str, title: &str, deadline: &str) -> Result<Option<Task>, AppError> {
        let Some(index) = self.position(id) else {
            tracing::debug!(id, "update ignored, no such task");
            return Ok(None);
        };
        let title = validate_title(title)?;
        let deadline = normalize_deadline(deadline, self.offset)?;

        let mut candidate = self.tasks.clone();
        let task = &mut candidate[index];
        task.title = title;
        task.deadline = deadline;
        let updated = task.clone();

        self.commit(candidate)?;
        tracing::info!(task_id = %updated.id, "updated task");

        Ok(Some(updated))
    }

    pub fn toggle_completion(&mut self, id: &str, now: OffsetDateTime) -> Result<Option<Task>, AppError> {
        let Some(index) = self.position(id) else {
            tracing::debug!(id, "toggle ignored, no such task");
            return Ok(None);
        };
        let completed_at = format_timestamp(now)?;

        let mut candidate = self.tasks.clone();
        let task = &mut candidate[index];
        task.completed = !task.completed;
        task.completed_at = task.completed.then_some(completed_at);
        let toggled = task.clone();

        self.commit(candidate)?;
        tracing::info!(task_id = %toggled.id, completed = toggled.completed, "toggled task");

        Ok(Some(toggled))
    }

    pub fn delete(&mut self, id: &str) -> Result<Option<Task>, AppError> {
        let Some(index) = self.position(id) else {
            tracing::debug!(id, "delete ignored, no such task");
            return Ok(None);
        };

        let mut candidate = self.tasks.clone();
        let removed = candidate.remove(index);
        self.commit(candidate)?;
        tracing::info!(task_id = %removed.id, "deleted task");

        Ok(Some(removed))
    }

    fn position(&self, id: &str) -> Option<usize> {
        let trimmed_id = id.trim();
        self.tasks.iter().position(|task| task.id == trimmed_id)
    }

    fn next_id(&self, now: OffsetDateTime) -> String {
        let mut nanos = now.unix_timestamp_nanos();
        loop {
            let id = format!("task-{nanos}");
            if !self.tasks.iter().any(|task| task.id == id) {
                return id;
            }
            nanos += 1;
        }
    }

    /// Writes `candidate` and adopts it only once the backend accepted it.
    fn commit(&mut self, candidate: Vec<Task>) -> Result<(), AppError> {
        let value = serde_json::to_value(&candidate)?;
        self.backend.write(TASKS_KEY, value)?;
        self.tasks = candidate;
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<String, AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("title is required"));
    }
    Ok(trimmed.to_string())
}

fn format_timestamp(instant: OffsetDateTime) -> Result<String, AppError> {
    instant
        .to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
