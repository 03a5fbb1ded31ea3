use super::KeyValueStore;
use crate::error::AppError;
use serde_json::Value;
use std::collections::HashMap;

/// In-process backend with no durability, used by tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Value>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes performed since creation.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Value>, AppError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: Value) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }
}
