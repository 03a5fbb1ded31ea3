pub mod json_store;
mod memory;

pub use json_store::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::AppError;
use serde_json::Value;

pub const TASKS_KEY: &str = "tasks";
pub const USER_NAME_KEY: &str = "userName";

/// Durable mapping from string keys to JSON values.
///
/// Every `write` replaces the whole value stored under the key and is
/// complete when it returns.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<Value>, AppError>;

    fn write(&mut self, key: &str, value: Value) -> Result<(), AppError>;
}
