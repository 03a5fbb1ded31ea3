use crate::error::AppError;
use crate::storage::{KeyValueStore, USER_NAME_KEY};
use serde_json::Value;

pub fn load_user_name<K: KeyValueStore + ?Sized>(backend: &K) -> Result<Option<String>, AppError> {
    match backend.read(USER_NAME_KEY)? {
        None => Ok(None),
        Some(Value::String(name)) => Ok(Some(name)),
        Some(_) => Err(AppError::invalid_data(format!(
            "{USER_NAME_KEY} must be a string"
        ))),
    }
}

/// Stores the trimmed display name. Blank names are rejected and never written.
pub fn save_user_name<K: KeyValueStore + ?Sized>(
    backend: &mut K,
    name: &str,
) -> Result<String, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("name is required"));
    }

    backend.write(USER_NAME_KEY, Value::String(trimmed.to_string()))?;
    tracing::info!("updated user name");
    Ok(trimmed.to_string())
}
