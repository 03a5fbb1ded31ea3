use super::KeyValueStore;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "store.json";
const STORE_ENV_VAR: &str = "TASKBOARD_STORE_PATH";

#[derive(Debug, Serialize, Deserialize)]
struct StoredEntries {
    schema_version: u32,
    #[serde(default)]
    entries: Map<String, Value>,
}

/// Key-value backend kept in a single JSON file.
///
/// The whole file is read once on open and rewritten on every `write`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("taskboard").join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("taskboard")
            .join(STORE_FILE_NAME))
    }
}

impl JsonFileStore {
    pub fn open_default() -> Result<Self, AppError> {
        let path = store_path()?;
        Self::open(&path)
    }

    pub fn open(path: &Path) -> Result<Self, AppError> {
        let entries = load_entries(path)?;
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened store");
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: Map<String, Value>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let stored = StoredEntries {
            schema_version: SCHEMA_VERSION,
            entries,
        };
        let content = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&self.path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions)?;
        }

        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<Value>, AppError> {
        Ok(self.entries.get(key).cloned())
    }

    /// The in-memory entry is replaced only after the file write succeeds.
    fn write(&mut self, key: &str, value: Value) -> Result<(), AppError> {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), value.clone());
        self.flush(entries)?;
        self.entries.insert(key.to_string(), value);
        tracing::debug!(path = %self.path.display(), key, "flushed store");
        Ok(())
    }
}

fn load_entries(path: &Path) -> Result<Map<String, Value>, AppError> {
    if !path.exists() {
        return Ok(Map::new());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let stored: StoredEntries = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;

    if stored.schema_version != SCHEMA_VERSION {
        return Err(AppError::invalid_data("schema_version mismatch"));
    }

    Ok(stored.entries)
}
