use crate::error::AppError;
use crate::query::FilterMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKBOARD_CONFIG_PATH";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Filter applied by `list` when none is given.
    #[serde(default)]
    pub default_filter: Option<FilterMode>,
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    /// `tracing` filter directives, used when `TASKBOARD_LOG` is unset.
    #[serde(default)]
    pub log_filter: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub default_filter: Option<FilterMode>,
    pub log_filter: Option<String>,
    pub aliases: HashMap<String, String>,
}

impl Config {
    pub fn filter_or_default(&self) -> FilterMode {
        self.default_filter.unwrap_or_default()
    }

    /// Expands `args[0]` when it names an alias. The alias value is split on
    /// whitespace and the remaining arguments are appended unchanged.
    pub fn expand_alias(&self, args: Vec<String>) -> Vec<String> {
        let Some(first) = args.first() else {
            return args;
        };
        let Some(expansion) = self.aliases.get(first) else {
            return args;
        };

        let mut expanded: Vec<String> = expansion.split_whitespace().map(str::to_string).collect();
        if expanded.is_empty() {
            return args;
        }
        tracing::debug!(alias = %first, expansion = %expansion, "expanded alias");
        expanded.extend(args.into_iter().skip(1));
        expanded
    }
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("taskboard")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("taskboard")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    Ok(normalize_config(config))
}

fn normalize_config(mut config: Config) -> Config {
    config.log_filter = config
        .log_filter
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    config
        .aliases
        .retain(|alias, value| !alias.trim().is_empty() && !value.trim().is_empty());
    config
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(mode) = overrides.default_filter {
        merged.default_filter = Some(mode);
    }

    if let Some(filter) = overrides.log_filter.as_ref() {
        merged.log_filter = Some(filter.clone());
    }

    for (alias, value) in overrides.aliases.iter() {
        merged.aliases.insert(alias.clone(), value.clone());
    }

    normalize_config(merged)
}
