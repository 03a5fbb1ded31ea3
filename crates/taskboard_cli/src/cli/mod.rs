use clap::{Parser, Subcommand};
use taskboard_core::FilterMode;
use taskboard_core::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(name = "taskboard", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    // Only declared so clap lists it in --help. `split_config_overrides` strips
    // these arguments before parsing, so this field is always empty.
    #[arg(
        long = "config-override",
        value_name = "KEY=VALUE",
        global = true,
        help = "Override configuration values (format KEY=VALUE)"
    )]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: taskboard add "Buy milk" "2025-12-25 10:00"
    /// Example: taskboard add "File taxes" 2026-04-15 (Defaults to midnight)
    Add {
        title: Option<String>,
        deadline: Option<String>,
    },
    /// Replace a task's title and deadline
    ///
    /// Example: taskboard edit task-1 "Buy oat milk" "2025-12-26 09:00"
    Edit {
        id: String,
        title: String,
        deadline: String,
    },
    /// Mark a task completed, or reopen a completed one
    ///
    /// Example: taskboard toggle task-1
    Toggle { id: String },
    /// Delete a task
    ///
    /// Example: taskboard delete task-1
    Delete { id: String },
    /// Show details of a task
    ///
    /// Example: taskboard show task-1
    Show { id: String },
    /// List tasks, incomplete first and then by deadline
    ///
    /// Example: taskboard list
    /// Example: taskboard list --search milk --filter due
    List {
        /// Case-insensitive title search
        #[arg(short, long, value_name = "TEXT")]
        search: Option<String>,
        /// One of: all, completed, not-completed, due
        #[arg(short, long, value_name = "MODE")]
        filter: Option<FilterMode>,
    },
    /// Show task counts
    ///
    /// Example: taskboard stats
    Stats,
    /// Show or set your display name
    ///
    /// Example: taskboard name
    /// Example: taskboard name "Ada"
    Name { name: Option<String> },
}

/// Flag name used to identify config override arguments by the runtime.
pub const CONFIG_OVERRIDE_FLAG: &str = "--config-override";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    DefaultFilter,
    LogFilter,
    Alias(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = key_raw
        .split_once('.')
        .map(|(field, rest)| (field.trim(), Some(rest.trim())))
        .unwrap_or((key_raw.trim(), None));

    let canonical_field =
        canonicalize_flag_name(field).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match canonical_field.as_str() {
        "default_filter" | "filter" => ConfigOverrideTarget::DefaultFilter,
        "log_filter" | "log" => ConfigOverrideTarget::LogFilter,
        "aliases" | "alias" => {
            let alias_name = remainder
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| "aliases override requires an alias name".to_string())?;
            return Ok(ParsedConfigOverride {
                target: ConfigOverrideTarget::Alias(alias_name.to_string()),
                value,
            });
        }
        other => return Err(format!("unknown config field '{other}'")),
    };

    if remainder.is_some() {
        return Err(format!("{canonical_field} override cannot have subfields"));
    }

    Ok(ParsedConfigOverride { target, value })
}

/// Fold raw override strings into `ConfigOverrides`; later values win.
pub fn collect_config_overrides<S: AsRef<str>>(raw: &[S]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry.as_ref())?;
        match parsed.target {
            ConfigOverrideTarget::DefaultFilter => {
                let mode = parsed
                    .value
                    .parse::<FilterMode>()
                    .map_err(|err| err.message().to_string())?;
                overrides.default_filter = Some(mode);
            }
            ConfigOverrideTarget::LogFilter => overrides.log_filter = Some(parsed.value),
            ConfigOverrideTarget::Alias(name) => {
                overrides.aliases.insert(name, parsed.value);
            }
        }
    }
    Ok(overrides)
}

/// Pull `--config-override` values out of raw arguments, before aliases are
/// expanded. Both `--config-override V` and `--config-override=V` are accepted.
pub fn split_config_overrides(args: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut overrides = Vec::new();
    let mut rest = Vec::with_capacity(args.len());
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        if arg == CONFIG_OVERRIDE_FLAG {
            if let Some(value) = iter.next() {
                overrides.push(value);
            } else {
                rest.push(arg);
            }
        } else if let Some(value) = arg
            .strip_prefix(CONFIG_OVERRIDE_FLAG)
            .and_then(|tail| tail.strip_prefix('='))
        {
            overrides.push(value.to_string());
        } else {
            rest.push(arg);
        }
    }

    (overrides, rest)
}

fn canonicalize_flag_name(name: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Cli, Command, ConfigOverrideTarget, collect_config_overrides, parse_config_override,
        split_config_overrides,
    };
    use clap::{CommandFactory, Parser};
    use taskboard_core::FilterMode;

    #[test]
    fn help_lists_config_override_flag() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("--config-override <KEY=VALUE>"));
    }

    #[test]
    fn parse_config_override_canonicalizes_field_names() {
        let parsed = parse_config_override(" Default-Filter = due ").unwrap();

        assert_eq!(parsed.target, ConfigOverrideTarget::DefaultFilter);
        assert_eq!(parsed.value, "due");
    }

    #[test]
    fn parse_config_override_rejects_empty_alias_name() {
        let err = parse_config_override("aliases. = foo").unwrap_err();
        assert!(err.contains("aliases override requires an alias name"));
    }

    #[test]
    fn parse_config_override_rejects_unknown_fields() {
        let err = parse_config_override("theme=noir").unwrap_err();
        assert!(err.contains("unknown config field"));
    }

    #[test]
    fn parse_config_override_rejects_subfields_on_scalars() {
        let err = parse_config_override("log_filter.level=debug").unwrap_err();
        assert!(err.contains("cannot have subfields"));
    }

    #[test]
    fn parse_config_override_rejects_missing_equals() {
        let err = parse_config_override("aliasesls").unwrap_err();
        assert!(err.contains("KEY=VALUE"));
    }

    #[test]
    fn parse_config_override_trims_whitespace_for_alias_names() {
        let parsed = parse_config_override("aliases. due = list --filter due").unwrap();

        match parsed.target {
            ConfigOverrideTarget::Alias(alias) => assert_eq!(alias, "due"),
            other => panic!("unexpected target: {other:?}"),
        }
        assert_eq!(parsed.value, "list --filter due");
    }

    #[test]
    fn collect_config_overrides_validates_filter_modes() {
        let overrides =
            collect_config_overrides(&["default_filter=not-completed", "log=debug"]).unwrap();
        assert_eq!(overrides.default_filter, Some(FilterMode::NotCompleted));
        assert_eq!(overrides.log_filter.as_deref(), Some("debug"));

        let err = collect_config_overrides(&["default_filter=someday"]).unwrap_err();
        assert!(err.contains("unknown filter"));
    }

    #[test]
    fn split_config_overrides_handles_both_spellings() {
        let args = ["--config-override", "log=debug", "list", "--config-override=filter=due"]
            .into_iter()
            .map(String::from)
            .collect();

        let (overrides, rest) = split_config_overrides(args);

        assert_eq!(overrides, vec!["log=debug", "filter=due"]);
        assert_eq!(rest, vec!["list"]);
    }

    #[test]
    fn list_parses_search_and_filter() {
        let cli = Cli::try_parse_from(["taskboard", "list", "-s", "milk", "--filter", "due"]).unwrap();

        match cli.command {
            Command::List { search, filter } => {
                assert_eq!(search.as_deref(), Some("milk"));
                assert_eq!(filter, Some(FilterMode::Due));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn list_rejects_unknown_filter() {
        assert!(Cli::try_parse_from(["taskboard", "list", "--filter", "later"]).is_err());
    }
}
