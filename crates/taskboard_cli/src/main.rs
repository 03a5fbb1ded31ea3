use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use taskboard_cli::cli::{Cli, Command, collect_config_overrides, split_config_overrides};
use taskboard_cli::render;
use taskboard_core::config::{Config, load_config_with_fallback, merge_overrides};
use taskboard_core::storage::JsonFileStore;
use taskboard_core::{AppError, TaskStore, compute_stats, profile, visible_tasks};
use time::OffsetDateTime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_ENV_VAR: &str = "TASKBOARD_LOG";

struct Session {
    store: TaskStore<JsonFileStore>,
    config: Config,
}

impl Session {
    fn open(config: Config) -> Result<Self, AppError> {
        let offset = taskboard_core::local_offset();
        let store = TaskStore::load(JsonFileStore::open_default()?)?.with_offset(offset);
        tracing::debug!(path = %store.backend().path().display(), "session ready");
        Ok(Self { store, config })
    }

    fn run_command(&mut self, cli: Cli) -> Result<(), AppError> {
        let now = OffsetDateTime::now_utc();
        match cli.command {
            Command::Add { title, deadline } => {
                let task = self.store.add(
                    title.as_deref().unwrap_or_default(),
                    deadline.as_deref().unwrap_or_default(),
                    now,
                )?;
                if cli.json {
                    println!("{}", render::task_json(&task, now));
                } else {
                    println!("Added task: {} ({}) due {}", task.title, task.id, task.deadline);
                }
            }
            Command::Edit {
                id,
                title,
                deadline,
            } => match self.store.update(&id, &title, &deadline)? {
                Some(task) if cli.json => println!("{}", render::task_json(&task, now)),
                Some(task) => println!("Updated task: {} ({})", task.title, task.id),
                None => print_missing(&id, cli.json),
            },
            Command::Toggle { id } => match self.store.toggle_completion(&id, now)? {
                Some(task) if cli.json => println!("{}", render::task_json(&task, now)),
                Some(task) if task.completed => {
                    println!("Completed task: {} ({})", task.title, task.id)
                }
                Some(task) => println!("Reopened task: {} ({})", task.title, task.id),
                None => print_missing(&id, cli.json),
            },
            Command::Delete { id } => match self.store.delete(&id)? {
                Some(task) if cli.json => println!("{}", render::task_json(&task, now)),
                Some(task) => println!("Deleted task: {} ({})", task.title, task.id),
                None => print_missing(&id, cli.json),
            },
            Command::Show { id } => {
                let task = self
                    .store
                    .get(&id)
                    .ok_or_else(|| AppError::invalid_input("task not found"))?;
                if cli.json {
                    println!("{}", render::task_json(task, now));
                } else {
                    println!("{}", render::task_detail(task, now));
                }
            }
            Command::List { search, filter } => {
                let query = search.unwrap_or_default();
                let mode = filter.unwrap_or_else(|| self.config.filter_or_default());
                let tasks = visible_tasks(self.store.tasks(), &query, mode, now);
                if cli.json {
                    println!("{}", render::tasks_json(&tasks, now));
                } else if tasks.is_empty() {
                    if self.store.tasks().is_empty() {
                        println!("No tasks yet. Add one with `taskboard add`.");
                    } else {
                        println!("No tasks match your criteria.");
                    }
                } else {
                    println!("{}", render::tasks_table(&tasks, now));
                }
            }
            Command::Stats => {
                let stats = compute_stats(self.store.tasks(), now);
                if cli.json {
                    println!("{}", render::stats_json(&stats)?);
                } else {
                    println!("{}", render::stats_plain(&stats));
                }
            }
            Command::Name { name } => {
                let current = match name {
                    Some(name) => Some(profile::save_user_name(self.store.backend_mut(), &name)?),
                    None => profile::load_user_name(self.store.backend())?,
                };
                if cli.json {
                    println!("{}", serde_json::json!({ "userName": current }));
                } else {
                    match current {
                        Some(name) => println!("Hello, {name}"),
                        None => println!("No name set. Set one with `taskboard name <NAME>`."),
                    }
                }
            }
        }

        Ok(())
    }
}

fn print_missing(id: &str, json: bool) {
    if json {
        println!("null");
    } else {
        println!("No task with id {}", id.trim());
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

/// Expands an alias found at the first non-flag argument.
fn expand_alias(config: &Config, args: Vec<String>) -> Vec<String> {
    let split = args
        .iter()
        .position(|arg| !arg.starts_with('-'))
        .unwrap_or(args.len());
    let mut args = args;
    let rest = args.split_off(split);
    args.extend(config.expand_alias(rest));
    args
}

fn parse_cli(config: &Config, args: Vec<String>) -> Result<Cli, clap::Error> {
    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push("taskboard".to_string());
    argv.extend(expand_alias(config, args));
    Cli::try_parse_from(argv)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_interactive(session: &mut Session) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock.read_line(&mut input)?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) if args.is_empty() => continue,
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        let (overrides, args) = split_config_overrides(args);
        if !overrides.is_empty() {
            eprintln!(
                "ERROR: {}",
                AppError::invalid_input("config overrides only apply at startup")
            );
            continue;
        }

        let cli = match parse_cli(&session.config, args) {
            Ok(cli) => cli,
            Err(err) if !err.use_stderr() => {
                println!("{err}");
                continue;
            }
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = session.run_command(cli) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

/// Filter comes from `TASKBOARD_LOG`, then the config's `log_filter`, else warnings only.
fn init_tracing(config: &Config) {
    let filter = std::env::var(LOG_ENV_VAR)
        .ok()
        .or_else(|| config.log_filter.clone())
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn load_config(overrides: &[String]) -> Result<Config, AppError> {
    let loaded = load_config_with_fallback();
    let overrides = collect_config_overrides(overrides).map_err(AppError::invalid_input)?;
    let config = merge_overrides(&loaded.config, &overrides);
    init_tracing(&config);

    if let Some(err) = loaded.error {
        tracing::warn!(error = %err, "using default configuration");
    }
    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), AppError> {
    let (raw_overrides, args) = split_config_overrides(args);
    let config = load_config(&raw_overrides)?;

    if args.is_empty() {
        let mut session = Session::open(config)?;
        return run_interactive(&mut session);
    }

    let cli = match parse_cli(&config, args) {
        Ok(cli) => cli,
        // `--help` and `--version` print through clap and exit 0.
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => return Err(normalize_parse_error(err)),
    };
    let mut session = Session::open(config)?;
    session.run_command(cli)
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Err(err) = run(args) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
