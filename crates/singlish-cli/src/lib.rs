// singlish-cli: shared utilities for CLI tools.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;

use singlish_translit::handle::{ARTIFACT_FILE, EngineError, RULES_FILE};
use singlish_translit::{EngineOptions, TranslitHandle};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "SINGLISH_LOG";

/// Environment variable holding the data directory.
const DATA_PATH_ENV: &str = "SINGLISH_DATA_PATH";

/// Install a stderr subscriber filtered by `SINGLISH_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .try_init();
}

/// Build the list of directories to search for data files.
///
/// Search order:
/// 1. `data_path` argument (if provided)
/// 2. `SINGLISH_DATA_PATH` environment variable
/// 3. `~/.singlish`
/// 4. Current working directory
pub fn build_search_paths(data_path: Option<&str>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(p) = data_path {
        paths.push(PathBuf::from(p));
    }
    if let Ok(env_path) = std::env::var(DATA_PATH_ENV) {
        paths.push(PathBuf::from(env_path));
    }
    if let Some(home) = home_dir() {
        paths.push(home.join(".singlish"));
    }
    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd);
    }
    paths
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

fn describe_search_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First directory in the search order that contains `file`.
pub fn find_data_file(data_path: Option<&str>, file: &str) -> Result<PathBuf, String> {
    let search_paths = build_search_paths(data_path);
    search_paths
        .iter()
        .map(|dir| dir.join(file))
        .find(|p| p.is_file())
        .ok_or_else(|| {
            format!(
                "could not find {file} in any of the search paths:\n{}",
                describe_search_paths(&search_paths)
            )
        })
}

/// Load engine options from a TOML file, or defaults without one.
pub fn load_options(config_path: Option<&str>) -> Result<EngineOptions, String> {
    let Some(path) = config_path else {
        return Ok(EngineOptions::default());
    };
    let text =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read {path}: {e}"))?;
    EngineOptions::from_toml_str(&text).map_err(|e| format!("{path}: {e}"))
}

/// Find the compiled artifact and its rule source and create a handle.
pub fn load_handle(
    data_path: Option<&str>,
    config_path: Option<&str>,
) -> Result<TranslitHandle, String> {
    let options = load_options(config_path)?;
    let search_paths = build_search_paths(data_path);

    match search_paths
        .iter()
        .find(|dir| dir.join(ARTIFACT_FILE).is_file())
    {
        Some(dir) => TranslitHandle::from_dir(dir, options)
            .map_err(|e| format!("failed to load engine from {}: {e}", dir.display())),
        None => {
            let missing = EngineError::MissingArtifact {
                path: PathBuf::from(ARTIFACT_FILE),
            };
            Err(format!(
                "{missing}\nsearched (together with {RULES_FILE}):\n{}",
                describe_search_paths(&search_paths)
            ))
        }
    }
}

/// Remove `--NAME=VALUE`, `--NAME VALUE` or `-S VALUE` from `args`.
///
/// Returns `(value, remaining_args)`. A flag without a value is fatal.
pub fn take_option(args: &[String], long: &str, short: &str) -> (Option<String>, Vec<String>) {
    let prefix = format!("{long}=");
    let mut value = None;
    let mut remaining = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if let Some(val) = arg.strip_prefix(&prefix) {
            value = Some(val.to_string());
        } else if arg == long || arg == short {
            match iter.next() {
                Some(val) => value = Some(val.clone()),
                None => fatal(&format!("{arg} requires a value")),
            }
        } else {
            remaining.push(arg.clone());
        }
    }

    (value, remaining)
}

/// Parse a `--data-path=PATH` or `-d PATH` argument from command line args.
pub fn parse_data_path(args: &[String]) -> (Option<String>, Vec<String>) {
    take_option(args, "--data-path", "-d")
}

/// Parse a `--config=PATH` or `-c PATH` argument from command line args.
pub fn parse_config_path(args: &[String]) -> (Option<String>, Vec<String>) {
    take_option(args, "--config", "-c")
}

/// Positional arguments, or stdin lines when there are none.
///
/// Blank lines are skipped; a read error ends the input.
pub fn inputs(positional: Vec<String>) -> Box<dyn Iterator<Item = String>> {
    if !positional.is_empty() {
        return Box::new(positional.into_iter());
    }
    Box::new(
        io::stdin()
            .lock()
            .lines()
            .map_while(|line| match line {
                Ok(l) => Some(l),
                Err(e) => {
                    eprintln!("error reading stdin: {e}");
                    None
                }
            })
            .filter(|l| !l.trim().is_empty()),
    )
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

/// Check if `--help` or `-h` is in the args.
pub fn wants_help(args: &[String]) -> bool {
    args.iter().any(|a| a == "--help" || a == "-h")
}
