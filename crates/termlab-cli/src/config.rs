//! Command-line arguments and the optional TOML config file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::error::CliError;

/// Log level used when neither a flag, `TERMLAB_LOG` nor the config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "TERMLAB_LOG";

#[derive(Parser, Debug, Default)]
#[command(name = "termlab")]
#[command(about = "A sandbox shell for practicing filesystem commands")]
#[command(version)]
pub struct Args {
    /// Run this line and exit (repeat to run several in order)
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    pub commands: Vec<String>,

    /// Load the session from FILE and save it back after every command
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Print each result as a JSON object
    #[arg(long)]
    pub json: bool,

    /// Read settings from a TOML file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `termlab_core=trace`
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,
}

/// Settings read from the config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub state_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub show_hints: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            state_file: None,
            log_level: None,
            show_hints: true,
        }
    }
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Effective settings: flags over config file over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub state_file: Option<PathBuf>,
    pub log_level: Option<String>,
    pub json: bool,
    pub show_hints: bool,
}

impl Settings {
    pub fn resolve(args: &Args, config: CliConfig) -> Self {
        Self {
            state_file: args.state.clone().or(config.state_file),
            log_level: args.log_level.clone().or(config.log_level),
            json: args.json,
            show_hints: config.show_hints,
        }
    }
}
