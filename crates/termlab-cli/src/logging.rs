//! Diagnostics go to stderr through `tracing-subscriber`, keeping stdout
//! for shell output.

use std::env;

use tracing_subscriber::EnvFilter;

use crate::config::{DEFAULT_LOG_LEVEL, LOG_ENV};
use crate::error::CliError;

/// `--log-level`, then `TERMLAB_LOG`, then the config file, then
/// [`DEFAULT_LOG_LEVEL`].
fn pick_level<'a>(flag: Option<&'a str>, env: Option<&'a str>, config: Option<&'a str>) -> &'a str {
    flag.or(env).or(config).unwrap_or(DEFAULT_LOG_LEVEL)
}

pub fn build_filter(flag: Option<&str>, config: Option<&str>) -> Result<EnvFilter, CliError> {
    let env_level = env::var(LOG_ENV).ok();
    let level = pick_level(flag, env_level.as_deref(), config);

    EnvFilter::try_new(level).map_err(|source| CliError::LogLevel {
        level: level.to_string(),
        source,
    })
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(flag: Option<&str>, config: Option<&str>) -> Result<(), CliError> {
    let filter = build_filter(flag, config)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_priority() {
        assert_eq!(pick_level(Some("debug"), Some("info"), Some("error")), "debug");
        assert_eq!(pick_level(None, Some("info"), Some("error")), "info");
        assert_eq!(pick_level(None, None, Some("error")), "error");
        assert_eq!(pick_level(None, None, None), "warn");
    }

    #[test]
    fn test_invalid_level() {
        assert!(matches!(
            build_filter(Some("termlab=loud"), None),
            Err(CliError::LogLevel { .. })
        ));
    }
}
