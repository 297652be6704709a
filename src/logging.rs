//! Tracing subscriber setup for the command-line tool

use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LOG_ENV_VAR;

#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Filter directive used when `POM_RELEASE_LOG` is not set
    pub level: String,
    pub json: bool,
    /// Also write plain-text logs to this file
    pub file: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the log file when dropped and must be held
/// until the program exits.
pub fn init(options: &LogOptions) -> anyhow::Result<Option<WorkerGuard>> {
    let directive = filter_directive(std::env::var(LOG_ENV_VAR).ok(), &options.level);
    let filter = EnvFilter::try_new(&directive)
        .or_else(|_| EnvFilter::try_new(&options.level))
        .with_context(|| format!("Invalid log filter: {}", directive))?;

    let (file_layer, guard) = match &options.file {
        Some(path) => {
            let dir = path
                .parent()
                .with_context(|| format!("Log file {:?} has no parent directory", path))?;
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file {:?} has no file name", path))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {:?}", dir))?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let plain = (!options.json).then(|| fmt::layer().with_writer(std::io::stderr));
    let json = options
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

fn filter_directive(env_value: Option<String>, level: &str) -> String {
    env_value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| level.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, "info", "info")]
    #[case(Some(""), "warn", "warn")]
    #[case(Some("  "), "warn", "warn")]
    #[case(Some("pom_release=debug"), "info", "pom_release=debug")]
    fn filter_directive_prefers_environment(
        #[case] env_value: Option<&str>,
        #[case] level: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(
            filter_directive(env_value.map(str::to_string), level),
            expected
        );
    }

    #[test]
    fn default_options_log_info_to_stderr() {
        let options = LogOptions::default();

        assert_eq!(options.level, "info");
        assert!(!options.json);
        assert!(options.file.is_none());
    }
}
