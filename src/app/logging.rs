//! Tracing subscriber setup.
//!
//! - `RUST_LOG` sets the filter (default: `loan_wizard=warn` on the CLI,
//!   `loan_wizard=debug` when logging the TUI to a file)
//! - `LOG_FORMAT` picks `json`, `pretty` or the compact default
//! - `LOAN_WIZARD_LOG` names the log file for the TUI; the TUI owns the
//!   terminal, so without it the interactive mode does not log at all

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::AppError;

pub const ENV_LOG_FILE: &str = "LOAN_WIZARD_LOG";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

pub fn init(interactive: bool) -> Result<(), AppError> {
    let log_file = std::env::var(ENV_LOG_FILE).ok().filter(|s| !s.trim().is_empty());

    let (writer, to_file, default_filter) = match (interactive, log_file) {
        (true, None) => return Ok(()),
        (_, Some(path)) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| AppError::usage(format!("Failed to open log file '{path}': {e}")))?;
            (BoxMakeWriter::new(Mutex::new(file)), true, "loan_wizard=debug")
        }
        (false, None) => (BoxMakeWriter::new(std::io::stderr), false, "loan_wizard=warn"),
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let format = LogFormat::parse(std::env::var(ENV_LOG_FORMAT).ok().as_deref());
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_ansi(!to_file)
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_ansi(!to_file)
                    .with_writer(writer),
            )
            .try_init(),
    };

    // An already-installed subscriber stays in place.
    installed.ok();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parsing() {
        assert_eq!(LogFormat::parse(Some("JSON")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some(" pretty ")), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(Some("other")), LogFormat::Compact);
        assert_eq!(LogFormat::parse(None), LogFormat::Compact);
    }
}
