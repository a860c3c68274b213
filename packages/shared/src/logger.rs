//! Logging setup utilities for the Hiroba chat server.

use std::{fmt, str::FromStr};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, colored output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown log format '{other}' (expected 'pretty' or 'json')"
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Build the default filter directive, e.g. `hiroba_server=info,hiroba_shared=info`.
///
/// Crate names are normalized the way cargo normalizes them for log targets
/// (`-` becomes `_`).
pub fn default_directive(targets: &[&str], default_log_level: &str) -> String {
    targets
        .iter()
        .map(|target| format!("{}={}", target.replace('-', "_"), default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `targets` - Crates whose events are enabled by default (e.g. `["hiroba-server"]`)
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
/// * `format` - Pretty or JSON output
///
/// # Examples
///
/// ```no_run
/// use hiroba_shared::logger::{LogFormat, setup_logger};
///
/// setup_logger(&["hiroba-server"], "debug", LogFormat::Pretty);
/// ```
pub fn setup_logger(targets: &[&str], default_log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(targets, default_log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init(),
    }
}
