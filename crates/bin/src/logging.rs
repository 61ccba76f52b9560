//! Logging setup.
//!
//! Everything goes to stderr so stdout carries only screen results.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Build the filter, letting `RUST_LOG` override the command line.
fn build_filter(log_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Calling this twice is harmless.
pub(crate) fn init_logging(log_level: &str, log_format: LogFormat) {
    let filter = build_filter(log_level);
    let subscriber = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true);
            let _ = subscriber.with(fmt_layer).try_init();
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(false);
            let _ = subscriber.with(fmt_layer).try_init();
        }
    }

    tracing::debug!(log_level, ?log_format, "logging initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_falls_back() {
        // must not panic on garbage directives
        let _ = build_filter("not a level ===");
    }

    #[test]
    fn test_init_twice() {
        init_logging("debug", LogFormat::Pretty);
        init_logging("info", LogFormat::Json);
    }
}
