//! Structured logging setup
//!
//! Installs a global `tracing` subscriber writing to stderr, so stdout stays
//! free for command output. The filter defaults to `info` and honours
//! `RUST_LOG`.

use std::env;
use std::io;

use tracing_subscriber::{
    filter::Directive, fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError,
    EnvFilter,
};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-field human readable output
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
    /// Single-line output without targets
    Compact,
}

impl LogFormat {
    /// Parses a format name, case-insensitively
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }
}

/// Builds the level filter, keeping HTTP client internals quiet
fn build_filter() -> EnvFilter {
    let base = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let quiet = |directive: &str| {
        directive
            .parse::<Directive>()
            .unwrap_or_else(|_| tracing::Level::WARN.into())
    };
    EnvFilter::new(base)
        .add_directive(quiet("hyper=warn"))
        .add_directive(quiet("reqwest=warn"))
}

/// Initializes the global tracing subscriber
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(format: LogFormat) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(build_filter());

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_writer(io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_writer(io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(io::stderr),
            )
            .try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_names() {
        assert_eq!(LogFormat::from_str("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::from_str("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::from_str("compact"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::from_str("xml"), None);
    }

    #[test]
    fn test_default_is_pretty() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }
}
