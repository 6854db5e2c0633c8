//! Command-line interface parsing for the geocoding cache
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a `StartupConfig`. Flag values override the `GEOCODE_*` environment.

use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use thiserror::Error;

use crate::config::GeoConfig;
use crate::data::{Coordinates, Resolved, Source};
use crate::logging::LogFormat;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified log format is not recognized
    #[error("Invalid log format: '{0}'. Valid formats: pretty, json, compact")]
    InvalidLogFormat(String),
}

/// Resolve US ZIP codes to coordinates through the cached geocoder
#[derive(Parser, Debug)]
#[command(name = "mpm-geocache")]
#[command(about = "Resolve US ZIP codes to coordinates with caching and offline fallback")]
#[command(version)]
pub struct Cli {
    /// ZIP codes to resolve (five digits each)
    ///
    /// Examples:
    ///   mpm-geocache 90210
    ///   mpm-geocache --with-source 90210 10001
    #[arg(required = true, value_name = "ZIP")]
    pub zips: Vec<String>,

    /// Cache freshness window in milliseconds (overrides GEOCODE_TTL_MS)
    #[arg(long, value_name = "MS")]
    pub ttl_ms: Option<u64>,

    /// Provider timeout in milliseconds (overrides GEOCODE_TIMEOUT_MS)
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Include which source (cache, provider, fallback) served each result
    #[arg(long)]
    pub with_source: bool,

    /// Print cache statistics after all lookups
    #[arg(long)]
    pub stats: bool,

    /// Log output format: pretty, json, compact
    #[arg(long, value_name = "FORMAT", default_value = "pretty", value_parser = parse_log_format)]
    pub log_format: LogFormat,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    pub log_format: LogFormat,
    pub with_source: bool,
    pub show_stats: bool,
    /// TTL override from `--ttl-ms`
    pub ttl: Option<Duration>,
    /// Timeout override from `--timeout-ms`
    pub timeout: Option<Duration>,
}

/// Parses a log format argument.
///
/// # Returns
/// * `Ok(LogFormat)` if the string names a known format
/// * `Err(CliError::InvalidLogFormat)` otherwise
pub fn parse_log_format(s: &str) -> Result<LogFormat, CliError> {
    LogFormat::from_str(s).ok_or_else(|| CliError::InvalidLogFormat(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// The log format is already validated by clap while parsing.
    pub fn from_cli(cli: &Cli) -> Self {
        StartupConfig {
            log_format: cli.log_format,
            with_source: cli.with_source,
            show_stats: cli.stats,
            ttl: cli.ttl_ms.map(Duration::from_millis),
            timeout: cli.timeout_ms.map(Duration::from_millis),
        }
    }

    /// Applies the CLI overrides on top of an environment-derived config
    pub fn apply(&self, mut config: GeoConfig) -> GeoConfig {
        if let Some(ttl) = self.ttl {
            config.ttl = ttl;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        config
    }
}

/// One line of command output
#[derive(Debug, Serialize)]
pub struct ResolutionLine<'a> {
    pub zip: &'a str,
    /// `null` when the ZIP could not be resolved
    pub coordinates: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

impl<'a> ResolutionLine<'a> {
    pub fn new(zip: &'a str, resolved: Option<Resolved>, with_source: bool) -> Self {
        Self {
            zip,
            coordinates: resolved.map(|r| r.coordinates),
            source: resolved.filter(|_| with_source).map(|r| r.source),
        }
    }
}
