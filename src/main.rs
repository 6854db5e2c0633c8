//! mpm-geocache - resolve ZIP codes from the command line
//!
//! Prints one JSON object per ZIP code on stdout. Logs go to stderr.

use clap::Parser;
use tracing::info;

use mpm_geocache::cli::{Cli, ResolutionLine, StartupConfig};
use mpm_geocache::{logging, GeoCache, GeoConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let startup = StartupConfig::from_cli(&cli);

    logging::init(startup.log_format)?;

    // Environment is read after logging so malformed overrides are reported
    let cache = GeoCache::from_config(startup.apply(GeoConfig::from_env()))?;
    let config = cache.config();
    info!(
        ttl = ?config.ttl,
        timeout = ?config.timeout,
        provider = config.has_api_key(),
        "Geocoding cache ready"
    );

    let lookups = cli.zips.iter().map(|zip| cache.resolve_with_source(zip));
    let results = futures::future::join_all(lookups).await;

    for (zip, resolved) in cli.zips.iter().zip(results) {
        let line = ResolutionLine::new(zip, resolved, startup.with_source);
        println!("{}", serde_json::to_string(&line)?);
    }

    if startup.show_stats {
        println!("{}", serde_json::json!({ "stats": cache.stats() }));
    }

    Ok(())
}
