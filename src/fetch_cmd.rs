//! Fetch command: pull USGS daily values into the observation cache.

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use hydroval_io::{read_sites, write_observations};
use hydroval_series::DateRange;
use hydroval_usgs::UsgsClient;

use crate::cli::FetchArgs;
use crate::config::HydrovalConfig;
use crate::convert;

/// Run the observation fetch pipeline.
pub fn run(args: FetchArgs) -> Result<()> {
    let _cmd = info_span!("fetch").entered();

    // 1. Load project TOML
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: HydrovalConfig =
        toml::from_str(&toml_str).context("failed to parse TOML config")?;

    let range = DateRange::new(args.start, args.end.unwrap_or(args.start))
        .context("invalid validation window")?;

    // 2. Load site metadata and collect gauge ids
    let sites_path = config
        .io
        .sites
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("no sites path: set [io].sites in config"))?;
    let sites = read_sites(sites_path)
        .with_context(|| format!("failed to read sites: {}", sites_path.display()))?;

    let mut gauges: Vec<String> = sites.iter().filter_map(|s| s.gauge_id.clone()).collect();
    gauges.sort();
    gauges.dedup();
    if gauges.is_empty() {
        bail!("no sites carry a USGS gauge id");
    }
    info!(
        n_sites = sites.len(),
        n_gauges = gauges.len(),
        "site metadata loaded"
    );

    // 3. Fetch daily values
    let client = UsgsClient::new(convert::build_usgs_config(&config.usgs))
        .context("failed to build USGS client")?;
    info!(
        start = %range.start(),
        end = %range.end(),
        "fetching USGS daily values"
    );
    let observed = client
        .fetch_daily(&gauges, &range)
        .context("USGS fetch failed")?;
    info!(n_gauges = observed.len(), "observations retrieved");

    // 4. Write the cache
    let cache_path = args.output.unwrap_or(config.io.observations_cache);
    if let Some(parent) = cache_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    write_observations(&cache_path, &observed)
        .with_context(|| format!("failed to write cache: {}", cache_path.display()))?;
    info!(path = %cache_path.display(), "observation cache written");

    Ok(())
}
