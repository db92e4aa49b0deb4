//! Validate command: run the three comparisons and write summaries.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use hydroval_io::{
    join_to_sites, read_nwm_series, read_observations, read_predictions, read_sites,
    write_summary_csv,
};
use hydroval_series::{DateRange, TimeSeries};
use hydroval_usgs::UsgsClient;
use hydroval_validate::{SiteEntry, SummaryTable, run as run_sites, to_json};

use crate::cli::ValidateArgs;
use crate::config::HydrovalConfig;
use crate::convert;

/// Run the full validation pipeline.
pub fn run(args: ValidateArgs) -> Result<()> {
    let _cmd = info_span!("validate").entered();

    // 1. Load project TOML
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let config: HydrovalConfig =
        toml::from_str(&toml_str).context("failed to parse TOML config")?;

    let range = DateRange::new(args.start, args.end.unwrap_or(args.start))
        .context("invalid validation window")?;

    // 2. Load site metadata
    let sites_path = config
        .io
        .sites
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("no sites path: set [io].sites in config"))?;
    let sites = read_sites(sites_path)
        .with_context(|| format!("failed to read sites: {}", sites_path.display()))?;
    if sites.is_empty() {
        bail!("site metadata file contains no sites");
    }
    info!(n_sites = sites.len(), "site metadata loaded");

    let entries: Vec<SiteEntry> = sites
        .iter()
        .map(|s| SiteEntry::new(&s.uuid, &s.state))
        .collect();

    // 3. Load model predictions
    let predictions_path = config
        .io
        .predictions
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("no predictions path: set [io].predictions in config"))?;
    let predictions = read_predictions(predictions_path, &range).with_context(|| {
        format!("failed to read predictions: {}", predictions_path.display())
    })?;
    let model: BTreeMap<String, TimeSeries> = predictions
        .into_iter()
        .map(|(site, series)| (site, series.q50))
        .collect();
    info!(n_sites = model.len(), "model predictions loaded");

    // 4. Load observations (cache or live), keyed by gauge, re-keyed by UUID
    let observed_by_gauge = if args.live {
        let mut gauges: Vec<String> = sites.iter().filter_map(|s| s.gauge_id.clone()).collect();
        gauges.sort();
        gauges.dedup();
        let client = UsgsClient::new(convert::build_usgs_config(&config.usgs))
            .context("failed to build USGS client")?;
        info!(n_gauges = gauges.len(), "fetching USGS daily values");
        client
            .fetch_daily(&gauges, &range)
            .context("USGS fetch failed")?
    } else {
        read_observations(&config.io.observations_cache, "usgs").with_context(|| {
            format!(
                "failed to read observation cache: {} (run `hydroval fetch` first)",
                config.io.observations_cache.display()
            )
        })?
    };

    let mut observed: BTreeMap<String, TimeSeries> = BTreeMap::new();
    for site in &sites {
        let Some(gauge) = site.gauge_id.as_ref() else {
            continue;
        };
        let Some(series) = observed_by_gauge.get(gauge) else {
            continue;
        };
        match TimeSeries::new(&site.uuid, "usgs", series.points().to_vec()) {
            Ok(ts) => {
                observed.insert(site.uuid.clone(), ts);
            }
            Err(e) => warn!(site = %site.uuid, error = %e, "dropping observed series"),
        }
    }
    info!(n_sites = observed.len(), "observations matched to sites");

    // 5. Load NWM predictions where configured
    let nwm: Option<BTreeMap<String, TimeSeries>> = match config.io.nwm_dir.as_ref() {
        Some(dir) => {
            let by_comid = read_nwm_series(dir, &range)
                .with_context(|| format!("failed to read NWM extracts: {}", dir.display()))?;
            let by_site = join_to_sites(&by_comid, &sites);
            info!(
                n_reaches = by_comid.len(),
                n_sites = by_site.len(),
                "NWM data joined to sites"
            );
            Some(by_site)
        }
        None => {
            info!("no [io].nwm_dir configured; skipping NWM comparisons");
            None
        }
    };

    // 6. Run the comparisons and write artifacts
    let output_dir = args.output.unwrap_or(config.io.output_dir);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let model_vs_usgs = run_sites(
        &entries,
        &observed,
        &model,
        &convert::build_run_config("model_vs_usgs", &config.align, &config.metrics),
    );
    write_summary(&output_dir, &model_vs_usgs)?;

    if let Some(nwm) = nwm {
        let nwm_vs_usgs = run_sites(
            &entries,
            &observed,
            &nwm,
            &convert::build_run_config("nwm_vs_usgs", &config.align, &config.metrics),
        );
        write_summary(&output_dir, &nwm_vs_usgs)?;

        // The NWM stands in for the reference here: how closely does the
        // model track the established baseline where gauges are absent.
        let model_vs_nwm = run_sites(
            &entries,
            &nwm,
            &model,
            &convert::build_run_config("model_vs_nwm", &config.align, &config.metrics),
        );
        write_summary(&output_dir, &model_vs_nwm)?;
    }

    Ok(())
}

/// Writes one comparison's CSV and JSON artifacts.
fn write_summary(output_dir: &Path, table: &SummaryTable) -> Result<()> {
    info!(
        comparison = %table.comparison,
        n_computed = table.n_computed(),
        n_skipped = table.n_skipped(),
        "comparison finished"
    );

    let csv_path = output_dir.join(format!("summary_{}.csv", table.comparison));
    write_summary_csv(&csv_path, table)
        .with_context(|| format!("failed to write {}", csv_path.display()))?;

    let json_path = output_dir.join(format!("summary_{}.json", table.comparison));
    let json = to_json(table).context("failed to serialize summary")?;
    std::fs::write(&json_path, &json)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    info!(
        csv = %csv_path.display(),
        json = %json_path.display(),
        "summary written"
    );
    Ok(())
}
