use std::collections::BTreeMap;

use approx::assert_relative_eq;
use chrono::{DateTime, TimeZone, Utc};

use hydroval_series::TimeSeries;
use hydroval_validate::{RunConfig, SiteEntry, run, to_json};

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, d, 0, 0, 0).unwrap()
}

fn series(source: &str, values: &[f64]) -> TimeSeries {
    let points = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (day(i as u32 + 1), v))
        .collect();
    TimeSeries::new("site", source, points).unwrap()
}

/// Builds predictions whose errors against `obs` produce a chosen NSE.
///
/// With obs = [10, 20, 30, 40] (ss_tot = 500), a uniform residual d on
/// every point gives NSE = 1 - 4d^2/500.
fn pred_with_nse(obs: &[f64], target_nse: f64) -> Vec<f64> {
    let ss_tot = 500.0;
    let d = ((1.0 - target_nse) * ss_tot / obs.len() as f64).sqrt();
    obs.iter().map(|&v| v + d).collect()
}

#[test]
fn group_aggregates_ignore_skipped_sites() {
    let obs_values = [10.0, 20.0, 30.0, 40.0];
    let sites = vec![
        SiteEntry::new("tx-1", "TX"),
        SiteEntry::new("tx-2", "TX"),
        SiteEntry::new("tx-3", "TX"),
        SiteEntry::new("tx-4", "TX"),
    ];

    let mut observed = BTreeMap::new();
    let mut predicted = BTreeMap::new();
    for (id, nse) in [("tx-1", 0.2), ("tx-2", 0.3), ("tx-3", 0.4)] {
        observed.insert(id.to_string(), series("usgs", &obs_values));
        predicted.insert(
            id.to_string(),
            series("model-q50", &pred_with_nse(&obs_values, nse)),
        );
    }
    // tx-4 has no predicted series at all -> skipped with a reason.
    observed.insert("tx-4".to_string(), series("usgs", &obs_values));

    let table = run(
        &sites,
        &observed,
        &predicted,
        &RunConfig::new("model_vs_usgs"),
    );

    assert_eq!(table.n_computed(), 3);
    assert_eq!(table.n_skipped(), 1);

    let tx = &table.groups["TX"];
    assert_eq!(tx.n_sites, 3);
    assert_eq!(tx.n_skipped, 1);
    assert_relative_eq!(tx.mean.nse.unwrap(), 0.3, epsilon = 1e-9);
    assert_relative_eq!(tx.median.nse.unwrap(), 0.3, epsilon = 1e-9);

    match &table.sites["tx-4"] {
        hydroval_validate::SiteOutcome::Skipped { reason, .. } => {
            assert_eq!(reason, "no predicted series");
        }
        other => panic!("expected skip, got {other:?}"),
    }
}

#[test]
fn disjoint_site_is_skipped_not_fatal() {
    let sites = vec![SiteEntry::new("a", "CA"), SiteEntry::new("b", "CA")];

    let mut observed = BTreeMap::new();
    let mut predicted = BTreeMap::new();
    observed.insert("a".to_string(), series("usgs", &[10.0, 20.0, 30.0, 40.0]));
    predicted.insert(
        "a".to_string(),
        series("model-q50", &[12.0, 18.0, 33.0, 38.0]),
    );

    // Site b: observed and predicted share no timestamps.
    observed.insert(
        "b".to_string(),
        TimeSeries::new("b", "usgs", vec![(day(1), 1.0), (day(2), 2.0)]).unwrap(),
    );
    predicted.insert(
        "b".to_string(),
        TimeSeries::new("b", "model-q50", vec![(day(20), 1.0), (day(21), 2.0)]).unwrap(),
    );

    let table = run(
        &sites,
        &observed,
        &predicted,
        &RunConfig::new("model_vs_usgs"),
    );

    assert_eq!(table.n_computed(), 1);
    match &table.sites["b"] {
        hydroval_validate::SiteOutcome::Skipped { reason, .. } => {
            assert_eq!(reason, "no overlapping timestamps");
        }
        other => panic!("expected skip, got {other:?}"),
    }
}

#[test]
fn output_is_deterministic_for_identical_inputs() {
    let obs_values = [5.0, 8.0, 13.0, 21.0, 34.0];
    let sites: Vec<SiteEntry> = (0..8)
        .map(|i| SiteEntry::new(format!("site-{i}"), if i % 2 == 0 { "TX" } else { "NC" }))
        .collect();

    let mut observed = BTreeMap::new();
    let mut predicted = BTreeMap::new();
    for (i, site) in sites.iter().enumerate() {
        let pred_values: Vec<f64> = obs_values.iter().map(|&v| v + i as f64 * 0.5).collect();
        observed.insert(site.id.clone(), series("usgs", &obs_values));
        predicted.insert(site.id.clone(), series("model-q50", &pred_values));
    }

    let config = RunConfig::new("model_vs_usgs");
    let first = to_json(&run(&sites, &observed, &predicted, &config)).unwrap();
    let second = to_json(&run(&sites, &observed, &predicted, &config)).unwrap();

    assert_eq!(first, second);
}
