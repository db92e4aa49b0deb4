//! Report command: render validation summaries as a Markdown document.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use hydroval_validate::{AggregateStats, SiteOutcome, SummaryTable};

use crate::cli::ReportArgs;

/// Run the report renderer.
pub fn run(args: ReportArgs) -> Result<()> {
    let _cmd = info_span!("report").entered();

    let mut tables = Vec::new();
    for path in &args.summaries {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read summary: {}", path.display()))?;
        let table: SummaryTable = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse summary: {}", path.display()))?;
        tables.push(table);
    }

    let markdown = render(&tables);
    std::fs::write(&args.output, markdown)
        .with_context(|| format!("failed to write report: {}", args.output.display()))?;
    info!(path = %args.output.display(), "report written");

    Ok(())
}

/// Renders all comparisons into one Markdown document.
fn render(tables: &[SummaryTable]) -> String {
    let mut out = String::new();
    out.push_str("# Streamflow Model Validation Report\n\n");
    out.push_str(
        "Goodness-of-fit of forecast flows against reference data, per site \
         and aggregated by state. Metrics left blank were undefined for the \
         underlying data (for example a constant observed series).\n",
    );

    for table in tables {
        let _ = write!(
            out,
            "\n## {}\n\nSites: {} computed, {} skipped.\n\n",
            table.comparison,
            table.n_computed(),
            table.n_skipped()
        );

        out.push_str(
            "| group | sites | NSE | log-NSE | KGE | PBIAS (%) | RMSE (CFS) | r² | cat. acc. |\n\
             |---|---|---|---|---|---|---|---|---|\n",
        );
        for (group, aggregate) in &table.groups {
            push_group_row(&mut out, group, "mean", aggregate.n_sites, &aggregate.mean);
            push_group_row(&mut out, group, "median", aggregate.n_sites, &aggregate.median);
        }

        let reasons = skip_reasons(table);
        if !reasons.is_empty() {
            out.push_str("\nSkip reasons:\n\n| reason | sites |\n|---|---|\n");
            for (reason, count) in reasons {
                let _ = writeln!(out, "| {reason} | {count} |");
            }
        }
    }

    out
}

fn push_group_row(out: &mut String, group: &str, stat: &str, n: usize, stats: &AggregateStats) {
    let _ = writeln!(
        out,
        "| {group} ({stat}) | {n} | {} | {} | {} | {} | {} | {} | {} |",
        fmt(stats.nse),
        fmt(stats.log_nse),
        fmt(stats.kge),
        fmt(stats.pbias),
        fmt(stats.rmse),
        fmt(stats.r2),
        fmt(stats.categorical_accuracy),
    );
}

/// Counts skipped sites per reason, alphabetically.
fn skip_reasons(table: &SummaryTable) -> BTreeMap<String, usize> {
    let mut reasons = BTreeMap::new();
    for outcome in table.sites.values() {
        if let SiteOutcome::Skipped { reason, .. } = outcome {
            *reasons.entry(reason.clone()).or_default() += 1;
        }
    }
    reasons
}

fn fmt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3}"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydroval_metrics::MetricRecord;
    use hydroval_validate::GroupAggregate;

    fn table() -> SummaryTable {
        let mut sites = BTreeMap::new();
        sites.insert(
            "a".to_string(),
            SiteOutcome::Computed {
                group: "TX".to_string(),
                metrics: MetricRecord {
                    n: 4,
                    nse: Some(0.958),
                    log_nse: None,
                    kge: Some(0.91),
                    pbias: Some(1.0),
                    rmse: 2.29,
                    mae: 2.25,
                    log_rmse: None,
                    r: Some(0.99),
                    r2: Some(0.98),
                    categorical_accuracy: 1.0,
                },
            },
        );
        sites.insert(
            "b".to_string(),
            SiteOutcome::Skipped {
                group: "TX".to_string(),
                reason: "no observed series".to_string(),
            },
        );

        let mut groups = BTreeMap::new();
        groups.insert(
            "TX".to_string(),
            GroupAggregate {
                n_sites: 1,
                n_skipped: 1,
                mean: AggregateStats {
                    nse: Some(0.958),
                    rmse: Some(2.29),
                    ..AggregateStats::default()
                },
                median: AggregateStats {
                    nse: Some(0.958),
                    rmse: Some(2.29),
                    ..AggregateStats::default()
                },
            },
        );

        SummaryTable {
            comparison: "model_vs_usgs".to_string(),
            sites,
            groups,
        }
    }

    #[test]
    fn test_render_structure() {
        let markdown = render(&[table()]);

        assert!(markdown.starts_with("# Streamflow Model Validation Report"));
        assert!(markdown.contains("## model_vs_usgs"));
        assert!(markdown.contains("Sites: 1 computed, 1 skipped."));
        assert!(markdown.contains("| TX (mean) | 1 | 0.958 |"));
        assert!(markdown.contains("| TX (median) | 1 | 0.958 |"));
        assert!(markdown.contains("| no observed series | 1 |"));
    }

    #[test]
    fn test_render_missing_metric_as_dash() {
        let markdown = render(&[table()]);
        // log-NSE was None for the group.
        assert!(markdown.contains("| TX (mean) | 1 | 0.958 | - |"));
    }
}
