//! Timestamp alignment of observed and predicted series.

use chrono::{DateTime, Duration, Utc};

use crate::timeseries::TimeSeries;

/// A matched (observed, predicted) value at a shared timestamp.
///
/// The timestamp recorded is the observed point's timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedPair {
    pub timestamp: DateTime<Utc>,
    pub observed: f64,
    pub predicted: f64,
}

/// Joins two series on timestamp.
///
/// For each observed point, the nearest predicted point within
/// `tolerance` is matched and consumed; observed points with no match are
/// dropped, never imputed. A zero tolerance requires exact timestamp
/// equality, which is the expected case for daily- or hourly-aligned
/// series. Both inputs are sorted by construction, so this is a single
/// linear merge pass.
///
/// Returns an empty vector when the series share no timestamps; callers
/// must treat that as a degenerate case before computing metrics.
pub fn align(observed: &TimeSeries, predicted: &TimeSeries, tolerance: Duration) -> Vec<AlignedPair> {
    let obs = observed.points();
    let pred = predicted.points();
    let mut pairs = Vec::new();
    let mut j = 0;

    for &(t_obs, v_obs) in obs {
        // Drop predicted points already behind the tolerance window.
        while j < pred.len() && pred[j].0 < t_obs - tolerance {
            j += 1;
        }
        if j >= pred.len() {
            break;
        }

        // Scan the window [t_obs - tol, t_obs + tol] for the nearest point.
        let mut best: Option<(usize, Duration)> = None;
        let mut k = j;
        while k < pred.len() && pred[k].0 <= t_obs + tolerance {
            let dist = (pred[k].0 - t_obs).abs();
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((k, dist));
            }
            k += 1;
        }

        if let Some((k, _)) = best {
            pairs.push(AlignedPair {
                timestamp: t_obs,
                observed: v_obs,
                predicted: pred[k].1,
            });
            j = k + 1;
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, hour, min, 0).unwrap()
    }

    fn series(source: &str, points: Vec<(DateTime<Utc>, f64)>) -> TimeSeries {
        TimeSeries::new("site", source, points).unwrap()
    }

    #[test]
    fn test_exact_match() {
        let obs = series("usgs", vec![(t(0, 0), 10.0), (t(1, 0), 20.0), (t(2, 0), 30.0)]);
        let pred = series("model", vec![(t(0, 0), 11.0), (t(2, 0), 29.0)]);

        let pairs = align(&obs, &pred, Duration::zero());
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].observed, 10.0);
        assert_eq!(pairs[0].predicted, 11.0);
        assert_eq!(pairs[1].observed, 30.0);
        assert_eq!(pairs[1].predicted, 29.0);
    }

    #[test]
    fn test_no_overlap_is_empty() {
        let obs = series("usgs", vec![(t(0, 0), 1.0), (t(1, 0), 2.0)]);
        let pred = series("model", vec![(t(3, 0), 3.0), (t(4, 0), 4.0)]);

        assert!(align(&obs, &pred, Duration::zero()).is_empty());
    }

    #[test]
    fn test_self_alignment_is_identity() {
        let obs = series(
            "usgs",
            vec![(t(0, 0), 5.0), (t(1, 0), 6.0), (t(2, 0), 7.0)],
        );

        let pairs = align(&obs, &obs, Duration::zero());
        assert_eq!(pairs.len(), obs.len());
        for (pair, &(ts, v)) in pairs.iter().zip(obs.points()) {
            assert_eq!(pair.timestamp, ts);
            assert_eq!(pair.observed, v);
            assert_eq!(pair.predicted, v);
        }
    }

    #[test]
    fn test_tolerance_window_picks_nearest() {
        let obs = series("usgs", vec![(t(1, 0), 10.0)]);
        let pred = series("model", vec![(t(0, 50), 1.0), (t(1, 5), 2.0), (t(1, 30), 3.0)]);

        let pairs = align(&obs, &pred, Duration::minutes(15));
        assert_eq!(pairs.len(), 1);
        // 05 past is closer than 10 before
        assert_eq!(pairs[0].predicted, 2.0);
    }

    #[test]
    fn test_tolerance_excludes_far_points() {
        let obs = series("usgs", vec![(t(1, 0), 10.0)]);
        let pred = series("model", vec![(t(2, 0), 2.0)]);

        assert!(align(&obs, &pred, Duration::minutes(30)).is_empty());
        assert_eq!(align(&obs, &pred, Duration::hours(1)).len(), 1);
    }

    #[test]
    fn test_predicted_point_consumed_once() {
        // Two observed points compete for one predicted point.
        let obs = series("usgs", vec![(t(1, 0), 10.0), (t(1, 10), 20.0)]);
        let pred = series("model", vec![(t(1, 4), 5.0)]);

        let pairs = align(&obs, &pred, Duration::minutes(15));
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].observed, 10.0);
    }

    #[test]
    fn test_empty_inputs() {
        let empty = series("usgs", vec![]);
        let full = series("model", vec![(t(0, 0), 1.0)]);

        assert!(align(&empty, &full, Duration::zero()).is_empty());
        assert!(align(&full, &empty, Duration::zero()).is_empty());
    }
}
