//! Per-session signal summary, used for textual reporting in place of charts.

use ordered_float::OrderedFloat;
use serde::Serialize;
use wiggle_core::{IndicatorPoint, Signal, TimestampMs};

/// Aggregate view of one session's indicator points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    /// Number of bars.
    pub bars: usize,
    /// Points with a defined wiggle.
    pub defined: usize,
    /// Points with a buy signal.
    pub buy_signals: usize,
    /// Points with a sell signal.
    pub sell_signals: usize,
    /// Highest wiggle and its timestamp.
    pub peak_wiggle: Option<(TimestampMs, f64)>,
    /// Lowest wiggle and its timestamp.
    pub trough_wiggle: Option<(TimestampMs, f64)>,
    /// Wiggle of the final bar.
    pub last_wiggle: Option<f64>,
}

impl SessionSummary {
    /// Summarise indicator points.
    pub fn from_points(points: &[IndicatorPoint]) -> Self {
        let defined = || points.iter().filter_map(|p| p.wiggle.map(|w| (p.ts_ms, w)));

        Self {
            bars: points.len(),
            defined: defined().count(),
            buy_signals: points.iter().filter(|p| p.signal == Signal::Buy).count(),
            sell_signals: points.iter().filter(|p| p.signal == Signal::Sell).count(),
            peak_wiggle: defined().max_by_key(|&(_, w)| OrderedFloat(w)),
            trough_wiggle: defined().min_by_key(|&(_, w)| OrderedFloat(w)),
            last_wiggle: points.last().and_then(|p| p.wiggle),
        }
    }

    /// Whether any point crossed a threshold.
    pub fn has_signals(&self) -> bool {
        self.buy_signals + self.sell_signals > 0
    }
}

/// Points with a non-flat signal, in session order.
pub fn signal_points(points: &[IndicatorPoint]) -> impl Iterator<Item = &IndicatorPoint> {
    points.iter().filter(|p| !p.signal.is_flat())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(ts_ms: i64, wiggle: Option<f64>, signal: Signal) -> IndicatorPoint {
        IndicatorPoint {
            ts_ms,
            close: 100.0,
            moving_average: wiggle.map(|_| 100.0),
            std_dev: wiggle.map(|_| 1.0),
            wiggle,
            signal,
        }
    }

    #[test]
    fn test_summary() {
        let points = vec![
            point(0, None, Signal::Flat),
            point(1, Some(1.2), Signal::Buy),
            point(2, Some(-0.3), Signal::Flat),
            point(3, Some(-1.5), Signal::Sell),
            point(4, Some(0.1), Signal::Flat),
        ];
        let summary = SessionSummary::from_points(&points);

        assert_eq!(summary.bars, 5);
        assert_eq!(summary.defined, 4);
        assert_eq!(summary.buy_signals, 1);
        assert_eq!(summary.sell_signals, 1);
        assert_eq!(summary.peak_wiggle, Some((1, 1.2)));
        assert_eq!(summary.trough_wiggle, Some((3, -1.5)));
        assert_eq!(summary.last_wiggle, Some(0.1));
        assert!(summary.has_signals());

        let ts: Vec<i64> = signal_points(&points).map(|p| p.ts_ms).collect();
        assert_eq!(ts, vec![1, 3]);
    }

    #[test]
    fn test_summary_without_wiggle() {
        let points = vec![point(0, None, Signal::Flat), point(1, None, Signal::Flat)];
        let summary = SessionSummary::from_points(&points);
        assert_eq!(summary.defined, 0);
        assert!(summary.peak_wiggle.is_none());
        assert!(summary.trough_wiggle.is_none());
        assert!(!summary.has_signals());
    }
}
