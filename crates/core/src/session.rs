//! Trading session: one symbol's ordered bars for one trading day.

use crate::error::{Error, Result};
use crate::types::{ts_to_datetime, Bar, TimestampMs};
use chrono::NaiveTime;

/// A validated, non-empty, strictly time-ordered run of bars for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    symbol: String,
    bars: Vec<Bar>,
}

impl Session {
    /// Build a session, validating ordering and prices.
    ///
    /// Empty input is `DataUnavailable`; duplicate or decreasing timestamps
    /// and non-finite prices are `Data` errors.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(Error::data_unavailable(format!("no bars for {symbol}")));
        }

        for (i, bar) in bars.iter().enumerate() {
            if !bar.is_finite() {
                return Err(Error::data(format!(
                    "{symbol}: non-finite price in bar at {}",
                    bar.ts_ms
                )));
            }
            if i > 0 && bar.ts_ms <= bars[i - 1].ts_ms {
                return Err(Error::data(format!(
                    "{symbol}: timestamps not strictly increasing at index {i} ({} after {})",
                    bar.ts_ms,
                    bars[i - 1].ts_ms
                )));
            }
        }

        Ok(Self { symbol, bars })
    }

    /// Build a session from the last bar's UTC calendar day, keeping only bars
    /// within `lookback_ms` of the last bar.
    ///
    /// Bars must already be ordered; ordering is validated on the trimmed run.
    /// Bars from an earlier day never survive the cut, whatever the lookback.
    pub fn trailing(symbol: impl Into<String>, bars: Vec<Bar>, lookback_ms: i64) -> Result<Self> {
        let Some(last) = bars.last().map(|b| b.ts_ms) else {
            return Self::new(symbol, bars);
        };
        let day_start = ts_to_datetime(last)
            .map(|dt| {
                dt.date_naive()
                    .and_time(NaiveTime::MIN)
                    .and_utc()
                    .timestamp_millis()
            })
            .ok_or_else(|| Error::data(format!("timestamp out of range: {last}")))?;
        let cutoff = day_start.max(last - lookback_ms);
        let bars: Vec<Bar> = bars.into_iter().filter(|b| b.ts_ms >= cutoff).collect();
        Self::new(symbol, bars)
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The bars, oldest first.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false; sessions are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar.
    pub fn last_bar(&self) -> &Bar {
        // Non-empty by construction.
        &self.bars[self.bars.len() - 1]
    }

    /// First and last timestamps.
    pub fn time_range(&self) -> (TimestampMs, TimestampMs) {
        (self.bars[0].ts_ms, self.last_bar().ts_ms)
    }

    /// Closing prices, oldest first.
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::flat(i as i64 * 60_000, c))
            .collect()
    }

    #[test]
    fn test_empty_is_unavailable() {
        let err = Session::new("SPY", vec![]).unwrap_err();
        assert!(matches!(err, Error::DataUnavailable(_)));
    }

    #[test]
    fn test_duplicate_timestamp_rejected() {
        let mut data = bars(&[1.0, 2.0, 3.0]);
        data[2].ts_ms = data[1].ts_ms;
        let err = Session::new("SPY", data).unwrap_err();
        assert!(matches!(err, Error::Data(_)));
    }

    #[test]
    fn test_nan_rejected() {
        let data = bars(&[1.0, f64::NAN]);
        assert!(matches!(Session::new("SPY", data), Err(Error::Data(_))));
    }

    #[test]
    fn test_valid_session() {
        let session = Session::new("SPY", bars(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(session.len(), 3);
        assert_eq!(session.symbol(), "SPY");
        assert_eq!(session.time_range(), (0, 120_000));
        assert_eq!(session.closes().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
        assert_eq!(session.last_bar().close, 3.0);
    }

    #[test]
    fn test_trailing_cut() {
        // Bars at 0, 1, 2, 3, 4 minutes; keep the last 2 minutes.
        let session = Session::trailing("SPY", bars(&[1.0, 2.0, 3.0, 4.0, 5.0]), 120_000).unwrap();
        assert_eq!(session.len(), 3);
        assert_eq!(session.bars()[0].close, 3.0);
    }

    #[test]
    fn test_trailing_drops_previous_day() {
        // 2024-01-09 20:00 UTC and 2024-01-10 14:30 UTC, under 24h apart.
        let tue = 1_704_830_400_000;
        let wed = 1_704_897_000_000;
        let mut data: Vec<Bar> = (0..5).map(|i| Bar::flat(tue + i * 60_000, 50.0)).collect();
        data.extend((0..5).map(|i| Bar::flat(wed + i * 60_000, 10.0)));

        let session = Session::trailing("SPY", data, 24 * 3_600_000).unwrap();
        assert_eq!(session.len(), 5);
        assert_eq!(session.time_range(), (wed, wed + 4 * 60_000));
        assert!(session.closes().all(|c| c == 10.0));
    }

    #[test]
    fn test_trailing_empty() {
        let err = Session::trailing("SPY", vec![], 120_000).unwrap_err();
        assert!(matches!(err, Error::DataUnavailable(_)));
    }
}
