//! Series loader boundary.
//!
//! A loader returns the bars for one symbol, one sampling interval and one
//! half-open time range. An empty result is not an error here; session
//! construction turns it into `DataUnavailable`.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use wiggle_core::{Bar, Error, Result, TimestampMs};

/// What to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRequest {
    /// Upper-cased ticker symbol.
    pub symbol: String,
    /// Sampling interval (e.g., "1m").
    pub interval: String,
    /// Range start (inclusive, ms).
    pub start_ms: TimestampMs,
    /// Range end (exclusive, ms).
    pub end_ms: TimestampMs,
}

impl LoadRequest {
    /// Create a request; the symbol is upper-cased.
    pub fn new(
        symbol: &str,
        interval: impl Into<String>,
        start_ms: TimestampMs,
        end_ms: TimestampMs,
    ) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            interval: interval.into(),
            start_ms,
            end_ms,
        }
    }

    /// Range covering one UTC calendar day, midnight to midnight.
    pub fn for_day(symbol: &str, interval: impl Into<String>, day: NaiveDate) -> Result<Self> {
        let end_day = day
            .checked_add_days(Days::new(1))
            .ok_or_else(|| Error::data(format!("date out of range after {day}")))?;
        let start_ms = day.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
        let end_ms = end_day.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
        Ok(Self::new(symbol, interval, start_ms, end_ms))
    }

    /// Range covering the most recent trading day as of `now`.
    ///
    /// Saturdays and Sundays roll back to Friday.
    pub fn previous_session(
        symbol: &str,
        interval: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let trading_day = last_weekday(now.date_naive())?;
        Self::for_day(symbol, interval, trading_day)
    }

    /// The same request moved to the trading day before this one.
    ///
    /// Monday steps back to Friday.
    pub fn day_before(&self) -> Result<Self> {
        let day = DateTime::from_timestamp_millis(self.start_ms)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| Error::data(format!("timestamp out of range: {}", self.start_ms)))?;
        let prior = day
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| Error::data(format!("date out of range before {day}")))?;
        Self::for_day(&self.symbol, self.interval.clone(), last_weekday(prior)?)
    }

    /// Whether a timestamp falls inside the requested range.
    #[inline]
    pub fn contains(&self, ts_ms: TimestampMs) -> bool {
        ts_ms >= self.start_ms && ts_ms < self.end_ms
    }
}

/// `day`, or the Friday before it when `day` falls on a weekend.
fn last_weekday(day: NaiveDate) -> Result<NaiveDate> {
    let offset = match day.weekday() {
        Weekday::Sat => 1,
        Weekday::Sun => 2,
        _ => 0,
    };
    day.checked_sub_days(Days::new(offset))
        .ok_or_else(|| Error::data(format!("date out of range before {day}")))
}

/// Source of historical bars.
pub trait SeriesLoader {
    /// Bars for the request, oldest first. May be empty.
    fn load(&self, request: &LoadRequest) -> Result<Vec<Bar>>;
}

/// Loader backed by an in-process map, keyed by `(symbol, interval)`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLoader {
    series: HashMap<(String, String), Vec<Bar>>,
}

impl InMemoryLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store bars for a symbol, replacing anything already there.
    pub fn insert(&mut self, symbol: &str, interval: &str, mut bars: Vec<Bar>) {
        bars.sort_by_key(|b| b.ts_ms);
        self.series
            .insert((symbol.trim().to_uppercase(), interval.to_string()), bars);
    }

    /// Builder-style `insert`.
    pub fn with_series(mut self, symbol: &str, interval: &str, bars: Vec<Bar>) -> Self {
        self.insert(symbol, interval, bars);
        self
    }
}

impl SeriesLoader for InMemoryLoader {
    fn load(&self, request: &LoadRequest) -> Result<Vec<Bar>> {
        let bars: Vec<Bar> = self
            .series
            .get(&(request.symbol.clone(), request.interval.clone()))
            .map(|bars| {
                bars.iter()
                    .filter(|b| request.contains(b.ts_ms))
                    .copied()
                    .collect()
            })
            .unwrap_or_default();

        debug!(symbol = %request.symbol, bars = bars.len(), "loaded bars from memory");
        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ms(y: i32, m: u32, d: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap().timestamp_millis()
    }

    #[test]
    fn test_symbol_uppercased() {
        let req = LoadRequest::new(" spy ", "1m", 0, 10);
        assert_eq!(req.symbol, "SPY");
    }

    #[test]
    fn test_previous_session_weekday() {
        // Wednesday 2024-01-10 14:30 UTC
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 14, 30, 0).unwrap();
        let req = LoadRequest::previous_session("aapl", "1m", now).unwrap();
        assert_eq!(req.start_ms, ms(2024, 1, 10));
        assert_eq!(req.end_ms, ms(2024, 1, 11));
    }

    #[test]
    fn test_previous_session_weekend_rolls_back() {
        // Saturday 2024-01-13 and Sunday 2024-01-14 both map to Friday 2024-01-12.
        let sat = Utc.with_ymd_and_hms(2024, 1, 13, 10, 0, 0).unwrap();
        let sun = Utc.with_ymd_and_hms(2024, 1, 14, 10, 0, 0).unwrap();
        for now in [sat, sun] {
            let req = LoadRequest::previous_session("AAPL", "1m", now).unwrap();
            assert_eq!(req.start_ms, ms(2024, 1, 12));
            assert_eq!(req.end_ms, ms(2024, 1, 13));
        }
    }

    #[test]
    fn test_day_before_skips_weekend() {
        // Monday 2024-01-15 steps back to Friday 2024-01-12.
        let mon = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let req = LoadRequest::previous_session("SPY", "1m", mon).unwrap();
        assert_eq!(req.start_ms, ms(2024, 1, 15));

        let prior = req.day_before().unwrap();
        assert_eq!(prior.start_ms, ms(2024, 1, 12));
        assert_eq!(prior.end_ms, ms(2024, 1, 13));
        assert_eq!(prior.symbol, "SPY");
        assert_eq!(prior.interval, "1m");

        // Wednesday steps back one day.
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let wed = LoadRequest::for_day("SPY", "1m", day).unwrap();
        assert_eq!(wed.day_before().unwrap().start_ms, ms(2024, 1, 9));
    }

    #[test]
    fn test_in_memory_filters_range() {
        let bars: Vec<Bar> = (0..10).map(|i| Bar::flat(i * 60_000, 100.0 + i as f64)).collect();
        let loader = InMemoryLoader::new().with_series("spy", "1m", bars);

        let req = LoadRequest::new("SPY", "1m", 2 * 60_000, 5 * 60_000);
        let loaded = loader.load(&req).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].ts_ms, 2 * 60_000);
        assert_eq!(loaded[2].ts_ms, 4 * 60_000);
    }

    #[test]
    fn test_in_memory_unknown_symbol_is_empty() {
        let loader = InMemoryLoader::new();
        let req = LoadRequest::new("NOPE", "1m", 0, i64::MAX);
        assert!(loader.load(&req).unwrap().is_empty());
    }

    #[test]
    fn test_in_memory_interval_is_part_of_key() {
        let loader = InMemoryLoader::new().with_series("SPY", "5m", vec![Bar::flat(0, 1.0)]);
        let req = LoadRequest::new("SPY", "1m", 0, 60_000);
        assert!(loader.load(&req).unwrap().is_empty());
    }
}
