//! Decision reducer.
//!
//! Collapses a whole session of signals into one action. Any buy signal wins,
//! then any sell signal, otherwise nothing. When within the session a signal
//! fired is deliberately ignored.

use tracing::debug;
use wiggle_core::{Decision, Error, IndicatorPoint, Result, Signal, TradeAction};

/// Reduce a session's indicator points to a single unpriced decision.
///
/// The decision is stamped with the last point's timestamp.
pub fn reduce(points: &[IndicatorPoint]) -> Result<Decision> {
    let last = points
        .last()
        .ok_or_else(|| Error::data_unavailable("no indicator points to reduce"))?;

    // Buy is checked first: a session with both resolves to BUY.
    let action = if points.iter().any(|p| p.signal == Signal::Buy) {
        TradeAction::Buy
    } else if points.iter().any(|p| p.signal == Signal::Sell) {
        TradeAction::Sell
    } else {
        TradeAction::Hold
    };

    debug!(action = %action, points = points.len(), "reduced session");
    Ok(Decision::new(action, last.ts_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(signals: &[Signal]) -> Vec<IndicatorPoint> {
        signals
            .iter()
            .enumerate()
            .map(|(i, &signal)| IndicatorPoint {
                ts_ms: i as i64 * 60_000,
                close: 100.0,
                moving_average: None,
                std_dev: None,
                wiggle: None,
                signal,
            })
            .collect()
    }

    #[test]
    fn test_buy_wins_over_sell() {
        let signals = [Signal::Sell, Signal::Flat, Signal::Buy, Signal::Sell];
        let decision = reduce(&points(&signals)).unwrap();
        assert_eq!(decision.action, TradeAction::Buy);
    }

    #[test]
    fn test_sell_only() {
        let decision = reduce(&points(&[Signal::Flat, Signal::Sell, Signal::Flat])).unwrap();
        assert_eq!(decision.action, TradeAction::Sell);
    }

    #[test]
    fn test_all_flat_is_hold() {
        let decision = reduce(&points(&[Signal::Flat; 4])).unwrap();
        assert_eq!(decision.action, TradeAction::Hold);
        assert!(decision.quantity.is_none());
        assert!(decision.reference_price.is_none());
    }

    #[test]
    fn test_timestamp_is_last_point() {
        let decision = reduce(&points(&[Signal::Buy, Signal::Flat, Signal::Flat])).unwrap();
        assert_eq!(decision.ts_ms, 120_000);
    }

    #[test]
    fn test_empty_points() {
        assert!(matches!(reduce(&[]), Err(Error::DataUnavailable(_))));
    }
}
