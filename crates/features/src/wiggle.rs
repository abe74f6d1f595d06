//! Wiggle oscillator and threshold signals.
//!
//! wiggle = (close - trailing mean) / trailing sample standard deviation.
//! Points whose window is incomplete, or whose deviation is zero, carry no
//! wiggle and a flat signal.

use crate::rolling::RollingWindow;
use tracing::debug;
use wiggle_core::{IndicatorPoint, Result, Session, Signal, WiggleConfig};

/// Map a wiggle value to a signal.
///
/// The sell check runs after the buy check and wins when both fire, which a
/// validated config never allows.
#[inline]
pub fn classify(wiggle: Option<f64>, buy_threshold: f64, sell_threshold: f64) -> Signal {
    let Some(w) = wiggle else {
        return Signal::Flat;
    };

    let mut signal = Signal::Flat;
    if w > buy_threshold {
        signal = Signal::Buy;
    }
    if w < sell_threshold {
        signal = Signal::Sell;
    }
    signal
}

/// Compute one indicator point per bar of the session.
///
/// Fails with a configuration error before touching the data if `config`
/// is invalid. The output has the same length and order as the session.
pub fn compute_indicators(
    session: &Session,
    config: &WiggleConfig,
) -> Result<Vec<IndicatorPoint>> {
    config.validate()?;

    let mut window = RollingWindow::new(config.window);
    let points: Vec<IndicatorPoint> = session
        .bars()
        .iter()
        .map(|bar| {
            let stats = window.push(bar.close);
            let moving_average = stats.map(|s| s.mean);
            let std_dev = stats.and_then(|s| s.std_dev);
            let wiggle = match (moving_average, std_dev) {
                (Some(ma), Some(sd)) if sd > 0.0 => Some((bar.close - ma) / sd),
                _ => None,
            };

            IndicatorPoint {
                ts_ms: bar.ts_ms,
                close: bar.close,
                moving_average,
                std_dev,
                wiggle,
                signal: classify(wiggle, config.buy_threshold, config.sell_threshold),
            }
        })
        .collect();

    debug!(
        symbol = session.symbol(),
        bars = points.len(),
        window = config.window,
        defined = points.iter().filter(|p| p.wiggle.is_some()).count(),
        "computed wiggle indicators"
    );

    Ok(points)
}

/// Signal engine bound to one validated configuration.
#[derive(Debug, Clone, Copy)]
pub struct SignalEngine {
    config: WiggleConfig,
}

impl SignalEngine {
    /// Create an engine, rejecting an invalid configuration up front.
    pub fn new(config: WiggleConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Compute indicators for a session.
    pub fn compute(&self, session: &Session) -> Result<Vec<IndicatorPoint>> {
        compute_indicators(session, &self.config)
    }

    /// The engine's configuration.
    pub fn config(&self) -> &WiggleConfig {
        &self.config
    }
}
