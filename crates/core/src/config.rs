//! Configuration structures for the wiggle-trader system.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Signal engine configuration.
    pub wiggle: WiggleConfig,
    /// Session selection configuration.
    pub session: SessionConfig,
    /// Order dispatch configuration.
    pub trading: TradingConfig,
}

impl Config {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Live-trading preset: sensitive thresholds with paper dispatch enabled.
    pub fn sensitive() -> Self {
        Self {
            wiggle: WiggleConfig::sensitive(),
            trading: TradingConfig {
                mode: TradingMode::Paper,
                ..TradingConfig::default()
            },
            ..Self::default()
        }
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.wiggle.validate()?;
        self.session.validate()?;
        self.trading.validate()
    }
}

/// Wiggle indicator parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WiggleConfig {
    /// Trailing window length in bars.
    pub window: usize,
    /// Wiggle above this emits a buy signal.
    pub buy_threshold: f64,
    /// Wiggle below this emits a sell signal.
    pub sell_threshold: f64,
}

impl WiggleConfig {
    /// Create and validate a wiggle configuration.
    pub fn new(window: usize, buy_threshold: f64, sell_threshold: f64) -> Result<Self> {
        let config = Self {
            window,
            buy_threshold,
            sell_threshold,
        };
        config.validate()?;
        Ok(config)
    }

    /// Short window and wide thresholds, used when trading.
    pub fn sensitive() -> Self {
        Self {
            window: 5,
            buy_threshold: 0.9,
            sell_threshold: -0.9,
        }
    }

    /// Reject parameters that would make signals ambiguous or undefined.
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(Error::config("window must be at least 1"));
        }
        if !self.buy_threshold.is_finite() || !self.sell_threshold.is_finite() {
            return Err(Error::config(format!(
                "thresholds must be finite (buy={}, sell={})",
                self.buy_threshold, self.sell_threshold
            )));
        }
        if self.buy_threshold < self.sell_threshold {
            return Err(Error::config(format!(
                "buy_threshold ({}) is below sell_threshold ({})",
                self.buy_threshold, self.sell_threshold
            )));
        }
        Ok(())
    }
}

impl Default for WiggleConfig {
    fn default() -> Self {
        Self {
            window: 20,
            buy_threshold: 0.5,
            sell_threshold: -0.5,
        }
    }
}

/// Which bars make up a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sampling interval passed to the loader (e.g., "1m").
    pub interval: String,
    /// Only bars within this many hours of the last bar are evaluated.
    pub lookback_hours: u32,
}

impl SessionConfig {
    /// Lookback in milliseconds.
    pub fn lookback_ms(&self) -> i64 {
        self.lookback_hours as i64 * 60 * 60 * 1000
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval.trim().is_empty() {
            return Err(Error::config("session interval must not be empty"));
        }
        if self.lookback_hours == 0 {
            return Err(Error::config("lookback_hours must be at least 1"));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            interval: "1m".to_string(),
            lookback_hours: 24,
        }
    }
}

/// Whether decisions are turned into orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradingMode {
    /// Signals only; no dispatcher is called.
    #[default]
    Off,
    /// Orders go to the in-process paper dispatcher.
    Paper,
}

/// Order dispatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingConfig {
    /// Dispatch mode.
    pub mode: TradingMode,
    /// Currency amount per order; quantity = notional / price.
    pub notional: f64,
    /// Paper dispatcher settings.
    pub paper: PaperConfig,
}

impl TradingConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.notional.is_finite() && self.notional > 0.0) {
            return Err(Error::config(format!(
                "notional must be positive, got {}",
                self.notional
            )));
        }
        self.paper.validate()
    }
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            mode: TradingMode::Off,
            notional: 1.0,
            paper: PaperConfig::default(),
        }
    }
}

/// Paper dispatcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperConfig {
    /// Starting buying power.
    pub buying_power: f64,
    /// Slippage in basis points applied against the order side.
    pub slippage_bps: f64,
    /// Fee in basis points of notional.
    pub fee_bps: f64,
    /// If set, only these symbols can be traded.
    pub tradable_symbols: Option<Vec<String>>,
}

impl PaperConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.buying_power.is_finite() && self.buying_power >= 0.0) {
            return Err(Error::config("paper buying_power must be non-negative"));
        }
        if !(self.slippage_bps.is_finite() && self.slippage_bps >= 0.0) {
            return Err(Error::config("paper slippage_bps must be non-negative"));
        }
        if !(self.fee_bps.is_finite() && self.fee_bps >= 0.0) {
            return Err(Error::config("paper fee_bps must be non-negative"));
        }
        Ok(())
    }
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            buying_power: 100.0,
            slippage_bps: 0.0,
            fee_bps: 0.0,
            tradable_symbols: None,
        }
    }
}
