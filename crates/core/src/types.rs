//! Core data types for the wiggle-trader system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp in milliseconds since Unix epoch (UTC).
pub type TimestampMs = i64;

/// Convert a millisecond timestamp to a UTC datetime.
#[inline]
pub fn ts_to_datetime(ts_ms: TimestampMs) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ts_ms)
}

/// One OHLC bar for a single sampling interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Interval open timestamp (ms).
    pub ts_ms: TimestampMs,
    /// Open price.
    pub open: f64,
    /// High price.
    pub high: f64,
    /// Low price.
    pub low: f64,
    /// Close price.
    pub close: f64,
}

impl Bar {
    /// Create a bar.
    pub fn new(ts_ms: TimestampMs, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            ts_ms,
            open,
            high,
            low,
            close,
        }
    }

    /// Bar whose four prices all equal `close`.
    pub fn flat(ts_ms: TimestampMs, close: f64) -> Self {
        Self::new(ts_ms, close, close, close, close)
    }

    /// All four prices are finite numbers.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }
}

/// Discrete per-bar signal derived from a wiggle threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum Signal {
    /// Wiggle above the buy threshold.
    Buy = 1,
    /// No crossing, or wiggle undefined.
    Flat = 0,
    /// Wiggle below the sell threshold.
    Sell = -1,
}

impl Signal {
    /// Get the sign as i8.
    #[inline]
    pub fn sign(self) -> i8 {
        self as i8
    }

    #[inline]
    pub fn is_flat(self) -> bool {
        self == Signal::Flat
    }
}

/// Per-bar indicator values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    /// Bar timestamp.
    pub ts_ms: TimestampMs,
    /// Bar close.
    pub close: f64,
    /// Trailing mean of closes; `None` until the window is full.
    pub moving_average: Option<f64>,
    /// Trailing sample standard deviation of closes; `None` until the window is full.
    pub std_dev: Option<f64>,
    /// `(close - moving_average) / std_dev`; `None` when the window is
    /// incomplete or the deviation is zero.
    pub wiggle: Option<f64>,
    /// Threshold signal. Always `Flat` when `wiggle` is `None`.
    pub signal: Signal,
}

/// The single trade action a session reduces to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    /// Place a buy order.
    Buy,
    /// Place a sell order.
    Sell,
    /// Do nothing.
    Hold,
}

impl TradeAction {
    /// Order side for this action, if it is actionable.
    pub fn order_side(self) -> Option<OrderSide> {
        match self {
            TradeAction::Buy => Some(OrderSide::Buy),
            TradeAction::Sell => Some(OrderSide::Sell),
            TradeAction::Hold => None,
        }
    }

    pub fn is_actionable(self) -> bool {
        self != TradeAction::Hold
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
            TradeAction::Hold => "NONE",
        };
        f.write_str(s)
    }
}

/// Outcome of reducing one session's signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Action to take.
    pub action: TradeAction,
    /// Timestamp of the last point in the session (for audit).
    pub ts_ms: TimestampMs,
    /// Order quantity, filled in from the caller's price lookup.
    pub quantity: Option<f64>,
    /// Reference price, filled in from the caller's price lookup.
    pub reference_price: Option<f64>,
}

impl Decision {
    /// Unpriced decision.
    pub fn new(action: TradeAction, ts_ms: TimestampMs) -> Self {
        Self {
            action,
            ts_ms,
            quantity: None,
            reference_price: None,
        }
    }

    /// Attach the price lookup result.
    pub fn with_pricing(mut self, reference_price: f64, quantity: f64) -> Self {
        self.reference_price = Some(reference_price);
        self.quantity = Some(quantity);
        self
    }
}

/// Side of a brokerage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Get sign: +1 for buy, -1 for sell.
    pub fn sign(self) -> f64 {
        match self {
            OrderSide::Buy => 1.0,
            OrderSide::Sell => -1.0,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => f.write_str("buy"),
            OrderSide::Sell => f.write_str("sell"),
        }
    }
}

/// Order handed to a dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Order side.
    pub side: OrderSide,
    /// Ticker symbol.
    pub symbol: String,
    /// Quantity (may be fractional).
    pub quantity: f64,
    /// Limit/reference price.
    pub price: f64,
}

/// Confirmation returned by a dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResult {
    /// Brokerage order id.
    pub order_id: String,
    /// Order side.
    pub side: OrderSide,
    /// Ticker symbol.
    pub symbol: String,
    /// Filled quantity.
    pub quantity: f64,
    /// Fill price.
    pub fill_price: f64,
    /// Fee paid (positive).
    pub fee: f64,
}
