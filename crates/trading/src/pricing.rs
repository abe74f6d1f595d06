//! Current-price lookup and order sizing.

use std::collections::HashMap;
use wiggle_core::{Error, Result, Session};

/// Source of the price an order is placed at.
pub trait PriceSource {
    /// Current price for `symbol`. The evaluated session is available for
    /// sources that derive the price from it.
    fn current_price(&self, symbol: &str, session: &Session) -> Result<f64>;
}

/// Uses the close of the session's final bar.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastClose;

impl PriceSource for LastClose {
    fn current_price(&self, _symbol: &str, session: &Session) -> Result<f64> {
        Ok(session.last_bar().close)
    }
}

/// Fixed quotes keyed by upper-cased symbol.
#[derive(Debug, Clone, Default)]
pub struct FixedPrices {
    prices: HashMap<String, f64>,
}

impl FixedPrices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.prices.insert(symbol.to_uppercase(), price);
        self
    }
}

impl PriceSource for FixedPrices {
    fn current_price(&self, symbol: &str, _session: &Session) -> Result<f64> {
        self.prices
            .get(&symbol.to_uppercase())
            .copied()
            .ok_or_else(|| Error::data_unavailable(format!("no quote for {symbol}")))
    }
}

/// Fractional quantity worth `notional` at `price`.
pub fn quantity_for_notional(notional: f64, price: f64) -> Result<f64> {
    if !(price.is_finite() && price > 0.0) {
        return Err(Error::data(format!("invalid price {price}")));
    }
    if !(notional.is_finite() && notional > 0.0) {
        return Err(Error::config(format!("invalid notional {notional}")));
    }
    Ok(notional / price)
}
