//! Paper dispatcher.
//!
//! Fills orders in-process at the reference price plus slippage, charging a
//! fee and tracking buying power. No positions are tracked.

use crate::dispatcher::OrderDispatcher;
use tracing::{info, warn};
use wiggle_core::{OrderError, OrderRequest, OrderResult, OrderSide, PaperConfig};

/// In-process paper brokerage.
pub struct PaperDispatcher {
    config: PaperConfig,
    buying_power: f64,
    fills: Vec<OrderResult>,
}

impl PaperDispatcher {
    /// Create a paper dispatcher.
    pub fn new(config: PaperConfig) -> Self {
        let buying_power = config.buying_power;
        Self {
            config,
            buying_power,
            fills: Vec::new(),
        }
    }

    /// Remaining buying power.
    pub fn buying_power(&self) -> f64 {
        self.buying_power
    }

    /// Fills so far, oldest first.
    pub fn fills(&self) -> &[OrderResult] {
        &self.fills
    }

    /// Fill price after slippage against the order side.
    fn fill_price(&self, side: OrderSide, price: f64) -> f64 {
        price * (1.0 + side.sign() * self.config.slippage_bps / 10_000.0)
    }

    /// Fee for a notional amount.
    pub fn calculate_fee(&self, notional: f64) -> f64 {
        notional.abs() * self.config.fee_bps / 10_000.0
    }

    fn check_tradable(&self, symbol: &str) -> Result<(), OrderError> {
        match &self.config.tradable_symbols {
            Some(list) if !list.iter().any(|s| s.eq_ignore_ascii_case(symbol)) => {
                Err(OrderError::SymbolNotTradable(symbol.to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl OrderDispatcher for PaperDispatcher {
    fn submit(&mut self, order: &OrderRequest) -> Result<OrderResult, OrderError> {
        if let Err(err) = self.check_tradable(&order.symbol) {
            warn!(symbol = %order.symbol, error = %err, "paper order rejected");
            return Err(err);
        }

        let fill_price = self.fill_price(order.side, order.price);
        let notional = fill_price * order.quantity;
        let fee = self.calculate_fee(notional);

        match order.side {
            OrderSide::Buy => {
                let required = notional + fee;
                if required > self.buying_power {
                    let err = OrderError::InsufficientFunds {
                        required,
                        available: self.buying_power,
                    };
                    warn!(symbol = %order.symbol, error = %err, "paper order rejected");
                    return Err(err);
                }
                self.buying_power -= required;
            }
            OrderSide::Sell => {
                self.buying_power += notional - fee;
            }
        }

        let result = OrderResult {
            order_id: format!("paper-{}", self.fills.len() + 1),
            side: order.side,
            symbol: order.symbol.clone(),
            quantity: order.quantity,
            fill_price,
            fee,
        };

        info!(
            order_id = %result.order_id,
            side = %result.side,
            symbol = %result.symbol,
            quantity = result.quantity,
            price = result.fill_price,
            buying_power = self.buying_power,
            "paper fill"
        );

        self.fills.push(result.clone());
        Ok(result)
    }
}
