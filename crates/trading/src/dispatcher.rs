//! Order dispatcher boundary.
//!
//! A dispatcher turns one order request into one brokerage call and reports
//! the outcome. Implementations must not retry on their own; the pipeline
//! calls `submit` at most once per evaluation.

use wiggle_core::{Decision, Error, OrderError, OrderRequest, OrderResult, Result};

/// Something that can place brokerage orders.
pub trait OrderDispatcher {
    /// Submit one order.
    fn submit(&mut self, order: &OrderRequest) -> std::result::Result<OrderResult, OrderError>;
}

/// Build the order for a priced decision.
///
/// Returns `None` for a hold. An actionable decision without pricing is an error.
pub fn order_request(decision: &Decision, symbol: &str) -> Result<Option<OrderRequest>> {
    let Some(side) = decision.action.order_side() else {
        return Ok(None);
    };

    match (decision.quantity, decision.reference_price) {
        (Some(quantity), Some(price)) => Ok(Some(OrderRequest {
            side,
            symbol: symbol.to_string(),
            quantity,
            price,
        })),
        _ => Err(Error::data(format!(
            "{symbol}: {} decision has no quantity/price",
            decision.action
        ))),
    }
}

/// Dispatcher that records every request and answers from a script.
///
/// Without a scripted failure it confirms each order at the requested price.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    /// Requests received, in order.
    pub requests: Vec<OrderRequest>,
    failure: Option<OrderError>,
}

impl RecordingDispatcher {
    /// Dispatcher that accepts every order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher that rejects every order with `error`.
    pub fn failing(error: OrderError) -> Self {
        Self {
            requests: Vec::new(),
            failure: Some(error),
        }
    }

    /// Number of `submit` calls seen.
    pub fn calls(&self) -> usize {
        self.requests.len()
    }
}

impl OrderDispatcher for RecordingDispatcher {
    fn submit(&mut self, order: &OrderRequest) -> std::result::Result<OrderResult, OrderError> {
        self.requests.push(order.clone());
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(OrderResult {
            order_id: format!("rec-{}", self.requests.len()),
            side: order.side,
            symbol: order.symbol.clone(),
            quantity: order.quantity,
            fill_price: order.price,
            fee: 0.0,
        })
    }
}
