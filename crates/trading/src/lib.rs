//! Decision and order dispatch for the wiggle-trader system.
//!
//! This crate provides:
//! - Session-to-decision reduction
//! - The order dispatcher boundary and a paper implementation
//! - Price lookup and notional sizing
//! - The single-ticker evaluation pipeline

pub mod decision;
pub mod dispatcher;
pub mod evaluator;
pub mod paper;
pub mod pricing;

pub use decision::reduce;
pub use dispatcher::{order_request, OrderDispatcher, RecordingDispatcher};
pub use evaluator::{Analysis, Evaluation, Evaluator};
pub use paper::PaperDispatcher;
pub use pricing::{quantity_for_notional, FixedPrices, LastClose, PriceSource};
