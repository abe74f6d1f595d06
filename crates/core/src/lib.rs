//! Core types and configuration for the wiggle-trader system.
//!
//! This crate provides shared types used across all other crates:
//! - Market data types (bars, sessions)
//! - Indicator, decision and order types
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod session;
pub mod types;

pub use config::{Config, PaperConfig, SessionConfig, TradingConfig, TradingMode, WiggleConfig};
pub use error::{Error, OrderError, Result};
pub use session::Session;
pub use types::*;
