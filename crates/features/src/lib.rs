//! Signal computation for the wiggle-trader system.
//!
//! This crate handles:
//! - Rolling mean and sample standard deviation of closes
//! - The wiggle oscillator and its threshold signals
//! - Session summaries for reporting

pub mod rolling;
pub mod summary;
pub mod wiggle;

pub use rolling::{RollingWindow, WindowStats};
pub use summary::{signal_points, SessionSummary};
pub use wiggle::{classify, compute_indicators, SignalEngine};
