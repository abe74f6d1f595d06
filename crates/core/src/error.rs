//! Error types for the wiggle-trader system.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the wiggle-trader system.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (rejected before any computation).
    #[error("Configuration error: {0}")]
    Config(String),

    /// No bars available for the requested symbol/range.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Data error (malformed or out-of-order bars).
    #[error("Data error: {0}")]
    Data(String),

    /// Order submission failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a data-unavailable error.
    pub fn data_unavailable(msg: impl Into<String>) -> Self {
        Error::DataUnavailable(msg.into())
    }

    /// Create a data error.
    pub fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }

    /// Create a database error.
    pub fn database(msg: impl Into<String>) -> Self {
        Error::Database(msg.into())
    }

    /// Whether the caller may skip this ticker and carry on with the next one.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::DataUnavailable(_) | Error::Data(_) | Error::Order(_) | Error::Database(_)
        )
    }
}

/// Failure reported by an order dispatcher.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    /// Credentials rejected or session expired.
    #[error("authentication failed: {0}")]
    AuthenticationFailure(String),

    /// Not enough buying power for the order.
    #[error("insufficient funds: required {required:.2}, available {available:.2}")]
    InsufficientFunds { required: f64, available: f64 },

    /// The brokerage does not trade this symbol.
    #[error("symbol not tradable: {0}")]
    SymbolNotTradable(String),

    /// Network failure talking to the brokerage.
    #[error("transient network failure: {0}")]
    TransientNetworkFailure(String),
}
