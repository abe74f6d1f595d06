//! Bar loading for the wiggle-trader system.
//!
//! This crate handles:
//! - The series loader boundary (`SeriesLoader`, `LoadRequest`)
//! - Trading-day range selection
//! - In-memory and SQLite bar stores
//! - CSV import

pub mod import;
pub mod loader;
pub mod sqlite;

pub use import::read_bars_csv;
pub use loader::{InMemoryLoader, LoadRequest, SeriesLoader};
pub use sqlite::SqliteLoader;
