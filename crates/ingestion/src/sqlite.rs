//! SQLite-backed bar store.

use crate::import::read_bars_csv;
use crate::loader::{LoadRequest, SeriesLoader};
use rusqlite::{params, Connection};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};
use wiggle_core::{Bar, Error, Result};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS bars (
    symbol   TEXT    NOT NULL,
    interval TEXT    NOT NULL,
    ts_ms    INTEGER NOT NULL,
    open     REAL    NOT NULL,
    high     REAL    NOT NULL,
    low      REAL    NOT NULL,
    close    REAL    NOT NULL,
    PRIMARY KEY (symbol, interval, ts_ms)
);
";

fn db_err(e: rusqlite::Error) -> Error {
    Error::database(e.to_string())
}

/// Bars stored in a `bars` table keyed by `(symbol, interval, ts_ms)`.
pub struct SqliteLoader {
    conn: Connection,
}

impl SqliteLoader {
    /// Open (or create) a database file and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(db_err)?;
        info!(path = %path.as_ref().display(), "opened bar store");
        Self::with_connection(conn)
    }

    /// Private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory().map_err(db_err)?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA).map_err(db_err)?;
        Ok(Self { conn })
    }

    /// Insert or replace bars for a symbol in one transaction.
    pub fn insert_bars(&mut self, symbol: &str, interval: &str, bars: &[Bar]) -> Result<usize> {
        let symbol = symbol.trim().to_uppercase();
        let tx = self.conn.transaction().map_err(db_err)?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT OR REPLACE INTO bars (symbol, interval, ts_ms, open, high, low, close)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                )
                .map_err(db_err)?;
            for bar in bars {
                stmt.execute(params![
                    symbol, interval, bar.ts_ms, bar.open, bar.high, bar.low, bar.close
                ])
                .map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)?;

        debug!(symbol = %symbol, count = bars.len(), "stored bars");
        Ok(bars.len())
    }

    /// Parse CSV bars (see [`read_bars_csv`]) and store them for a symbol.
    ///
    /// Nothing is stored if any row is malformed.
    pub fn import_csv<R: Read>(
        &mut self,
        symbol: &str,
        interval: &str,
        reader: R,
    ) -> Result<usize> {
        let bars = read_bars_csv(reader)?;
        self.insert_bars(symbol, interval, &bars)
    }

    /// Distinct symbols in the store.
    pub fn symbols(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT symbol FROM bars ORDER BY symbol")
            .map_err(db_err)?;
        let symbols = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(db_err)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(symbols)
    }
}

impl SeriesLoader for SqliteLoader {
    fn load(&self, request: &LoadRequest) -> Result<Vec<Bar>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT ts_ms, open, high, low, close FROM bars
                 WHERE symbol = ?1 AND interval = ?2 AND ts_ms >= ?3 AND ts_ms < ?4
                 ORDER BY ts_ms",
            )
            .map_err(db_err)?;

        let bars = stmt
            .query_map(
                params![request.symbol, request.interval, request.start_ms, request.end_ms],
                |row| {
                    Ok(Bar {
                        ts_ms: row.get(0)?,
                        open: row.get(1)?,
                        high: row.get(2)?,
                        low: row.get(3)?,
                        close: row.get(4)?,
                    })
                },
            )
            .map_err(db_err)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(db_err)?;

        debug!(symbol = %request.symbol, bars = bars.len(), "loaded bars from sqlite");
        Ok(bars)
    }
}
