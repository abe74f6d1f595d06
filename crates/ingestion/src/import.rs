//! CSV bar import.
//!
//! Expects a header row naming `ts_ms,open,high,low,close` (any order), one
//! bar per line, timestamps in milliseconds since the Unix epoch (UTC).

use csv::{ReaderBuilder, Trim};
use std::io::Read;
use wiggle_core::{Bar, Error, Result};

/// Parse bars from CSV, returned oldest first.
///
/// Malformed rows and non-finite prices are `Data` errors naming the row.
pub fn read_bars_csv<R: Read>(reader: R) -> Result<Vec<Bar>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let mut bars = Vec::new();
    for (i, row) in rdr.deserialize::<Bar>().enumerate() {
        let line = i + 2;
        let bar = row.map_err(|e| Error::data(format!("csv line {line}: {e}")))?;
        if !bar.is_finite() {
            return Err(Error::data(format!("csv line {line}: non-finite price")));
        }
        bars.push(bar);
    }

    bars.sort_by_key(|b| b.ts_ms);
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_and_orders_rows() {
        let data = "\
ts_ms, open, high, low, close
120000, 10.5, 11.0, 10.0, 10.75
0, 10.0, 10.0, 10.0, 10.0
60000, 10.0, 10.5, 9.5, 10.25
";
        let bars = read_bars_csv(data.as_bytes()).unwrap();
        let ts: Vec<i64> = bars.iter().map(|b| b.ts_ms).collect();
        assert_eq!(ts, vec![0, 60_000, 120_000]);
        assert_eq!(bars[2], Bar::new(120_000, 10.5, 11.0, 10.0, 10.75));
    }

    #[test]
    fn test_column_order_follows_header() {
        let data = "close,low,high,open,ts_ms\n4.0,3.0,5.0,3.5,0\n";
        let bars = read_bars_csv(data.as_bytes()).unwrap();
        assert_eq!(bars, vec![Bar::new(0, 3.5, 5.0, 3.0, 4.0)]);
    }

    #[test]
    fn test_bad_row_names_line() {
        let data = "ts_ms,open,high,low,close\n0,1,1,1,1\n60000,1,x,1,1\n";
        let err = read_bars_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Data(_)));
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_non_finite_rejected() {
        let data = "ts_ms,open,high,low,close\n0,1,1,1,NaN\n";
        let err = read_bars_csv(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn test_header_only_is_empty() {
        let bars = read_bars_csv("ts_ms,open,high,low,close\n".as_bytes()).unwrap();
        assert!(bars.is_empty());
    }
}
