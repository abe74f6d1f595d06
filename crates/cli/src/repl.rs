//! Interactive ticker loop.
//!
//! Reads one ticker per line until `exit` (any case) or end of input. Tickers
//! without data are reported and skipped; the loop only stops early on errors
//! that would repeat for every ticker.

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::io::{BufRead, Write};
use wiggle_core::{ts_to_datetime, Error, OrderResult, OrderSide, TimestampMs};
use wiggle_features::signal_points;
use wiggle_trading::{Analysis, Evaluator, OrderDispatcher};

const PROMPT: &str = "Enter the stock ticker symbol (or type 'exit' to quit): ";

/// Counters for one interactive run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoopStats {
    pub evaluated: usize,
    pub skipped: usize,
    pub orders: usize,
    pub failed_orders: usize,
}

/// Run the prompt loop over `input`, writing reports to `output`.
pub fn run_interactive<R, W, C>(
    input: R,
    output: &mut W,
    evaluator: &Evaluator<'_>,
    mut dispatcher: Option<&mut dyn OrderDispatcher>,
    clock: C,
) -> Result<LoopStats>
where
    R: BufRead,
    W: Write,
    C: Fn() -> DateTime<Utc>,
{
    let mut stats = LoopStats::default();
    let mut lines = input.lines();

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next().transpose()? else {
            writeln!(output)?;
            break;
        };
        let ticker = line.trim();
        if ticker.eq_ignore_ascii_case("exit") {
            break;
        }
        if ticker.is_empty() {
            writeln!(output, "Invalid ticker.")?;
            stats.skipped += 1;
            continue;
        }
        let ticker = ticker.to_uppercase();

        let analysis = match evaluator.analyze(&ticker, clock()) {
            Ok(analysis) => analysis,
            Err(err) if err.is_recoverable() => {
                writeln!(output, "Invalid ticker {ticker}: {err}")?;
                stats.skipped += 1;
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        stats.evaluated += 1;
        write_report(output, &analysis)?;

        let Some(dispatcher) = dispatcher.as_deref_mut() else {
            continue;
        };
        match evaluator.execute(&analysis, dispatcher) {
            Ok(Some(fill)) => {
                stats.orders += 1;
                write_fill(output, &fill, evaluator.config().trading.notional)?;
            }
            Ok(None) => {}
            Err(Error::Order(err)) => {
                stats.failed_orders += 1;
                writeln!(output, "Order for {ticker} failed: {err}")?;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(stats)
}

fn fmt_ts(ts_ms: TimestampMs) -> String {
    ts_to_datetime(ts_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts_ms.to_string())
}

fn write_report<W: Write>(out: &mut W, analysis: &Analysis) -> std::io::Result<()> {
    let summary = &analysis.summary;
    let (first, last) = analysis.session_range;

    writeln!(
        out,
        "{} {} -> {} UTC, {} bars",
        analysis.symbol,
        fmt_ts(first),
        fmt_ts(last),
        summary.bars
    )?;
    writeln!(
        out,
        "  wiggle defined on {} bars; buy signals {}, sell signals {}",
        summary.defined, summary.buy_signals, summary.sell_signals
    )?;
    if let (Some((peak_ts, peak)), Some((trough_ts, trough))) =
        (summary.peak_wiggle, summary.trough_wiggle)
    {
        writeln!(
            out,
            "  peak {peak:.3} at {}, trough {trough:.3} at {}",
            fmt_ts(peak_ts),
            fmt_ts(trough_ts)
        )?;
    }

    for point in signal_points(&analysis.points) {
        let label = if point.signal.sign() > 0 { "BUY" } else { "SELL" };
        writeln!(
            out,
            "    {}  close {:>10.2}  wiggle {:>7.3}  {label}",
            fmt_ts(point.ts_ms),
            point.close,
            point.wiggle.unwrap_or_default()
        )?;
    }

    let decision = &analysis.decision;
    match (decision.reference_price, decision.quantity) {
        (Some(price), Some(quantity)) => writeln!(
            out,
            "  decision: {} (ref price {price:.2}, qty {quantity:.6})",
            decision.action
        ),
        _ => writeln!(out, "  decision: {}", decision.action),
    }
}

fn write_fill<W: Write>(out: &mut W, fill: &OrderResult, notional: f64) -> std::io::Result<()> {
    let verb = match fill.side {
        OrderSide::Buy => "Bought",
        OrderSide::Sell => "Sold",
    };
    writeln!(
        out,
        "{verb} {:.6} shares of {} worth {notional} at {:.2} (order {})",
        fill.quantity, fill.symbol, fill.fill_price, fill.order_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wiggle_core::{Bar, Config, OrderError, WiggleConfig};
    use wiggle_ingestion::InMemoryLoader;
    use wiggle_trading::{LastClose, RecordingDispatcher};

    fn clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, 15, 0, 0).unwrap()
    }

    fn loader() -> InMemoryLoader {
        let start = Utc.with_ymd_and_hms(2024, 1, 10, 14, 30, 0).unwrap().timestamp_millis();
        let bars = |closes: &[f64]| -> Vec<Bar> {
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| Bar::flat(start + i as i64 * 60_000, c))
                .collect()
        };
        InMemoryLoader::new()
            .with_series("AAPL", "1m", bars(&[10.0, 10.0, 10.0, 20.0, 10.0]))
            .with_series("FLAT", "1m", bars(&[5.0; 6]))
    }

    fn config() -> Config {
        Config {
            wiggle: WiggleConfig::new(3, 0.9, -0.9).unwrap(),
            ..Config::default()
        }
    }

    fn run(input: &str, dispatcher: Option<&mut dyn OrderDispatcher>) -> (LoopStats, String) {
        let loader = loader();
        let evaluator = Evaluator::new(config(), &loader, &LastClose).unwrap();
        let mut out = Vec::new();
        let stats =
            run_interactive(input.as_bytes(), &mut out, &evaluator, dispatcher, clock).unwrap();
        (stats, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_exit_is_case_insensitive() {
        let (stats, out) = run("ExIt\naapl\n", None);
        assert_eq!(stats, LoopStats::default());
        assert_eq!(out.matches(PROMPT).count(), 1);
    }

    #[test]
    fn test_unknown_ticker_continues() {
        let mut dispatcher = RecordingDispatcher::new();
        let (stats, out) = run("nope\n\naapl\nexit\n", Some(&mut dispatcher));

        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.evaluated, 1);
        assert_eq!(stats.orders, 1);
        assert!(out.contains("Invalid ticker NOPE"));
        assert!(out.contains("Invalid ticker."));
        assert!(out.contains("decision: BUY"));
        assert!(out.contains("Bought 0.100000 shares of AAPL"));
        assert_eq!(dispatcher.calls(), 1);
    }

    #[test]
    fn test_signals_only_without_dispatcher() {
        let (stats, out) = run("aapl\nflat\n", None);
        assert_eq!(stats.evaluated, 2);
        assert_eq!(stats.orders, 0);
        assert!(out.contains("2024-01-10 14:33  close      20.00  wiggle   1.155  BUY"));
        assert!(out.contains("decision: NONE"));
    }

    #[test]
    fn test_order_failure_reported_and_loop_continues() {
        let mut dispatcher =
            RecordingDispatcher::failing(OrderError::AuthenticationFailure("expired".into()));
        let (stats, out) = run("aapl\naapl\nexit\n", Some(&mut dispatcher));

        assert_eq!(stats.failed_orders, 2);
        assert_eq!(stats.orders, 0);
        assert!(out.contains("Order for AAPL failed: authentication failed: expired"));
        assert_eq!(dispatcher.calls(), 2);
    }
}
