//! wiggle: evaluate the wiggle signal for tickers typed at the prompt.
//!
//! Bars come from a SQLite store, filled with `wiggle import`. With trading
//! enabled (config `trading.mode = "paper"` or `--trade`), actionable
//! decisions go to the paper dispatcher.

mod repl;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wiggle_core::{Config, TradingMode};
use wiggle_ingestion::SqliteLoader;
use wiggle_trading::{Evaluator, LastClose, OrderDispatcher, PaperDispatcher};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    /// Window 20, thresholds ±0.5, signals only.
    Default,
    /// Window 5, thresholds ±0.9, paper trading.
    Sensitive,
}

#[derive(Parser)]
#[command(name = "wiggle", about = "Wiggle oscillator signals and paper orders")]
struct Cli {
    /// SQLite database holding the `bars` table.
    #[arg(long, global = true, default_value = "wiggle.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prompt for tickers and evaluate each one.
    Run {
        /// JSON config file. Overrides --preset.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Built-in configuration preset.
        #[arg(long, value_enum, default_value_t = Preset::Default)]
        preset: Preset,

        /// Send actionable decisions to the paper dispatcher.
        #[arg(long, default_value_t = false)]
        trade: bool,
    },

    /// Load bars from a CSV file (header `ts_ms,open,high,low,close`).
    Import {
        /// Ticker the bars belong to.
        #[arg(long)]
        symbol: String,

        /// Sampling interval of the bars.
        #[arg(long, default_value = "1m")]
        interval: String,

        /// CSV file to read.
        file: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&Path>, preset: Preset, trade: bool) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => match preset {
            Preset::Default => Config::default(),
            Preset::Sensitive => Config::sensitive(),
        },
    };
    if trade {
        config.trading.mode = TradingMode::Paper;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut store = SqliteLoader::open(&cli.db)
        .with_context(|| format!("opening bar store {}", cli.db.display()))?;

    match cli.command {
        Commands::Run {
            config,
            preset,
            trade,
        } => {
            let config = load_config(config.as_deref(), preset, trade)?;
            run(config, &store)
        }
        Commands::Import {
            symbol,
            interval,
            file,
        } => import(&mut store, &symbol, &interval, &file),
    }
}

fn import(store: &mut SqliteLoader, symbol: &str, interval: &str, path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let stored = store
        .import_csv(symbol, interval, BufReader::new(file))
        .with_context(|| format!("importing {}", path.display()))?;

    let symbols = store.symbols()?;
    info!(
        symbol = %symbol.trim().to_uppercase(),
        interval,
        bars = stored,
        "imported bars"
    );
    println!("Stored {stored} bars. Tickers in store: {}", symbols.join(", "));
    Ok(())
}

fn run(config: Config, store: &SqliteLoader) -> Result<()> {
    let symbols = store.symbols()?;
    if symbols.is_empty() {
        warn!("bar store is empty; load bars with `wiggle import`");
    } else {
        info!(tickers = %symbols.join(","), "bar store ready");
    }

    let mut paper = match config.trading.mode {
        TradingMode::Paper => Some(PaperDispatcher::new(config.trading.paper.clone())),
        TradingMode::Off => None,
    };

    info!(
        window = config.wiggle.window,
        buy_threshold = config.wiggle.buy_threshold,
        sell_threshold = config.wiggle.sell_threshold,
        trading = ?config.trading.mode,
        "starting"
    );

    let evaluator = Evaluator::new(config, store, &LastClose)?;
    let dispatcher = paper.as_mut().map(|p| p as &mut dyn OrderDispatcher);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let stats = repl::run_interactive(stdin.lock(), &mut stdout, &evaluator, dispatcher, Utc::now)?;

    info!(
        evaluated = stats.evaluated,
        skipped = stats.skipped,
        orders = stats.orders,
        failed_orders = stats.failed_orders,
        "done"
    );
    if let Some(paper) = &paper {
        info!(
            buying_power = paper.buying_power(),
            fills = paper.fills().len(),
            "paper account"
        );
    }
    Ok(())
}
