//! Single-ticker evaluation pipeline.
//!
//! load -> session -> indicators -> decision -> (at most one) order.
//! Every call builds and drops its own session and indicator buffers.

use crate::decision::reduce;
use crate::dispatcher::{order_request, OrderDispatcher};
use crate::pricing::{quantity_for_notional, PriceSource};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use wiggle_core::{
    Config, Decision, Error, IndicatorPoint, OrderResult, Result, Session, TimestampMs,
};
use wiggle_features::{SessionSummary, SignalEngine};
use wiggle_ingestion::{LoadRequest, SeriesLoader};

/// Signals and decision for one ticker, before any order is placed.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Upper-cased symbol.
    pub symbol: String,
    /// First and last bar timestamps of the evaluated session.
    pub session_range: (TimestampMs, TimestampMs),
    /// One point per session bar.
    pub points: Vec<IndicatorPoint>,
    /// Summary of the points.
    pub summary: SessionSummary,
    /// Reduced decision, priced when actionable.
    pub decision: Decision,
}

/// Analysis plus the order placed for it, if any.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub analysis: Analysis,
    pub order: Option<OrderResult>,
}

/// Runs evaluations against injected loader and price source.
pub struct Evaluator<'a> {
    config: Config,
    engine: SignalEngine,
    loader: &'a dyn SeriesLoader,
    prices: &'a dyn PriceSource,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator. The configuration is validated here, before any
    /// data is loaded.
    pub fn new(
        config: Config,
        loader: &'a dyn SeriesLoader,
        prices: &'a dyn PriceSource,
    ) -> Result<Self> {
        config.validate()?;
        let engine = SignalEngine::new(config.wiggle)?;
        Ok(Self {
            config,
            engine,
            loader,
            prices,
        })
    }

    /// The evaluator's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the most recent session for `symbol` and reduce it to a decision.
    ///
    /// When the current trading day has no bars yet (before the open), the
    /// trading day before it is used instead.
    pub fn analyze(&self, symbol: &str, now: DateTime<Utc>) -> Result<Analysis> {
        let interval = self.config.session.interval.clone();
        let mut request = LoadRequest::previous_session(symbol, interval, now)?;
        let mut bars = self.loader.load(&request)?;
        if bars.is_empty() {
            request = request.day_before()?;
            debug!(
                symbol = %request.symbol,
                start_ms = request.start_ms,
                "no bars yet, trying prior trading day"
            );
            bars = self.loader.load(&request)?;
        }

        let lookback_ms = self.config.session.lookback_ms();
        let session = Session::trailing(request.symbol.clone(), bars, lookback_ms)
            .inspect_err(|err| warn!(symbol = %request.symbol, error = %err, "skipping ticker"))?;

        let points = self.engine.compute(&session)?;
        let summary = SessionSummary::from_points(&points);
        let mut decision = reduce(&points)?;

        if decision.action.is_actionable() {
            let price = self.prices.current_price(&request.symbol, &session)?;
            let quantity = quantity_for_notional(self.config.trading.notional, price)?;
            decision = decision.with_pricing(price, quantity);
        }

        info!(
            symbol = %request.symbol,
            bars = session.len(),
            buys = summary.buy_signals,
            sells = summary.sell_signals,
            action = %decision.action,
            "session evaluated"
        );

        Ok(Analysis {
            symbol: request.symbol,
            session_range: session.time_range(),
            points,
            summary,
            decision,
        })
    }

    /// Submit the order for an analysis, if its decision is actionable.
    ///
    /// Calls the dispatcher at most once. Dispatch failures are returned as
    /// `Error::Order` and never retried.
    pub fn execute(
        &self,
        analysis: &Analysis,
        dispatcher: &mut dyn OrderDispatcher,
    ) -> Result<Option<OrderResult>> {
        let Some(order) = order_request(&analysis.decision, &analysis.symbol)? else {
            return Ok(None);
        };

        match dispatcher.submit(&order) {
            Ok(result) => {
                info!(
                    symbol = %order.symbol,
                    side = %order.side,
                    order_id = %result.order_id,
                    "order placed"
                );
                Ok(Some(result))
            }
            Err(err) => {
                warn!(symbol = %order.symbol, side = %order.side, error = %err, "order failed");
                Err(Error::Order(err))
            }
        }
    }

    /// Analyze, then execute when a dispatcher is supplied.
    pub fn evaluate(
        &self,
        symbol: &str,
        now: DateTime<Utc>,
        dispatcher: Option<&mut dyn OrderDispatcher>,
    ) -> Result<Evaluation> {
        let analysis = self.analyze(symbol, now)?;
        let order = match dispatcher {
            Some(dispatcher) => self.execute(&analysis, dispatcher)?,
            None => None,
        };
        Ok(Evaluation { analysis, order })
    }
}
