//! Refresh coordinator: the single scheduled task that drives the engine.
//!
//! Each cycle fans out over the registry concurrently, with a per-symbol
//! deadline. A symbol that times out or fails keeps its prior signal and
//! the cycle moves on; after the fan-out the market summary is recomputed
//! and replaced wholly. Shutdown is cooperative via a watch channel.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::registry::InstrumentRegistry;
use crate::services::accuracy::AccuracyLog;
use crate::services::classifier::classify;
use crate::services::history::HistoryStore;
use crate::services::planner::plan;
use crate::services::store::SignalStore;
use crate::services::summary::{summarize, SummaryStore};
use crate::sources::MarketDataAdapter;
use crate::types::{IndicatorSet, Instrument};
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info, warn};

pub struct RefreshCoordinator {
    adapter: Arc<dyn MarketDataAdapter>,
    registry: Arc<InstrumentRegistry>,
    history: Arc<HistoryStore>,
    signals: Arc<SignalStore>,
    summary: Arc<SummaryStore>,
    accuracy: Arc<AccuracyLog>,
    cadence: Duration,
    symbol_timeout: Duration,
    plan_expiry: chrono::Duration,
}

impl RefreshCoordinator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        adapter: Arc<dyn MarketDataAdapter>,
        registry: Arc<InstrumentRegistry>,
        history: Arc<HistoryStore>,
        signals: Arc<SignalStore>,
        summary: Arc<SummaryStore>,
        accuracy: Arc<AccuracyLog>,
        config: &Config,
    ) -> Arc<Self> {
        Arc::new(Self {
            adapter,
            registry,
            history,
            signals,
            summary,
            accuracy,
            cadence: Duration::from_secs(config.refresh_interval_secs),
            symbol_timeout: Duration::from_millis(config.symbol_timeout_ms),
            plan_expiry: chrono::Duration::hours(config.plan_expiry_hours),
        })
    }

    /// Run the refresh loop until the shutdown channel fires.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Refresh coordinator started: {} symbols from {}, every {:?}",
            self.registry.len(),
            self.adapter.name(),
            self.cadence
        );

        let mut ticker = interval(self.cadence);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.run_cycle().await,
                _ = shutdown.changed() => {
                    info!("Refresh coordinator shutting down");
                    break;
                }
            }
        }
    }

    /// One full refresh pass over the registry.
    pub async fn run_cycle(&self) {
        let tasks: Vec<_> = self
            .registry
            .all()
            .iter()
            .cloned()
            .map(|instrument| {
                let adapter = Arc::clone(&self.adapter);
                let history = Arc::clone(&self.history);
                let signals = Arc::clone(&self.signals);
                let accuracy = Arc::clone(&self.accuracy);
                let deadline = self.symbol_timeout;
                let expiry = self.plan_expiry;

                tokio::spawn(async move {
                    let symbol = instrument.symbol.clone();
                    match timeout(
                        deadline,
                        refresh_symbol(adapter, history, signals, accuracy, instrument, expiry),
                    )
                    .await
                    {
                        Ok(Ok(())) => {}
                        Ok(Err(AppError::InsufficientData { have, need, .. })) => {
                            debug!("{}: warming up ({}/{} bars)", symbol, have, need);
                        }
                        Ok(Err(err)) => {
                            warn!("{}: refresh failed, keeping prior signal: {}", symbol, err);
                        }
                        Err(_) => {
                            warn!(
                                "{}: refresh exceeded {:?}, keeping prior signal",
                                symbol, deadline
                            );
                        }
                    }
                })
            })
            .collect();

        for joined in join_all(tasks).await {
            if let Err(err) = joined {
                warn!("Refresh task panicked: {}", err);
            }
        }

        // Recompute the index over whatever snapshots the cycle produced.
        // On a fully failed cycle the snapshot map is unchanged and the
        // previous summary values are simply recomputed.
        let snapshots = self.history.snapshot_map();
        if snapshots.is_empty() {
            debug!("No snapshots yet; retaining previous market summary");
            return;
        }
        let summary = summarize(&self.registry, &snapshots);
        self.summary.replace(summary).await;
    }
}

/// Refresh one symbol: fetch, record, resolve outcomes, classify, plan,
/// and publish signal and plan in a single store insert.
async fn refresh_symbol(
    adapter: Arc<dyn MarketDataAdapter>,
    history: Arc<HistoryStore>,
    signals: Arc<SignalStore>,
    accuracy: Arc<AccuracyLog>,
    instrument: Instrument,
    plan_expiry: chrono::Duration,
) -> Result<()> {
    let snapshot = adapter.fetch_snapshot(&instrument).await?;

    accuracy.resolve(&snapshot, plan_expiry);
    history.push(snapshot.clone());

    let window = history.window(&instrument.symbol);
    let indicators = IndicatorSet::compute(&window)?;
    let signal = classify(&indicators, &window)?;

    let trade_plan = match plan(&signal, snapshot.close, indicators.atr) {
        Ok(p) => {
            accuracy.track(&p);
            Some(p)
        }
        Err(AppError::NoActionableSetup(_)) => None,
        Err(AppError::DegenerateRisk(reason)) => {
            debug!("{}: no plan this cycle: {}", instrument.symbol, reason);
            None
        }
        Err(err) => return Err(err),
    };

    signals.put(signal, trade_plan);
    Ok(())
}
