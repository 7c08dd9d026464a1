//! NGX Pulse: trading-signal engine and JSON API for Nigerian Exchange
//! equities.
//!
//! A background coordinator polls a market data adapter per symbol,
//! maintains rolling price history, computes technical indicators,
//! classifies a recommendation, derives an entry/exit plan and tracks how
//! past recommendations actually resolved. The axum API serves the latest
//! engine state; it never computes on the request path.

pub mod api;
pub mod config;
pub mod error;
pub mod registry;
pub mod services;
pub mod sources;
pub mod types;

use crate::config::Config;
use crate::registry::InstrumentRegistry;
use crate::services::accuracy::AccuracyLog;
use crate::services::history::HistoryStore;
use crate::services::store::SignalStore;
use crate::services::summary::SummaryStore;
use std::sync::Arc;

/// Shared handles to the engine state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<InstrumentRegistry>,
    pub history: Arc<HistoryStore>,
    pub signals: Arc<SignalStore>,
    pub summary: Arc<SummaryStore>,
    pub accuracy: Arc<AccuracyLog>,
}

impl AppState {
    /// Fresh state over the curated registry.
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, InstrumentRegistry::curated())
    }

    /// Fresh state over an explicit registry. Used by tests.
    pub fn with_registry(config: Config, registry: Arc<InstrumentRegistry>) -> Self {
        let accuracy = AccuracyLog::new(chrono::Duration::hours(config.accuracy_lookback_hours));
        Self {
            config: Arc::new(config),
            registry,
            history: HistoryStore::new(),
            signals: SignalStore::new(),
            summary: SummaryStore::new(),
            accuracy,
        }
    }
}
