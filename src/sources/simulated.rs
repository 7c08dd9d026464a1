//! Simulated market feed.
//!
//! Random-walks each instrument around its reference price so the full
//! pipeline can run without an upstream. This is an explicit adapter at
//! the data boundary; nothing downstream of it introduces randomness.

use crate::error::Result;
use crate::sources::MarketDataAdapter;
use crate::types::{Instrument, PriceSnapshot};
use async_trait::async_trait;
use dashmap::DashMap;
use rand::Rng;

/// Per-symbol walk state: the last close carries across cycles.
struct WalkState {
    last_close: f64,
    session_open: f64,
}

/// Simulated quote source that wanders around each instrument's
/// reference price.
pub struct SimulatedFeed {
    walks: DashMap<String, WalkState>,
    /// Maximum per-cycle move as a fraction of price.
    max_step: f64,
}

impl SimulatedFeed {
    pub fn new() -> Self {
        Self {
            walks: DashMap::new(),
            max_step: 0.02,
        }
    }
}

impl Default for SimulatedFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataAdapter for SimulatedFeed {
    fn name(&self) -> &'static str {
        "simulated-feed"
    }

    async fn fetch_snapshot(&self, instrument: &Instrument) -> Result<PriceSnapshot> {
        let mut rng = rand::thread_rng();
        let step: f64 = rng.gen_range(-self.max_step..=self.max_step);
        let spread: f64 = rng.gen_range(0.0..self.max_step / 2.0);
        let volume: f64 = rng.gen_range(50_000.0..5_000_000.0);

        let mut entry = self
            .walks
            .entry(instrument.symbol.clone())
            .or_insert_with(|| WalkState {
                last_close: instrument.reference_price,
                session_open: instrument.reference_price,
            });

        let open = entry.session_open;
        let close = (entry.last_close * (1.0 + step)).max(0.01);
        let high = close.max(open) * (1.0 + spread);
        let low = close.min(open) * (1.0 - spread);
        entry.last_close = close;

        Ok(PriceSnapshot {
            symbol: instrument.symbol.clone(),
            timestamp: chrono::Utc::now(),
            open,
            high,
            low,
            close,
            volume,
            value: close * volume,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InstrumentRegistry;

    #[tokio::test]
    async fn test_simulated_feed_produces_valid_snapshots() {
        let registry = InstrumentRegistry::curated();
        let feed = SimulatedFeed::new();
        let instrument = registry.get("GTCO").unwrap();

        for _ in 0..10 {
            let snap = feed.fetch_snapshot(instrument).await.unwrap();
            assert_eq!(snap.symbol, "GTCO");
            assert!(snap.low <= snap.high);
            assert!(snap.close > 0.0);
            assert!(crate::sources::validate_snapshot(&snap).is_ok());
        }
    }

    #[tokio::test]
    async fn test_simulated_feed_walk_continuity() {
        let registry = InstrumentRegistry::curated();
        let feed = SimulatedFeed::new();
        let instrument = registry.get("MTNN").unwrap();

        let first = feed.fetch_snapshot(instrument).await.unwrap();
        let second = feed.fetch_snapshot(instrument).await.unwrap();
        // The session open is pinned to the first cycle's open.
        assert_eq!(first.open, second.open);
        // Each step is bounded relative to the previous close.
        let move_pct = (second.close - first.close).abs() / first.close;
        assert!(move_pct <= 0.021, "move {} too large", move_pct);
    }
}
