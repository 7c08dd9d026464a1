//! Market summary aggregator: one capitalisation-weighted index over the
//! whole registry.
//!
//! Each instrument's current cap is its curated cap scaled by
//! `latest close / reference price`; the ASI is the base value scaled by
//! the ratio of current to curated total cap. The summary is recomputed
//! from scratch each cycle and replaced wholly, never merged.

use crate::registry::InstrumentRegistry;
use crate::types::{MarketSummary, PriceSnapshot};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// All-Share Index base value: an unchanged market reads exactly this.
pub const INDEX_BASE: f64 = 100_000.0;

/// Compute the index snapshot from the latest prices.
///
/// Instruments without a snapshot contribute their curated cap unchanged
/// (stale but valid, never dropped — dropping them would move the index
/// for reasons unrelated to price).
pub fn summarize(
    registry: &InstrumentRegistry,
    snapshots: &HashMap<String, PriceSnapshot>,
) -> MarketSummary {
    let mut curated_total = 0.0;
    let mut current_total = 0.0;
    let mut open_total = 0.0;
    let mut volume = 0.0;
    let mut value = 0.0;
    let mut last_update: Option<DateTime<Utc>> = None;

    for instrument in registry.all() {
        curated_total += instrument.market_cap;

        match snapshots.get(&instrument.symbol) {
            Some(snap) if instrument.reference_price > 0.0 => {
                current_total += instrument.market_cap * snap.close / instrument.reference_price;
                open_total += instrument.market_cap * snap.open / instrument.reference_price;
                volume += snap.volume;
                value += snap.value;
                last_update = match last_update {
                    Some(prev) if prev >= snap.timestamp => Some(prev),
                    _ => Some(snap.timestamp),
                };
            }
            _ => {
                current_total += instrument.market_cap;
                open_total += instrument.market_cap;
            }
        }
    }

    let (asi, asi_open) = if curated_total > 0.0 {
        (
            INDEX_BASE * current_total / curated_total,
            INDEX_BASE * open_total / curated_total,
        )
    } else {
        (INDEX_BASE, INDEX_BASE)
    };

    let change = asi - asi_open;
    let change_percent = if asi_open > 0.0 {
        change / asi_open * 100.0
    } else {
        0.0
    };

    MarketSummary {
        asi,
        change,
        change_percent,
        market_cap: current_total,
        volume,
        value,
        last_update: last_update.unwrap_or_else(Utc::now),
    }
}

/// Holder for the latest summary. Readers see either the previous complete
/// summary or the new one, never a partial update.
pub struct SummaryStore {
    current: RwLock<Option<MarketSummary>>,
}

impl SummaryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            current: RwLock::new(None),
        })
    }

    pub async fn replace(&self, summary: MarketSummary) {
        *self.current.write().await = Some(summary);
    }

    pub async fn latest(&self) -> Option<MarketSummary> {
        self.current.read().await.clone()
    }
}
