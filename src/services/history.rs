//! Rolling per-symbol windows of price snapshots.

use crate::types::PriceSnapshot;
use dashmap::DashMap;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Default window capacity: comfortably above the 35 bars the slowest
/// indicator (MACD 26+9) needs.
pub const DEFAULT_CAPACITY: usize = 120;

/// Append-only rolling history of snapshots per symbol. The newest
/// snapshot per symbol is the "current" one used for live display.
pub struct HistoryStore {
    windows: DashMap<String, VecDeque<PriceSnapshot>>,
    capacity: usize,
}

impl HistoryStore {
    pub fn new() -> Arc<Self> {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            windows: DashMap::new(),
            capacity,
        })
    }

    /// Append a snapshot, evicting the oldest bar once at capacity.
    pub fn push(&self, snapshot: PriceSnapshot) {
        let mut entry = self
            .windows
            .entry(snapshot.symbol.to_uppercase())
            .or_default();
        entry.push_back(snapshot);
        while entry.len() > self.capacity {
            entry.pop_front();
        }
    }

    /// Latest snapshot for a symbol.
    pub fn latest(&self, symbol: &str) -> Option<PriceSnapshot> {
        self.windows
            .get(&symbol.to_uppercase())
            .and_then(|w| w.back().cloned())
    }

    /// The full window for a symbol, oldest first.
    pub fn window(&self, symbol: &str) -> Vec<PriceSnapshot> {
        self.windows
            .get(&symbol.to_uppercase())
            .map(|w| w.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of bars currently held for a symbol.
    pub fn bar_count(&self, symbol: &str) -> usize {
        self.windows
            .get(&symbol.to_uppercase())
            .map(|w| w.len())
            .unwrap_or(0)
    }

    /// Latest snapshot for every tracked symbol, for the aggregator.
    pub fn snapshot_map(&self) -> HashMap<String, PriceSnapshot> {
        self.windows
            .iter()
            .filter_map(|entry| {
                entry
                    .value()
                    .back()
                    .map(|snap| (entry.key().clone(), snap.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(symbol: &str, close: f64) -> PriceSnapshot {
        PriceSnapshot {
            symbol: symbol.to_string(),
            timestamp: Utc::now(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
            value: close,
        }
    }

    #[test]
    fn test_push_and_latest() {
        let store = HistoryStore::new();
        store.push(snapshot("GTCO", 40.0));
        store.push(snapshot("GTCO", 41.0));

        assert_eq!(store.latest("GTCO").unwrap().close, 41.0);
        assert_eq!(store.latest("gtco").unwrap().close, 41.0);
        assert!(store.latest("UBA").is_none());
        assert_eq!(store.bar_count("GTCO"), 2);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let store = HistoryStore::with_capacity(3);
        for i in 0..5 {
            store.push(snapshot("UBA", i as f64));
        }
        let window = store.window("UBA");
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].close, 2.0);
        assert_eq!(window[2].close, 4.0);
    }

    #[test]
    fn test_snapshot_map_holds_latest_per_symbol() {
        let store = HistoryStore::new();
        store.push(snapshot("GTCO", 40.0));
        store.push(snapshot("GTCO", 42.0));
        store.push(snapshot("UBA", 26.0));

        let map = store.snapshot_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map["GTCO"].close, 42.0);
        assert_eq!(map["UBA"].close, 26.0);
    }
}
