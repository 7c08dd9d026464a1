//! Current signal and plan per symbol.
//!
//! The signal and its plan are written together in one insert so readers
//! never observe a signal paired with a stale plan. A symbol with no
//! computed signal yet is simply absent — callers must treat absence as
//! "no signal", never as an implied NEUTRAL.

use crate::types::{EntryExitPlan, Signal};
use dashmap::DashMap;
use std::sync::Arc;

/// The latest classification for one symbol and, when actionable, its
/// entry/exit plan. NEUTRAL signals carry `plan: None`.
#[derive(Debug, Clone)]
pub struct SymbolState {
    pub signal: Signal,
    pub plan: Option<EntryExitPlan>,
}

pub struct SignalStore {
    states: DashMap<String, SymbolState>,
}

impl SignalStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            states: DashMap::new(),
        })
    }

    /// Replace the symbol's state atomically.
    pub fn put(&self, signal: Signal, plan: Option<EntryExitPlan>) {
        self.states
            .insert(signal.symbol.to_uppercase(), SymbolState { signal, plan });
    }

    pub fn get(&self, symbol: &str) -> Option<SymbolState> {
        self.states.get(&symbol.to_uppercase()).map(|s| s.clone())
    }

    pub fn signal(&self, symbol: &str) -> Option<Signal> {
        self.get(symbol).map(|s| s.signal)
    }

    pub fn plan(&self, symbol: &str) -> Option<EntryExitPlan> {
        self.get(symbol).and_then(|s| s.plan)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
