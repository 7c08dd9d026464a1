//! Confidence estimator: historical hit-rate of past recommendations
//! against realized price outcomes.
//!
//! Open plans sit in a pending table until a later snapshot touches their
//! take-profit or stop-loss level (or the expiry window lapses); the
//! resolution is appended to an outcome log that is never rewritten.
//! When nothing has resolved in the lookback window the estimator reports
//! "unavailable" rather than fabricating a number.

use crate::types::{AccuracyRecord, EntryExitPlan, PriceSnapshot, RealizedOutcome, Recommendation};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// A plan awaiting resolution against later snapshots.
#[derive(Debug, Clone)]
struct PendingPlan {
    recommendation: Recommendation,
    signal_timestamp: DateTime<Utc>,
    stop_loss: f64,
    take_profit: f64,
}

/// Append-only outcome log plus the pending-plan table feeding it.
pub struct AccuracyLog {
    /// Resolved records keyed by symbol. Entries are appended, never
    /// mutated. Records older than `retention` are dropped on the next
    /// append for their symbol; no reader looks past the retention
    /// window, so the log stays bounded over a long-running process.
    records: DashMap<String, Vec<AccuracyRecord>>,
    /// Open plans keyed by symbol.
    pending: DashMap<String, Vec<PendingPlan>>,
    /// How long resolved records stay readable. At least the accuracy
    /// lookback.
    retention: Duration,
}

impl AccuracyLog {
    pub fn new(retention: Duration) -> Arc<Self> {
        Arc::new(Self {
            records: DashMap::new(),
            pending: DashMap::new(),
            retention,
        })
    }

    /// Register a freshly computed plan for outcome tracking.
    pub fn track(&self, plan: &EntryExitPlan) {
        self.pending
            .entry(plan.symbol.clone())
            .or_default()
            .push(PendingPlan {
                recommendation: plan.recommendation,
                signal_timestamp: plan.timestamp,
                stop_loss: plan.stop_loss,
                take_profit: plan.take_profit,
            });
    }

    /// Append a resolved record directly. Exposed for tests and replay.
    pub fn append(&self, record: AccuracyRecord) {
        let mut log = self.records.entry(record.symbol.clone()).or_default();
        log.push(record);
        Self::drop_expired(&mut log, Utc::now() - self.retention);
    }

    /// Discard records no reader can see anymore.
    fn drop_expired(records: &mut Vec<AccuracyRecord>, cutoff: DateTime<Utc>) {
        records.retain(|r| r.resolved_at >= cutoff);
    }

    /// Resolve pending plans for a symbol against its newest snapshot.
    /// Returns the number of plans resolved this call.
    pub fn resolve(&self, snapshot: &PriceSnapshot, expiry: Duration) -> usize {
        let Some(mut pending) = self.pending.get_mut(&snapshot.symbol) else {
            return 0;
        };

        let mut resolved = Vec::new();
        pending.retain(|plan| {
            // Plans from the same bar cannot be judged by it.
            if snapshot.timestamp <= plan.signal_timestamp {
                return true;
            }
            match judge(plan, snapshot, expiry) {
                Some(outcome) => {
                    resolved.push(AccuracyRecord {
                        id: Uuid::new_v4(),
                        symbol: snapshot.symbol.clone(),
                        signal_timestamp: plan.signal_timestamp,
                        recommendation: plan.recommendation,
                        outcome,
                        resolved_at: snapshot.timestamp,
                    });
                    false
                }
                None => true,
            }
        });
        drop(pending);

        let count = resolved.len();
        if count > 0 {
            debug!("Resolved {} plan(s) for {}", count, snapshot.symbol);
            let mut log = self.records.entry(snapshot.symbol.clone()).or_default();
            log.extend(resolved);
            Self::drop_expired(&mut log, Utc::now() - self.retention);
        }
        count
    }

    /// Historical accuracy over the lookback window, as a percentage in
    /// [0, 100]. Global when `symbol` is `None`. Returns `None` when no
    /// record resolved in-window — never a fabricated figure.
    pub fn accuracy(
        &self,
        symbol: Option<&str>,
        lookback: Duration,
        now: DateTime<Utc>,
    ) -> Option<f64> {
        let (favorable, total) = self.tally(symbol, lookback, now);
        if total == 0 {
            return None;
        }
        Some(favorable as f64 / total as f64 * 100.0)
    }

    /// Number of records resolved in the lookback window.
    pub fn resolved_count(
        &self,
        symbol: Option<&str>,
        lookback: Duration,
        now: DateTime<Utc>,
    ) -> usize {
        self.tally(symbol, lookback, now).1
    }

    /// Number of plans still awaiting resolution.
    pub fn pending_count(&self, symbol: &str) -> usize {
        self.pending.get(symbol).map(|p| p.len()).unwrap_or(0)
    }

    fn tally(
        &self,
        symbol: Option<&str>,
        lookback: Duration,
        now: DateTime<Utc>,
    ) -> (usize, usize) {
        let cutoff = now - lookback;
        let mut favorable = 0;
        let mut total = 0;

        let mut count = |records: &[AccuracyRecord]| {
            for record in records {
                if record.resolved_at < cutoff || record.resolved_at > now {
                    continue;
                }
                total += 1;
                if record.outcome.is_favorable() {
                    favorable += 1;
                }
            }
        };

        match symbol {
            Some(s) => {
                if let Some(records) = self.records.get(&s.to_uppercase()) {
                    count(&records);
                }
            }
            None => {
                for entry in self.records.iter() {
                    count(entry.value());
                }
            }
        }

        (favorable, total)
    }
}

/// Judge a pending plan against a snapshot. `None` means still pending.
/// The stop level is checked first: when a single bar spans both levels
/// the loss is assumed to have been hit first.
fn judge(plan: &PendingPlan, snapshot: &PriceSnapshot, expiry: Duration) -> Option<RealizedOutcome> {
    let bullish = plan.recommendation.is_bullish();

    let hit_stop = if bullish {
        snapshot.low <= plan.stop_loss
    } else {
        snapshot.high >= plan.stop_loss
    };
    if hit_stop {
        return Some(RealizedOutcome::HitStopLoss);
    }

    let hit_target = if bullish {
        snapshot.high >= plan.take_profit
    } else {
        snapshot.low <= plan.take_profit
    };
    if hit_target {
        return Some(RealizedOutcome::HitTakeProfit);
    }

    if snapshot.timestamp - plan.signal_timestamp > expiry {
        return Some(RealizedOutcome::ExpiredNeutral);
    }

    None
}
