//! Market data types: instruments, price snapshots, indicators and the
//! exchange-level summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tradable NGX instrument with curated display metadata.
///
/// Instruments are owned by the registry and immutable during a trading
/// session; every other entity refers to one by symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    /// Unique uppercase ticker (e.g. "DANGCEM").
    pub symbol: String,
    /// Company name (e.g. "Dangote Cement Plc").
    pub name: String,
    /// Sector classification, where known.
    pub sector: Option<String>,
    /// Curated market capitalisation in Naira.
    pub market_cap: f64,
    /// Shares outstanding, where known.
    pub shares_outstanding: Option<f64>,
    /// Reference price the curated market cap was taken at. Used to scale
    /// the cap with the live price and as the index base weight.
    pub reference_price: f64,
}

/// One OHLCV observation for a symbol at a polling interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Traded value (price x volume) for the session.
    pub value: f64,
}

impl PriceSnapshot {
    /// Absolute session change (close vs open).
    pub fn change(&self) -> f64 {
        self.close - self.open
    }

    /// Session change as a percentage of the open.
    pub fn change_percent(&self) -> f64 {
        if self.open > 0.0 {
            (self.close - self.open) / self.open * 100.0
        } else {
            0.0
        }
    }
}

/// Technical indicators derived from a rolling window of snapshots.
///
/// Recomputed every polling cycle; pure function of the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub symbol: String,
    /// Timestamp of the newest bar in the window the set was derived from.
    pub timestamp: DateTime<Utc>,
    pub rsi: f64,
    pub macd_line: f64,
    pub macd_signal: f64,
    pub bollinger_upper: f64,
    pub bollinger_mid: f64,
    pub bollinger_lower: f64,
    /// Average true range, the volatility measure fed to the planner.
    pub atr: f64,
}

/// Index-level statistics over the full registry snapshot.
///
/// Wholly replaced each cycle, never merged. Field names are the wire
/// contract for `GET /api/market-summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    /// Capitalisation-weighted All-Share Index value.
    pub asi: f64,
    /// Absolute index change for the session.
    pub change: f64,
    pub change_percent: f64,
    /// Total market capitalisation in Naira.
    pub market_cap: f64,
    pub volume: f64,
    pub value: f64,
    pub last_update: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_change() {
        let snap = PriceSnapshot {
            symbol: "GTCO".to_string(),
            timestamp: Utc::now(),
            open: 40.0,
            high: 44.0,
            low: 39.5,
            close: 42.0,
            volume: 1_000.0,
            value: 42_000.0,
        };
        assert!((snap.change() - 2.0).abs() < 1e-9);
        assert!((snap.change_percent() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_change_percent_zero_open() {
        let snap = PriceSnapshot {
            symbol: "GTCO".to_string(),
            timestamp: Utc::now(),
            open: 0.0,
            high: 1.0,
            low: 0.0,
            close: 1.0,
            volume: 0.0,
            value: 0.0,
        };
        assert_eq!(snap.change_percent(), 0.0);
    }

    #[test]
    fn test_market_summary_wire_field_names() {
        let summary = MarketSummary {
            asi: 100_000.0,
            change: 125.5,
            change_percent: 0.12,
            market_cap: 1.0e12,
            volume: 5.0e6,
            value: 2.1e8,
            last_update: Utc::now(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        for field in [
            "asi",
            "change",
            "change_percent",
            "market_cap",
            "volume",
            "value",
            "last_update",
        ] {
            assert!(json.get(field).is_some(), "missing field {}", field);
        }
        // last_update must be an ISO timestamp string.
        assert!(json["last_update"].is_string());
    }
}
