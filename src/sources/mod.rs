//! Market data adapters.
//!
//! The engine treats the exchange feed as an external collaborator behind
//! the [`MarketDataAdapter`] seam: an HTTP quote client when an upstream
//! is configured, a simulated walk otherwise.

pub mod ngx;
pub mod simulated;

pub use ngx::NgxQuoteClient;
pub use simulated::SimulatedFeed;

use crate::error::Result;
use crate::types::{Instrument, PriceSnapshot};
use async_trait::async_trait;

/// Supplies one OHLCV snapshot per symbol per polling cycle.
#[async_trait]
pub trait MarketDataAdapter: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    /// Fetch the current snapshot for an instrument.
    ///
    /// Fails with `UpstreamUnavailable` when the source cannot be reached
    /// and `MalformedResponse` when the payload does not validate; the
    /// caller retains the last-known snapshot in either case.
    async fn fetch_snapshot(&self, instrument: &Instrument) -> Result<PriceSnapshot>;
}

/// Validate an OHLCV payload at the API boundary.
pub(crate) fn validate_snapshot(snapshot: &PriceSnapshot) -> Result<()> {
    let fields = [
        ("open", snapshot.open),
        ("high", snapshot.high),
        ("low", snapshot.low),
        ("close", snapshot.close),
        ("volume", snapshot.volume),
    ];
    for (name, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(crate::error::AppError::MalformedResponse(format!(
                "{}: invalid {} {}",
                snapshot.symbol, name, value
            )));
        }
    }
    if snapshot.low > snapshot.high {
        return Err(crate::error::AppError::MalformedResponse(format!(
            "{}: low {} above high {}",
            snapshot.symbol, snapshot.low, snapshot.high
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(open: f64, high: f64, low: f64, close: f64) -> PriceSnapshot {
        PriceSnapshot {
            symbol: "GTCO".to_string(),
            timestamp: Utc::now(),
            open,
            high,
            low,
            close,
            volume: 100.0,
            value: close * 100.0,
        }
    }

    #[test]
    fn test_validate_accepts_sane_snapshot() {
        assert!(validate_snapshot(&snapshot(40.0, 44.0, 39.0, 42.0)).is_ok());
    }

    #[test]
    fn test_validate_rejects_nan_and_negative() {
        assert!(validate_snapshot(&snapshot(f64::NAN, 44.0, 39.0, 42.0)).is_err());
        assert!(validate_snapshot(&snapshot(40.0, 44.0, -1.0, 42.0)).is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let err = validate_snapshot(&snapshot(40.0, 39.0, 44.0, 42.0)).unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::MalformedResponse(_)
        ));
    }
}
