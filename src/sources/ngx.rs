//! HTTP quote client for an upstream NGX market data API.

use crate::error::{AppError, Result};
use crate::sources::{validate_snapshot, MarketDataAdapter};
use crate::types::{Instrument, PriceSnapshot};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Upstream quote payload.
#[derive(Debug, Clone, Deserialize)]
struct QuotePayload {
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

/// Polling client for an NGX quote endpoint
/// (`{base_url}/quote/{symbol}`).
pub struct NgxQuoteClient {
    client: Client,
    base_url: String,
}

impl NgxQuoteClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ngxpulse/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl MarketDataAdapter for NgxQuoteClient {
    fn name(&self) -> &'static str {
        "ngx-quote-api"
    }

    async fn fetch_snapshot(&self, instrument: &Instrument) -> Result<PriceSnapshot> {
        let url = format!("{}/quote/{}", self.base_url, instrument.symbol);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("{}: {}", instrument.symbol, e)))?;

        if !response.status().is_success() {
            return Err(AppError::UpstreamUnavailable(format!(
                "{}: upstream returned {}",
                instrument.symbol,
                response.status()
            )));
        }

        let payload = response
            .json::<QuotePayload>()
            .await
            .map_err(|e| AppError::MalformedResponse(format!("{}: {}", instrument.symbol, e)))?;

        let snapshot = PriceSnapshot {
            symbol: instrument.symbol.clone(),
            timestamp: chrono::Utc::now(),
            open: payload.open,
            high: payload.high,
            low: payload.low,
            close: payload.close,
            volume: payload.volume,
            value: payload.close * payload.volume,
        };

        validate_snapshot(&snapshot)?;
        Ok(snapshot)
    }
}
