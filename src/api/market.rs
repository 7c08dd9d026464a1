//! Market summary and confidence endpoints.

use crate::error::{AppError, Result};
use crate::types::MarketSummary;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::Serialize;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/market-summary", get(market_summary))
        .route("/api/confidence", get(confidence))
        .route("/api/confidence/:symbol", get(confidence_for_symbol))
}

async fn market_summary(State(state): State<AppState>) -> Result<Json<MarketSummary>> {
    let summary = state
        .summary
        .latest()
        .await
        .ok_or_else(|| AppError::NotFound("Market summary not computed yet".to_string()))?;
    Ok(Json(summary))
}

#[derive(Debug, Serialize)]
struct ConfidenceResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol: Option<String>,
    /// Percentage of favorably resolved recommendations over the lookback,
    /// `null` until anything has resolved.
    accuracy: Option<f64>,
    resolved: usize,
    lookback_hours: i64,
}

async fn confidence(State(state): State<AppState>) -> Json<ConfidenceResponse> {
    Json(confidence_report(&state, None))
}

async fn confidence_for_symbol(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ConfidenceResponse>> {
    let instrument = state
        .registry
        .get(&symbol)
        .ok_or_else(|| AppError::NotFound(format!("Unknown symbol: {}", symbol)))?;
    Ok(Json(confidence_report(&state, Some(&instrument.symbol))))
}

fn confidence_report(state: &AppState, symbol: Option<&str>) -> ConfidenceResponse {
    let lookback_hours = state.config.accuracy_lookback_hours;
    let lookback = Duration::hours(lookback_hours);
    let now = Utc::now();

    ConfidenceResponse {
        symbol: symbol.map(str::to_string),
        accuracy: state.accuracy.accuracy(symbol, lookback, now),
        resolved: state.accuracy.resolved_count(symbol, lookback, now),
        lookback_hours,
    }
}
