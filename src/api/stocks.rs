//! Stock endpoints: the registry roster, the cap-ranked board, the
//! per-symbol detailed quote and the raw snapshot history.

use crate::error::{AppError, Result};
use crate::types::PriceSnapshot;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_TOP_LIMIT: usize = 10;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/stocks/list", get(list))
        .route("/api/stocks/top", get(top))
        .route("/api/stock/:symbol", get(detail))
        .route("/api/historical/:symbol", get(historical))
}

#[derive(Debug, Serialize)]
struct StockListing {
    symbol: String,
    name: String,
}

/// Full tradable roster from the registry.
async fn list(State(state): State<AppState>) -> Json<Vec<StockListing>> {
    let listings = state
        .registry
        .all()
        .iter()
        .map(|inst| StockListing {
            symbol: inst.symbol.clone(),
            name: inst.name.clone(),
        })
        .collect();
    Json(listings)
}

#[derive(Debug, Deserialize)]
struct TopParams {
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct TopStock {
    symbol: String,
    name: String,
    price: f64,
    change: f64,
    change_percent: f64,
    market_cap: f64,
    volume: f64,
    value: f64,
    open: f64,
    high: f64,
    low: f64,
    recommendation: &'static str,
    explanation: String,
}

/// Top instruments by live market cap, with their current signal.
///
/// Symbols whose signal has not been computed yet are omitted rather than
/// shown with a defaulted recommendation.
async fn top(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> Result<Json<Vec<TopStock>>> {
    let limit = params.limit.unwrap_or(DEFAULT_TOP_LIMIT);

    let mut rows: Vec<TopStock> = state
        .registry
        .all()
        .iter()
        .filter_map(|inst| {
            let snapshot = state.history.latest(&inst.symbol)?;
            let signal = state.signals.signal(&inst.symbol)?;

            let market_cap = if inst.reference_price > 0.0 {
                inst.market_cap * snapshot.close / inst.reference_price
            } else {
                inst.market_cap
            };

            Some(TopStock {
                symbol: inst.symbol.clone(),
                name: inst.name.clone(),
                price: snapshot.close,
                change: snapshot.change(),
                change_percent: snapshot.change_percent(),
                market_cap,
                volume: snapshot.volume,
                value: snapshot.value,
                open: snapshot.open,
                high: snapshot.high,
                low: snapshot.low,
                recommendation: signal.recommendation.as_str(),
                explanation: signal.explanation,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.market_cap
            .partial_cmp(&a.market_cap)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows.truncate(limit);

    Ok(Json(rows))
}

#[derive(Debug, Serialize)]
struct StockDetail {
    symbol: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sector: Option<String>,
    price: f64,
    change: f64,
    change_percent: f64,
    market_cap: f64,
    volume: f64,
    value: f64,
    open: f64,
    high: f64,
    low: f64,
    timestamp: DateTime<Utc>,
    /// Absent until the classifier has enough history for the symbol.
    #[serde(skip_serializing_if = "Option::is_none")]
    recommendation: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
}

/// Detailed quote for one symbol: the latest snapshot plus the current
/// signal once it exists.
async fn detail(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<StockDetail>> {
    let instrument = state
        .registry
        .get(&symbol)
        .ok_or_else(|| AppError::NotFound(format!("Unknown symbol: {}", symbol)))?;

    let snapshot = state.history.latest(&instrument.symbol).ok_or_else(|| {
        AppError::NotFound(format!("{}: no quote received yet", instrument.symbol))
    })?;

    let market_cap = if instrument.reference_price > 0.0 {
        instrument.market_cap * snapshot.close / instrument.reference_price
    } else {
        instrument.market_cap
    };

    let signal = state.signals.signal(&instrument.symbol);

    Ok(Json(StockDetail {
        symbol: instrument.symbol.clone(),
        name: instrument.name.clone(),
        sector: instrument.sector.clone(),
        price: snapshot.close,
        change: snapshot.change(),
        change_percent: snapshot.change_percent(),
        market_cap,
        volume: snapshot.volume,
        value: snapshot.value,
        open: snapshot.open,
        high: snapshot.high,
        low: snapshot.low,
        timestamp: snapshot.timestamp,
        recommendation: signal.as_ref().map(|s| s.recommendation.as_str()),
        explanation: signal.map(|s| s.explanation),
    }))
}

/// The rolling snapshot window for one symbol, oldest bar first. An empty
/// array means the symbol is known but no bar has arrived yet.
async fn historical(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Vec<PriceSnapshot>>> {
    let instrument = state
        .registry
        .get(&symbol)
        .ok_or_else(|| AppError::NotFound(format!("Unknown symbol: {}", symbol)))?;

    Ok(Json(state.history.window(&instrument.symbol)))
}
