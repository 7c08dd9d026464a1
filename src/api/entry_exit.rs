//! Entry/exit plan endpoint. A plan either exists in full or not at all;
//! NEUTRAL symbols answer 404, never a zeroed plan.

use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/entry-exit/:symbol", get(entry_exit))
}

#[derive(Debug, Serialize)]
struct EntryExitResponse {
    price: f64,
    stop_loss: f64,
    take_profit: f64,
    justification: String,
}

async fn entry_exit(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<EntryExitResponse>> {
    let instrument = state
        .registry
        .get(&symbol)
        .ok_or_else(|| AppError::NotFound(format!("Unknown symbol: {}", symbol)))?;

    let plan = state.signals.plan(&instrument.symbol).ok_or_else(|| {
        AppError::NoActionableSetup(format!(
            "{}: no actionable entry/exit setup",
            instrument.symbol
        ))
    })?;

    Ok(Json(EntryExitResponse {
        price: plan.price,
        stop_loss: plan.stop_loss,
        take_profit: plan.take_profit,
        justification: plan.justification,
    }))
}
