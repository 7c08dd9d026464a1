//! HTTP API. Handlers read the engine's published state; all computation
//! happens in the background refresh cycle.

pub mod educational;
pub mod entry_exit;
pub mod health;
pub mod market;
pub mod stocks;

use crate::AppState;
use axum::Router;

/// Assemble the full API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(stocks::router())
        .merge(entry_exit::router())
        .merge(market::router())
        .merge(educational::router())
        .with_state(state)
}
