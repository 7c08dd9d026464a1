//! Educational content per recommendation level, for the dashboard's
//! "what does this mean" panel.

use crate::error::{AppError, Result};
use crate::types::Recommendation;
use crate::AppState;
use axum::{extract::Path, routing::get, Json, Router};
use serde::Serialize;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/educational/:recommendation", get(educational))
}

#[derive(Debug, Serialize)]
struct EducationalResponse {
    recommendation: &'static str,
    title: &'static str,
    content: &'static str,
}

fn content_for(recommendation: Recommendation) -> (&'static str, &'static str) {
    match recommendation {
        Recommendation::StrongBuy => (
            "Strong Buy Signal",
            "All technical checks agree on bullish momentum: RSI shows the \
             stock is oversold, MACD has crossed above its signal line, and \
             the price has dropped below the lower Bollinger band. \
             Historically such alignments often precede a rebound, but no \
             indicator combination guarantees one. Size positions so a stop \
             at the suggested level is an acceptable loss.",
        ),
        Recommendation::Buy => (
            "Buy Signal",
            "A majority of technical checks lean bullish. Momentum or trend \
             favour an upward move while at least one check disagrees, so \
             conviction is moderate. Consider waiting for confirmation such \
             as rising volume, and always place the stop-loss before the \
             entry.",
        ),
        Recommendation::Neutral => (
            "Neutral / Hold",
            "The technical checks disagree or all sit in their middle \
             ranges. There is no statistical edge in either direction, so \
             no entry or exit levels are produced. If you already hold the \
             stock, a neutral reading is not by itself a reason to sell.",
        ),
        Recommendation::Sell => (
            "Sell Signal",
            "A majority of technical checks lean bearish: momentum is \
             fading or the price is stretched above its recent range. \
             Holders may consider reducing exposure; short setups carry \
             extra risk because losses are uncapped if the price rises.",
        ),
        Recommendation::StrongSell => (
            "Strong Sell Signal",
            "All technical checks agree on bearish pressure: RSI shows the \
             stock is overbought, MACD has crossed below its signal line, \
             and the price is above the upper Bollinger band. Such \
             stretched readings often revert, though strong trends can stay \
             overbought for a long time. Respect the stop level on any \
             short position.",
        ),
    }
}

async fn educational(Path(recommendation): Path<String>) -> Result<Json<EducationalResponse>> {
    let parsed = Recommendation::parse(&recommendation).ok_or_else(|| {
        AppError::NotFound(format!("Unknown recommendation: {}", recommendation))
    })?;

    let (title, content) = content_for(parsed);
    Ok(Json(EducationalResponse {
        recommendation: parsed.as_str(),
        title,
        content,
    }))
}
