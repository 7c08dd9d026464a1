use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    /// The price history window is too short to compute indicators.
    /// Callers skip or defer classification for the symbol this cycle.
    #[error("Insufficient data for {symbol}: {have} bars, need {need}")]
    InsufficientData {
        symbol: String,
        have: usize,
        need: usize,
    },

    /// A NEUTRAL signal produces no entry/exit plan. Surfaced to the
    /// caller as absence of a plan, never as a zeroed plan.
    #[error("No actionable setup: {0}")]
    NoActionableSetup(String),

    /// The volatility input would make stop-loss equal the entry price.
    #[error("Degenerate risk: {0}")]
    DegenerateRisk(String),

    /// The market data adapter failed; the last-known snapshot is kept.
    #[error("Upstream data unavailable: {0}")]
    UpstreamUnavailable(String),

    /// API boundary validation failure. Logged and surfaced, never
    /// silently defaulted.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InsufficientData { .. } => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::NoActionableSetup(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::DegenerateRisk(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::UpstreamUnavailable(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::MalformedResponse(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Reqwest(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            AppError::SerdeJson(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Anyhow(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = AppError::InsufficientData {
            symbol: "GTCO".to_string(),
            have: 10,
            need: 35,
        };
        let msg = err.to_string();
        assert!(msg.contains("GTCO"));
        assert!(msg.contains("10"));
        assert!(msg.contains("35"));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::NoActionableSetup("neutral".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::UpstreamUnavailable("down".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::MalformedResponse("bad json".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                AppError::DegenerateRisk("zero volatility".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];
        for (err, expected) in cases {
            let response = err.into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
