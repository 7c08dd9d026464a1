//! Router-level tests: every endpoint is exercised through the axum
//! router with in-process requests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use ngxpulse::config::Config;
use ngxpulse::registry::InstrumentRegistry;
use ngxpulse::services::coordinator::RefreshCoordinator;
use ngxpulse::services::indicators::MIN_BARS;
use ngxpulse::sources::SimulatedFeed;
use ngxpulse::types::{
    AccuracyRecord, EntryExitPlan, Instrument, RealizedOutcome, Recommendation, Signal,
};
use ngxpulse::{api, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

fn instrument(symbol: &str, name: &str, market_cap: f64, reference_price: f64) -> Instrument {
    Instrument {
        symbol: symbol.to_string(),
        name: name.to_string(),
        sector: Some("Banking".to_string()),
        market_cap,
        shares_outstanding: None,
        reference_price,
    }
}

fn test_state() -> AppState {
    let registry = InstrumentRegistry::from_instruments(vec![
        instrument(
            "GTCO",
            "Guaranty Trust Holding Company Plc",
            880.0e9,
            43.50,
        ),
        instrument("UBA", "United Bank for Africa Plc", 580.0e9, 26.50),
    ]);
    AppState::with_registry(Config::default(), registry)
}

/// Drive the refresh cycle until indicators have enough bars.
async fn warm_up(state: &AppState) {
    let coordinator = RefreshCoordinator::new(
        Arc::new(SimulatedFeed::new()),
        Arc::clone(&state.registry),
        Arc::clone(&state.history),
        Arc::clone(&state.signals),
        Arc::clone(&state.summary),
        Arc::clone(&state.accuracy),
        &state.config,
    );
    for _ in 0..MIN_BARS {
        coordinator.run_cycle().await;
    }
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn seeded_plan(symbol: &str) -> (Signal, EntryExitPlan) {
    let now = Utc::now();
    let signal = Signal {
        symbol: symbol.to_string(),
        timestamp: now,
        recommendation: Recommendation::Buy,
        reasons: vec![
            "RSI indicates oversold conditions at 25.0".to_string(),
            "MACD bullish crossover".to_string(),
        ],
        explanation: "2 of 3 technical checks lean bullish against 0 bearish.".to_string(),
    };
    let plan = EntryExitPlan {
        symbol: symbol.to_string(),
        timestamp: now,
        recommendation: Recommendation::Buy,
        price: 100.0,
        stop_loss: 95.0,
        take_profit: 110.0,
        justification: "RSI indicates oversold conditions at 25.0, MACD bullish crossover"
            .to_string(),
    };
    (signal, plan)
}

#[tokio::test]
async fn test_health() {
    let app = api::router(test_state());
    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_stocks_list_returns_the_roster() {
    let app = api::router(test_state());
    let (status, body) = get(&app, "/api/stocks/list").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["symbol"], "GTCO");
    assert_eq!(rows[0]["name"], "Guaranty Trust Holding Company Plc");
    assert_eq!(rows[1]["symbol"], "UBA");
}

#[tokio::test]
async fn test_stocks_top_empty_before_signals_exist() {
    let app = api::router(test_state());
    let (status, body) = get(&app, "/api/stocks/top").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_stocks_top_after_warm_up() {
    let state = test_state();
    warm_up(&state).await;
    let app = api::router(state);

    let (status, body) = get(&app, "/api/stocks/top").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        for field in [
            "symbol",
            "name",
            "price",
            "change",
            "change_percent",
            "market_cap",
            "volume",
            "value",
            "open",
            "high",
            "low",
            "recommendation",
            "explanation",
        ] {
            assert!(row.get(field).is_some(), "missing field {}", field);
        }
        let token = row["recommendation"].as_str().unwrap();
        assert!(Recommendation::parse(token).is_some(), "bad token {}", token);
    }
    // Sorted by market cap descending.
    assert!(rows[0]["market_cap"].as_f64().unwrap() >= rows[1]["market_cap"].as_f64().unwrap());
}

#[tokio::test]
async fn test_stocks_top_respects_limit() {
    let state = test_state();
    warm_up(&state).await;
    let app = api::router(state);

    let (status, body) = get(&app, "/api/stocks/top?limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stock_detail_unknown_symbol_is_404() {
    let app = api::router(test_state());
    let (status, body) = get(&app, "/api/stock/NOSUCH").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("NOSUCH"));
}

#[tokio::test]
async fn test_stock_detail_known_symbol_without_quote_is_404() {
    let app = api::router(test_state());
    let (status, body) = get(&app, "/api/stock/GTCO").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_stock_detail_after_warm_up() {
    let state = test_state();
    warm_up(&state).await;
    let app = api::router(state);

    let (status, body) = get(&app, "/api/stock/gtco").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "GTCO");
    assert_eq!(body["name"], "Guaranty Trust Holding Company Plc");
    for field in [
        "price",
        "change",
        "change_percent",
        "market_cap",
        "volume",
        "value",
        "open",
        "high",
        "low",
        "timestamp",
    ] {
        assert!(body.get(field).is_some(), "missing field {}", field);
    }
    let token = body["recommendation"].as_str().unwrap();
    assert!(Recommendation::parse(token).is_some(), "bad token {}", token);
    assert!(body["explanation"].is_string());
}

#[tokio::test]
async fn test_historical_unknown_symbol_is_404() {
    let app = api::router(test_state());
    let (status, body) = get(&app, "/api/historical/NOSUCH").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("NOSUCH"));
}

#[tokio::test]
async fn test_historical_empty_before_first_bar() {
    let app = api::router(test_state());
    let (status, body) = get(&app, "/api/historical/GTCO").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_historical_returns_the_window_oldest_first() {
    let state = test_state();
    warm_up(&state).await;
    let app = api::router(state);

    let (status, body) = get(&app, "/api/historical/GTCO").await;
    assert_eq!(status, StatusCode::OK);

    let bars = body.as_array().unwrap();
    assert!(bars.len() >= MIN_BARS);
    for bar in bars {
        for field in [
            "symbol", "timestamp", "open", "high", "low", "close", "volume", "value",
        ] {
            assert!(bar.get(field).is_some(), "missing field {}", field);
        }
        assert_eq!(bar["symbol"], "GTCO");
    }
    // Oldest first.
    let first = bars[0]["timestamp"].as_str().unwrap();
    let last = bars[bars.len() - 1]["timestamp"].as_str().unwrap();
    assert!(first <= last);
}

#[tokio::test]
async fn test_entry_exit_unknown_symbol_is_404() {
    let app = api::router(test_state());
    let (status, body) = get(&app, "/api/entry-exit/NOSUCH").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("NOSUCH"));
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_entry_exit_known_symbol_without_plan_is_404() {
    let state = test_state();
    // A NEUTRAL signal means no plan: the endpoint must answer absence,
    // never zeros.
    let (mut signal, _) = seeded_plan("GTCO");
    signal.recommendation = Recommendation::Neutral;
    state.signals.put(signal, None);

    let app = api::router(state);
    let (status, body) = get(&app, "/api/entry-exit/GTCO").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_entry_exit_returns_the_plan_contract() {
    let state = test_state();
    let (signal, plan) = seeded_plan("GTCO");
    state.signals.put(signal, Some(plan));

    let app = api::router(state);
    let (status, body) = get(&app, "/api/entry-exit/GTCO").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], 100.0);
    assert_eq!(body["stop_loss"], 95.0);
    assert_eq!(body["take_profit"], 110.0);
    assert_eq!(
        body["justification"],
        "RSI indicates oversold conditions at 25.0, MACD bullish crossover"
    );
}

#[tokio::test]
async fn test_entry_exit_lookup_is_case_insensitive() {
    let state = test_state();
    let (signal, plan) = seeded_plan("GTCO");
    state.signals.put(signal, Some(plan));

    let app = api::router(state);
    let (status, _) = get(&app, "/api/entry-exit/gtco").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_market_summary_404_before_first_cycle() {
    let app = api::router(test_state());
    let (status, body) = get(&app, "/api/market-summary").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_market_summary_contract_after_warm_up() {
    let state = test_state();
    warm_up(&state).await;
    let app = api::router(state);

    let (status, body) = get(&app, "/api/market-summary").await;
    assert_eq!(status, StatusCode::OK);
    for field in [
        "asi",
        "change",
        "change_percent",
        "market_cap",
        "volume",
        "value",
        "last_update",
    ] {
        assert!(body.get(field).is_some(), "missing field {}", field);
    }
    assert!(body["asi"].as_f64().unwrap() > 0.0);
    assert!(body["last_update"].is_string());
}

#[tokio::test]
async fn test_educational_known_tokens() {
    let app = api::router(test_state());
    for token in ["STRONG_BUY", "BUY", "NEUTRAL", "SELL", "STRONG_SELL"] {
        let (status, body) = get(&app, &format!("/api/educational/{}", token)).await;
        assert_eq!(status, StatusCode::OK, "token {}", token);
        assert_eq!(body["recommendation"], token);
        assert!(body["title"].is_string());
        assert!(!body["content"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_educational_is_case_insensitive() {
    let app = api::router(test_state());
    let (status, body) = get(&app, "/api/educational/strong_buy").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommendation"], "STRONG_BUY");
}

#[tokio::test]
async fn test_educational_unknown_token_is_404() {
    let app = api::router(test_state());
    let (status, body) = get(&app, "/api/educational/HOLD").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("HOLD"));
}

#[tokio::test]
async fn test_confidence_is_null_until_anything_resolves() {
    let app = api::router(test_state());
    let (status, body) = get(&app, "/api/confidence").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["accuracy"].is_null());
    assert_eq!(body["resolved"], 0);
    assert!(body["lookback_hours"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_confidence_reflects_resolved_outcomes() {
    let state = test_state();
    let now = Utc::now();
    for outcome in [RealizedOutcome::HitTakeProfit, RealizedOutcome::HitStopLoss] {
        state.accuracy.append(AccuracyRecord {
            id: Uuid::new_v4(),
            symbol: "GTCO".to_string(),
            signal_timestamp: now,
            recommendation: Recommendation::Buy,
            outcome,
            resolved_at: now,
        });
    }

    let app = api::router(state);
    let (status, body) = get(&app, "/api/confidence").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accuracy"], 50.0);
    assert_eq!(body["resolved"], 2);

    let (status, body) = get(&app, "/api/confidence/GTCO").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "GTCO");
    assert_eq!(body["accuracy"], 50.0);
}

#[tokio::test]
async fn test_confidence_unknown_symbol_is_404() {
    let app = api::router(test_state());
    let (status, _) = get(&app, "/api/confidence/NOSUCH").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
