//! Local stand-in for the prediction service, for end-to-end runs without
//! the real model. Pass --legacy to answer in the old `{"response": n}` shape.

use anyhow::{Context, Result};
use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde_json::{Value, json};

const STUB_ADDR: &str = "127.0.0.1:5000";
const ELIGIBLE_CUTOFF: f64 = 70.0;

const SCORED_ATTRS: [&str; 6] = [
    "pace",
    "shooting",
    "passing",
    "defending",
    "physic",
    "potential",
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stub_predictor=info".into()),
        )
        .init();

    let legacy = std::env::args().skip(1).any(|arg| arg == "--legacy");

    let app = Router::new()
        .route("/predict", post(predict))
        .with_state(legacy);

    let listener = tokio::net::TcpListener::bind(STUB_ADDR)
        .await
        .with_context(|| format!("failed to bind {STUB_ADDR}"))?;
    tracing::info!(
        "stub predictor listening on {} ({} replies)",
        STUB_ADDR,
        if legacy { "legacy" } else { "modern" }
    );
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

/// Scores the mean of the six rated attributes against a fixed cutoff.
/// An empty or non-object payload gets the same 400 envelope the real
/// service sends.
async fn predict(
    State(legacy): State<bool>,
    Json(data): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Some(fields) = data.as_object().filter(|m| !m.is_empty()) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid input: No data provided." })),
        ));
    };

    let overall = (SCORED_ATTRS
        .iter()
        .map(|key| fields.get(*key).and_then(Value::as_f64).unwrap_or(0.0))
        .sum::<f64>()
        / SCORED_ATTRS.len() as f64)
        .round();
    let prediction = i64::from(overall >= ELIGIBLE_CUTOFF);

    if legacy {
        return Ok(Json(json!({ "response": prediction })));
    }

    let message = if prediction == 1 {
        "Player meets the eligibility threshold."
    } else {
        "Player falls short of the eligibility threshold."
    };
    Ok(Json(json!({
        "prediction": prediction,
        "message": message,
        "overall_calculated": overall,
    })))
}
