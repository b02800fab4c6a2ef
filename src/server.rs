use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::features;
use crate::predict_fetch::{PredictError, Predictor};
use crate::reasons;

/// Shared application state
#[derive(Debug)]
pub struct AppState {
    pub predictor: Predictor,
}

/// What the form gets back for a scored player.
#[derive(Debug, Serialize)]
pub struct VerdictResponse {
    pub prediction: Option<i64>,
    pub message: Option<String>,
    pub reasons: Vec<String>,
    pub overall_calculated: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Create the relay router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict-stats", post(predict_stats))
        .route("/health", get(health))
        .fallback_service(ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("scout gate listening on {}", addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

/// Score one submitted player.
///
/// Whatever subset of fields arrived is normalized to the full record,
/// relayed to the prediction service, and the verdict comes back with
/// reasons attached only when the player was rejected.
async fn predict_stats(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<Value>,
) -> Result<Json<VerdictResponse>, (StatusCode, Json<ErrorResponse>)> {
    let normalized = features::normalize(&raw);

    let result = state.predictor.request(&normalized).await.map_err(|err| {
        match &err {
            PredictError::Upstream(message) => {
                tracing::warn!("prediction service rejected request: {}", message);
            }
            PredictError::Unavailable(inner) => {
                tracing::error!("prediction service unavailable: {:#}", inner);
            }
        }
        (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: err.user_message(),
            }),
        )
    })?;

    let reasons = if result.prediction == Some(0) {
        reasons::ineligibility_reasons(&normalized)
    } else {
        Vec::new()
    };

    Ok(Json(VerdictResponse {
        prediction: result.prediction,
        message: result.message,
        reasons,
        overall_calculated: result.overall_calculated,
    }))
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
