use std::sync::Arc;

use anyhow::Result;

use scout_gate::predict_fetch::{DEFAULT_PREDICT_URL, Predictor};
use scout_gate::server::{self, AppState};

const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scout_gate=info,tower_http=info".into()),
        )
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|val| val.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let predictor = Predictor::new(DEFAULT_PREDICT_URL)?;
    tracing::info!("relaying predictions to {}", predictor.url());

    let state = Arc::new(AppState { predictor });
    server::serve(&format!("0.0.0.0:{port}"), state).await
}
