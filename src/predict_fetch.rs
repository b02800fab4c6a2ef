use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::features::{NormalizedFeatures, pick_number, pick_text};

/// Reference deployment of the prediction service.
pub const DEFAULT_PREDICT_URL: &str = "http://127.0.0.1:5000/predict";

/// Shown when the service gave us nothing usable back.
pub const SERVICE_DOWN_MESSAGE: &str =
    "Having trouble thinking right now. Please try again later.";

#[derive(Debug, Error)]
pub enum PredictError {
    /// The service answered with its own error envelope.
    #[error("{0}")]
    Upstream(String),
    /// No answer at all, or one we could not read.
    #[error(transparent)]
    Unavailable(#[from] anyhow::Error),
}

impl PredictError {
    /// What the caller of the relay gets to see. Upstream messages pass
    /// through verbatim; everything else collapses to the generic line so
    /// connection internals never leak.
    pub fn user_message(&self) -> String {
        match self {
            PredictError::Upstream(message) => message.clone(),
            PredictError::Unavailable(_) => SERVICE_DOWN_MESSAGE.to_string(),
        }
    }
}

/// Verdict as the service reported it, nulls preserved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredictionResult {
    pub prediction: Option<i64>,
    pub message: Option<String>,
    pub overall_calculated: Option<f64>,
}

/// One shared client per process; requests ride its connection pool.
#[derive(Debug, Clone)]
pub struct Predictor {
    client: Client,
    url: String,
}

impl Predictor {
    /// No timeout on the client: the verdict is worth waiting for, and the
    /// caller holds exactly one request open at a time.
    pub fn new(url: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Single round trip to the prediction service, no retries.
    pub async fn request(
        &self,
        features: &NormalizedFeatures,
    ) -> Result<PredictionResult, PredictError> {
        let resp = self
            .client
            .post(&self.url)
            .json(features)
            .send()
            .await
            .context("predict request failed")?;
        let status = resp.status();
        let body = resp.text().await.context("failed reading predict body")?;
        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }
        Ok(parse_prediction_json(&body))
    }
}

/// An `{ "error": ... }` body becomes an upstream error and is surfaced
/// as-is; anything else, whatever its shape, is treated as the service
/// being down.
fn classify_failure(status: StatusCode, body: &str) -> PredictError {
    let trimmed = body.trim();
    if let Ok(root) = serde_json::from_str::<Value>(trimmed) {
        if let Some(message) = pick_text(&root, &["error"]) {
            return PredictError::Upstream(message);
        }
    }
    let snippet = trimmed
        .replace('\n', " ")
        .replace('\r', " ")
        .chars()
        .take(220)
        .collect::<String>();
    PredictError::Unavailable(anyhow::anyhow!("predict http {status}: {snippet}"))
}

/// Lenient read of a 2xx body. The service has stringified numbers and
/// renamed `prediction` to `response` across versions, so every field is
/// picked with coercion and missing ones stay null.
pub fn parse_prediction_json(raw: &str) -> PredictionResult {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return PredictionResult::default();
    }
    let Ok(root) = serde_json::from_str::<Value>(trimmed) else {
        return PredictionResult::default();
    };

    PredictionResult {
        prediction: pick_int(&root, &["prediction", "response"]),
        message: pick_text(&root, &["message"]),
        overall_calculated: pick_number(&root, &["overall_calculated"]),
    }
}

fn pick_int(value: &Value, keys: &[&str]) -> Option<i64> {
    for key in keys {
        let Some(v) = value.get(*key) else { continue };
        if let Some(num) = v.as_i64() {
            return Some(num);
        }
        if let Some(num) = v.as_f64() {
            return Some(num as i64);
        }
        if let Some(s) = v.as_str() {
            if let Ok(num) = s.trim().parse::<f64>() {
                // NaN would cast to 0 and read as a rejection.
                if num.is_finite() {
                    return Some(num as i64);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_reply() {
        let raw = r#"{"prediction": 1, "message": "Player is eligible", "overall_calculated": 71.5}"#;
        let parsed = parse_prediction_json(raw);
        assert_eq!(parsed.prediction, Some(1));
        assert_eq!(parsed.message.as_deref(), Some("Player is eligible"));
        assert_eq!(parsed.overall_calculated, Some(71.5));
    }

    #[test]
    fn legacy_response_key_backs_prediction() {
        let parsed = parse_prediction_json(r#"{"response": 0}"#);
        assert_eq!(parsed.prediction, Some(0));
        assert_eq!(parsed.message, None);
        assert_eq!(parsed.overall_calculated, None);
    }

    #[test]
    fn stringified_numbers_are_coerced() {
        let parsed = parse_prediction_json(r#"{"prediction": "0", "overall_calculated": "68"}"#);
        assert_eq!(parsed.prediction, Some(0));
        assert_eq!(parsed.overall_calculated, Some(68.0));
    }

    #[test]
    fn float_predictions_truncate_to_the_verdict_bit() {
        let parsed = parse_prediction_json(r#"{"prediction": 1.0}"#);
        assert_eq!(parsed.prediction, Some(1));
    }

    #[test]
    fn non_finite_prediction_strings_stay_null() {
        let parsed = parse_prediction_json(r#"{"prediction": "nan"}"#);
        assert_eq!(parsed.prediction, None);
        let parsed = parse_prediction_json(r#"{"prediction": "inf"}"#);
        assert_eq!(parsed.prediction, None);
    }

    #[test]
    fn unreadable_bodies_become_all_nulls() {
        assert_eq!(parse_prediction_json(""), PredictionResult::default());
        assert_eq!(parse_prediction_json("null"), PredictionResult::default());
        assert_eq!(
            parse_prediction_json("<html>oops</html>"),
            PredictionResult::default()
        );
    }

    #[test]
    fn error_envelopes_pass_through_verbatim() {
        let err = classify_failure(
            StatusCode::BAD_REQUEST,
            r#"{"error": "Invalid input: No data provided."}"#,
        );
        assert_eq!(err.user_message(), "Invalid input: No data provided.");
    }

    #[test]
    fn message_keys_do_not_pass_through() {
        let err = classify_failure(StatusCode::BAD_GATEWAY, r#"{"message": "upstream timeout"}"#);
        assert_eq!(err.user_message(), SERVICE_DOWN_MESSAGE);
    }

    #[test]
    fn opaque_failures_get_the_generic_message() {
        let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "<html>traceback</html>");
        assert_eq!(err.user_message(), SERVICE_DOWN_MESSAGE);
    }
}
