//! HTTP client for the prediction backend.

use serde::Deserialize;

/// HTTP client for a model server hosting the workflow models.
///
/// One client is shared by every workflow variant; models are addressed
/// by name and version per request.
pub struct InferenceClient {
    client: reqwest::Client,
    base_url: String,
}

/// Response body of a successful `:predict` call.
#[derive(Debug, Deserialize)]
struct PredictResponse {
    predictions: Vec<serde_json::Value>,
}

/// Errors from the inference REST layer.
#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Inference backend error ({status}): {body}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The backend answered 2xx but the body was not the expected shape.
    #[error("Malformed prediction response: {0}")]
    MalformedResponse(String),
}

impl InferenceClient {
    /// Create a new client for a model server.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://host:8500`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across model servers).
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Base HTTP URL of the model server.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run inference against one model version.
    ///
    /// Sends `POST /v1/models/{model}/versions/{version}:predict` with
    /// an `instances` batch and returns the `predictions` batch. No
    /// retry is applied; a failed call surfaces to the workflow that
    /// asked for it.
    pub async fn predict(
        &self,
        model: &str,
        version: &str,
        instances: serde_json::Value,
    ) -> Result<Vec<serde_json::Value>, InferenceError> {
        let url = format!(
            "{}/v1/models/{model}/versions/{version}:predict",
            self.base_url
        );
        let body = serde_json::json!({ "instances": instances });

        tracing::debug!(%model, %version, "Sending predict request");

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response.json().await?;
        parse_predictions(body)
    }
}

/// Extract the `predictions` array from a 2xx response body.
fn parse_predictions(body: serde_json::Value) -> Result<Vec<serde_json::Value>, InferenceError> {
    let parsed: PredictResponse = serde_json::from_value(body)
        .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;

    if parsed.predictions.is_empty() {
        return Err(InferenceError::MalformedResponse(
            "empty predictions array".to_string(),
        ));
    }

    Ok(parsed.predictions)
}
