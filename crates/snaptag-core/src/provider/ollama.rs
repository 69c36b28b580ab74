//! Wire client for local generate-style inference servers.
//!
//! Talks to an Ollama-compatible instance via its HTTP generate API.
//! No authentication required; just needs the server running locally.

use super::model::{ModelRequest, ModelResponse, VisionModel};
use crate::error::KeywordError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Client for the local generate wire format.
#[derive(Debug)]
pub struct GenerateClient {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl GenerateClient {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

/// Generate request body.
#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
    stream: bool,
}

/// Generate response body.
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[async_trait]
impl VisionModel for GenerateClient {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse, KeywordError> {
        let start = Instant::now();

        let body = GenerateRequest {
            model: self.model.clone(),
            prompt: request.prompt.clone(),
            images: request.image.as_ref().map(|img| vec![img.data.clone()]),
            stream: false,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| KeywordError::Model {
                message: format!("Generate request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(KeywordError::Model {
                message: format!("Generate HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let generate_resp: GenerateResponse =
            resp.json().await.map_err(|e| KeywordError::Model {
                message: format!("Failed to parse generate response: {e}"),
                status_code: None,
            })?;

        Ok(ModelResponse {
            text: generate_resp.response.trim().to_string(),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        // Vision models running locally can be slow
        Duration::from_secs(120)
    }
}
