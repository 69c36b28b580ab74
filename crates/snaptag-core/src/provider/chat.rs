//! Wire client for OpenAI-compatible chat completion APIs.
//!
//! Covers the lmstudio local server and the OpenAI and Google cloud
//! backends: the request shape is identical, the endpoint and bearer
//! token differ. Images travel as data URLs inside the user message
//! content array.

use super::model::{ModelRequest, ModelResponse, VisionModel};
use crate::error::KeywordError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Client for the chat completions wire format.
#[derive(Debug)]
pub struct ChatClient {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
    timeout: Duration,
}

impl ChatClient {
    /// Client for a local OpenAI-compatible server (no auth, generous timeout).
    pub fn local(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key: None,
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Client for a cloud endpoint with bearer-token auth.
    pub fn cloud(endpoint: &str, model: &str, api_key: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key: Some(api_key.to_string()),
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(60),
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: MessageContent,
}

/// Chat message content: plain text for translate calls, a parts array
/// carrying text plus a data-URL image for describe calls.
#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl VisionModel for ChatClient {
    fn name(&self) -> &str {
        "chat"
    }

    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse, KeywordError> {
        let start = Instant::now();

        let user_content = match &request.image {
            Some(image) => MessageContent::Parts(vec![
                ContentPart::Text {
                    text: request.prompt.clone(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image.data_url(),
                    },
                },
            ]),
            None => MessageContent::Text(request.prompt.clone()),
        };

        let body = ChatRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: MessageContent::Text("You are a helpful assistant.".to_string()),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_content,
                },
            ],
        };

        let mut req = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .timeout(self.timeout());

        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {key}"));
        }

        let resp = req.send().await.map_err(|e| KeywordError::Model {
            message: format!("Chat request failed: {e}"),
            status_code: None,
        })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(KeywordError::Model {
                message: format!("Chat HTTP {status}: {text}"),
                status_code: Some(status.as_u16()),
            });
        }

        let chat_resp: ChatResponse = resp.json().await.map_err(|e| KeywordError::Model {
            message: format!("Failed to parse chat response: {e}"),
            status_code: None,
        })?;

        let text = chat_resp
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| KeywordError::Model {
                message: "Chat response had no message content".to_string(),
                status_code: None,
            })?;

        Ok(ModelResponse {
            text: text.trim().to_string(),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
