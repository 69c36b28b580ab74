//! Vision model trait and request/response types.
//!
//! Defines the interface that all wire clients implement, plus the prompt
//! builders for the two request shapes the generator issues: one English
//! describe call per image, and one translate call per additional language.

use crate::error::KeywordError;
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

/// Base64-encoded image ready to send to a model API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and format string.
    ///
    /// The bytes are sent as-is: no resizing, no format conversion. Large
    /// source images increase payload size and latency linearly.
    pub fn from_bytes(bytes: &[u8], format: &str) -> Self {
        let media_type = match format {
            "jpeg" | "jpg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "bmp" => "image/bmp",
            other => {
                tracing::warn!("Unknown image format '{other}', defaulting to image/jpeg");
                "image/jpeg"
            }
        };

        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// A single completion request: a prompt plus an optional image payload.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// Text prompt for the model
    pub prompt: String,
    /// Image payload; present for describe calls, absent for translate calls
    pub image: Option<ImageInput>,
    /// Maximum tokens to generate (chat-style providers only)
    pub max_tokens: u32,
}

impl ModelRequest {
    /// Build the English keyword describe request for an image.
    pub fn describe(image: ImageInput, max_tokens: u32) -> Self {
        let prompt = "Generate 5-7 relevant keywords for this image in English. \
                      Focus on describing: objects, colors, actions, emotions, settings, style. \
                      Avoid generic terms like 'photograph', 'photography', 'image', 'picture' \
                      or software names. \
                      Provide only single words or short phrases, separated by commas."
            .to_string();

        Self {
            prompt,
            image: Some(image),
            max_tokens,
        }
    }

    /// Build a translate request carrying already-generated English keywords.
    pub fn translate(english_keywords: &[String], language_name: &str, max_tokens: u32) -> Self {
        let prompt = format!(
            "Translate these English keywords to {language_name}, keeping the same \
             meaning and style. Return only the translations, separated by commas: {}",
            english_keywords.join(", ")
        );

        Self {
            prompt,
            image: None,
            max_tokens,
        }
    }
}

/// The raw text response from a model call.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    /// Raw generated text, before keyword normalization
    pub text: String,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all wire clients implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn VisionModel>` for dynamic dispatch).
#[async_trait]
pub trait VisionModel: Send + Sync + std::fmt::Debug {
    /// Client name for logging (e.g., "ollama", "chat").
    fn name(&self) -> &str;

    /// Issue one completion request and return the raw response text.
    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse, KeywordError>;

    /// Per-request timeout for this client.
    fn timeout(&self) -> Duration;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_input_from_bytes_jpeg() {
        let input = ImageInput::from_bytes(&[0xFF, 0xD8, 0xFF], "jpeg");
        assert_eq!(input.media_type, "image/jpeg");
        assert!(!input.data.is_empty());
    }

    #[test]
    fn test_image_input_from_bytes_png() {
        let input = ImageInput::from_bytes(&[0x89, 0x50, 0x4E, 0x47], "png");
        assert_eq!(input.media_type, "image/png");
    }

    #[test]
    fn test_image_input_data_url() {
        let input = ImageInput::from_bytes(&[1, 2, 3], "jpeg");
        let url = input.data_url();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_describe_request_carries_image() {
        let image = ImageInput::from_bytes(&[1, 2, 3], "jpeg");
        let request = ModelRequest::describe(image, 300);
        assert!(request.image.is_some());
        assert!(request.prompt.contains("5-7 relevant keywords"));
        assert!(request.prompt.contains("separated by commas"));
    }

    #[test]
    fn test_translate_request_joins_keywords() {
        let english = vec!["cat".to_string(), "blue sky".to_string()];
        let request = ModelRequest::translate(&english, "Danish", 300);
        assert!(request.image.is_none());
        assert!(request.prompt.contains("to Danish"));
        assert!(request.prompt.contains("cat, blue sky"));
    }
}
