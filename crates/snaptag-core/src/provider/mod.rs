//! Provider resolution and wire clients for vision model backends.

pub mod chat;
pub mod model;
pub mod ollama;
pub mod resolver;

pub use model::{ImageInput, ModelRequest, ModelResponse, VisionModel};
pub use resolver::{resolve, ProviderConfig, ProviderKind};

use crate::error::KeywordError;

/// Build the wire client for a resolved provider.
///
/// `api_token` is only consulted for providers that require auth; creating
/// an authenticated client without a token is an error, surfaced here
/// rather than on the first request.
pub fn create_model(
    config: &ProviderConfig,
    api_token: Option<&str>,
) -> Result<Box<dyn VisionModel>, KeywordError> {
    match config.kind {
        ProviderKind::LocalGenerate => Ok(Box::new(ollama::GenerateClient::new(
            &config.endpoint,
            &config.model,
        ))),
        ProviderKind::LocalChat => Ok(Box::new(chat::ChatClient::local(
            &config.endpoint,
            &config.model,
        ))),
        ProviderKind::CloudOpenAi | ProviderKind::CloudGoogle => {
            let token = api_token.ok_or_else(|| KeywordError::Model {
                message: format!(
                    "API token not set for provider {:?}. Configure it or set the \
                     matching environment variable.",
                    config.kind
                ),
                status_code: None,
            })?;
            Ok(Box::new(chat::ChatClient::cloud(
                &config.endpoint,
                &config.model,
                token,
            )))
        }
    }
}
