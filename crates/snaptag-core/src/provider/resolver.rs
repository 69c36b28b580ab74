//! Provider resolution from model identifier strings.
//!
//! A model identifier like `llava`, `lmstudio:qwen2-vl`, `gpt-4o` or
//! `gemini-1.5-pro` deterministically selects one provider and the wire
//! format it expects. Resolution is a pure function of the identifier and
//! config; no network call happens here.

use crate::config::LlmConfig;
use serde::{Deserialize, Serialize};

/// The closed set of supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// Local inference server speaking the generate API (default)
    LocalGenerate,
    /// OpenAI-compatible local server (lmstudio: prefix)
    LocalChat,
    /// OpenAI cloud API
    CloudOpenAi,
    /// Google AI cloud API (OpenAI-compatible surface)
    CloudGoogle,
}

impl ProviderKind {
    /// Name of the API-token slot this provider reads from config, if any.
    pub fn token_name(&self) -> Option<&'static str> {
        match self {
            Self::LocalGenerate | Self::LocalChat => None,
            Self::CloudOpenAi => Some("openai"),
            Self::CloudGoogle => Some("google"),
        }
    }
}

/// Resolved provider settings, immutable for the lifetime of a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    /// Full request URL for this provider
    pub endpoint: String,
    /// Model name as sent on the wire (prefixes stripped)
    pub model: String,
    /// Whether a bearer token must accompany requests
    pub requires_auth: bool,
}

/// Map a model identifier to a provider by prefix rules.
///
/// Precedence: explicit `lmstudio:` prefix, then the `gpt-4` cloud prefix,
/// then the `gemini` cloud prefix, then the local generate server. An
/// unrecognized identifier falls back to the default provider rather than
/// erroring: a permissive default, not a validation gate.
pub fn resolve(model_id: &str, llm: &LlmConfig) -> ProviderConfig {
    if let Some(stripped) = model_id.strip_prefix("lmstudio:") {
        ProviderConfig {
            kind: ProviderKind::LocalChat,
            endpoint: llm.chat_endpoint.clone(),
            model: stripped.to_string(),
            requires_auth: false,
        }
    } else if model_id.starts_with("gpt-4") {
        ProviderConfig {
            kind: ProviderKind::CloudOpenAi,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: model_id.to_string(),
            requires_auth: true,
        }
    } else if model_id.starts_with("gemini") {
        ProviderConfig {
            kind: ProviderKind::CloudGoogle,
            endpoint: "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions"
                .to_string(),
            model: model_id.to_string(),
            requires_auth: true,
        }
    } else {
        ProviderConfig {
            kind: ProviderKind::LocalGenerate,
            endpoint: format!("{}/api/generate", llm.local_endpoint.trim_end_matches('/')),
            model: model_id.to_string(),
            requires_auth: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm() -> LlmConfig {
        LlmConfig::default()
    }

    #[test]
    fn test_resolve_default_local() {
        let cfg = resolve("llava", &llm());
        assert_eq!(cfg.kind, ProviderKind::LocalGenerate);
        assert_eq!(cfg.endpoint, "http://localhost:11434/api/generate");
        assert_eq!(cfg.model, "llava");
        assert!(!cfg.requires_auth);
    }

    #[test]
    fn test_resolve_lmstudio_strips_prefix() {
        let cfg = resolve("lmstudio:qwen2-vl-7b", &llm());
        assert_eq!(cfg.kind, ProviderKind::LocalChat);
        assert_eq!(cfg.model, "qwen2-vl-7b");
        assert_eq!(cfg.endpoint, "http://localhost:1234/v1/chat/completions");
        assert!(!cfg.requires_auth);
    }

    #[test]
    fn test_resolve_openai() {
        let cfg = resolve("gpt-4o-mini", &llm());
        assert_eq!(cfg.kind, ProviderKind::CloudOpenAi);
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert!(cfg.requires_auth);
        assert!(cfg.endpoint.starts_with("https://api.openai.com"));
    }

    #[test]
    fn test_resolve_google() {
        let cfg = resolve("gemini-1.5-pro", &llm());
        assert_eq!(cfg.kind, ProviderKind::CloudGoogle);
        assert!(cfg.requires_auth);
        assert!(cfg.endpoint.contains("generativelanguage.googleapis.com"));
    }

    #[test]
    fn test_resolve_unknown_falls_back_to_local() {
        // Permissive default, not a validation gate
        let cfg = resolve("some-future-model", &llm());
        assert_eq!(cfg.kind, ProviderKind::LocalGenerate);
        assert_eq!(cfg.model, "some-future-model");
    }

    #[test]
    fn test_resolve_lmstudio_wins_over_cloud_prefixes() {
        // The explicit prefix takes precedence even if the remainder looks
        // like a cloud model name
        let cfg = resolve("lmstudio:gpt-4-vision", &llm());
        assert_eq!(cfg.kind, ProviderKind::LocalChat);
        assert_eq!(cfg.model, "gpt-4-vision");
    }

    #[test]
    fn test_token_names() {
        assert_eq!(ProviderKind::LocalGenerate.token_name(), None);
        assert_eq!(ProviderKind::LocalChat.token_name(), None);
        assert_eq!(ProviderKind::CloudOpenAi.token_name(), Some("openai"));
        assert_eq!(ProviderKind::CloudGoogle.token_name(), Some("google"));
    }
}
