//! Persisting CLI-provided settings back into the config file.
//!
//! Keys passed via `--openai-key` / `--google-key` and the model from the
//! current run are written into the TOML config so subsequent runs pick
//! them up. `toml_edit` keeps any comments and formatting the user added
//! by hand.

use anyhow::{Context, Result};
use std::path::Path;

/// Write an API key into the `[llm]` section of the config file.
///
/// `provider` is the token slot name ("openai" or "google"), matching
/// `ProviderKind::token_name`.
pub fn save_api_key(config_path: &Path, provider: &str, key: &str) -> Result<()> {
    let field = match provider {
        "openai" => "openai_api_key",
        "google" => "google_api_key",
        other => anyhow::bail!("unknown provider '{other}'"),
    };
    save_llm_value(config_path, field, key)
}

/// Remember the model used for this run as the default for the next one.
pub fn save_last_model(config_path: &Path, model: &str) -> Result<()> {
    save_llm_value(config_path, "last_model", model)
}

fn save_llm_value(config_path: &Path, field: &str, value: &str) -> Result<()> {
    // Read existing config or start with empty content
    let content = if config_path.exists() {
        std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config at {}", config_path.display()))?
    } else {
        String::new()
    };

    let mut doc: toml_edit::DocumentMut = content.parse().unwrap_or_default();

    // Ensure the llm table exists
    if doc.get("llm").is_none() {
        doc["llm"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["llm"][field] = toml_edit::value(value);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    std::fs::write(config_path, doc.to_string())
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_key_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        save_api_key(&path, "openai", "sk-test").unwrap();

        let config = snaptag_core::Config::load_from(&path).unwrap();
        assert_eq!(config.llm.openai_api_key, "sk-test");
    }

    #[test]
    fn test_save_preserves_comments_and_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "# my config\n[llm]\nlast_model = \"llava\" # keep me\n",
        )
        .unwrap();

        save_api_key(&path, "google", "g-key").unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("# my config"));
        assert!(written.contains("# keep me"));
        assert!(written.contains("g-key"));

        let config = snaptag_core::Config::load_from(&path).unwrap();
        assert_eq!(config.llm.last_model, "llava");
        assert_eq!(config.llm.google_api_key, "g-key");
    }

    #[test]
    fn test_save_last_model_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        save_last_model(&path, "llava").unwrap();
        save_last_model(&path, "gpt-4o").unwrap();

        let config = snaptag_core::Config::load_from(&path).unwrap();
        assert_eq!(config.llm.last_model, "gpt-4o");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(save_api_key(&path, "anthropic", "key").is_err());
    }
}
