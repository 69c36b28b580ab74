//! Keyword generation: one English describe pass, then per-language
//! translation fan-out.
//!
//! English is the pivot: it is always generated first, even when not
//! requested as an output language, and every translation sources from the
//! English list. The two phases are a hard ordering invariant: no translate
//! call is issued until the describe call has succeeded.
//!
//! `generate` never fails past its boundary. A failed describe call yields
//! empty lists for every requested language; a failed translate call (or an
//! unrecognized language code) empties only that language.

use crate::error::KeywordError;
use crate::language;
use crate::parse::normalize_keywords;
use crate::provider::{ImageInput, ModelRequest, VisionModel};
use crate::types::{GenerationPhase, KeywordSet};
use std::path::Path;
use std::sync::Arc;

/// Result of one generation pass over a single image.
#[derive(Debug)]
pub struct GenerationOutcome {
    /// Keyword lists, keyed exactly by the requested language set
    pub keywords: KeywordSet,
    /// Terminal phase: `Done` or `Failed`
    pub phase: GenerationPhase,
    /// Human-readable messages for every degraded language
    pub failures: Vec<String>,
}

/// Generates per-language keyword lists for images via a vision model.
pub struct KeywordGenerator {
    model: Arc<dyn VisionModel>,
    max_tokens: u32,
}

impl KeywordGenerator {
    pub fn new(model: Box<dyn VisionModel>, max_tokens: u32) -> Self {
        Self {
            model: Arc::from(model),
            max_tokens,
        }
    }

    /// Generate keywords for one image in the requested languages.
    ///
    /// The returned mapping is keyed exactly by `languages`; failures are
    /// converted into empty lists and reported in
    /// [`GenerationOutcome::failures`], never raised.
    pub async fn generate(&self, image_path: &Path, languages: &[String]) -> GenerationOutcome {
        let mut keywords = KeywordSet::for_languages(languages);
        let mut failures = Vec::new();
        tracing::trace!(phase = ?GenerationPhase::Pending, image = %image_path.display());

        let english = match self.fetch_english(image_path).await {
            Ok(list) => list,
            Err(e) => {
                let message = format!("describe failed for {}: {e}", image_path.display());
                tracing::warn!("{message}");
                failures.push(message);
                return GenerationOutcome {
                    keywords,
                    phase: GenerationPhase::Failed,
                    failures,
                };
            }
        };
        tracing::debug!(
            phase = ?GenerationPhase::EnglishFetched,
            "English keywords for {}: {}",
            image_path.display(),
            english.join(", ")
        );

        // The pivot list is only part of the output when explicitly requested
        if languages.iter().any(|l| l == language::PIVOT) {
            keywords.insert(language::PIVOT, english.clone());
        }

        tracing::trace!(phase = ?GenerationPhase::Translating, image = %image_path.display());
        for lang in languages.iter().filter(|l| *l != language::PIVOT) {
            let Some(name) = language::display_name(lang) else {
                let message = format!("unsupported language code '{lang}'");
                tracing::warn!("{message}");
                failures.push(message);
                continue;
            };

            match self.translate(&english, name).await {
                Ok(list) => keywords.insert(lang.clone(), list),
                Err(e) => {
                    let message = format!("translate to '{lang}' failed: {e}");
                    tracing::warn!("{message}");
                    failures.push(message);
                }
            }
        }

        GenerationOutcome {
            keywords,
            phase: GenerationPhase::Done,
            failures,
        }
    }

    /// Read the image and fetch the English pivot keywords.
    ///
    /// An empty normalized list is treated as a failure: with nothing to
    /// translate from, every downstream language would be empty anyway.
    async fn fetch_english(&self, image_path: &Path) -> Result<Vec<String>, KeywordError> {
        let bytes = tokio::fs::read(image_path)
            .await
            .map_err(|e| KeywordError::Read {
                path: image_path.to_path_buf(),
                message: e.to_string(),
            })?;

        let format = image_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        let image = ImageInput::from_bytes(&bytes, &format);

        let request = ModelRequest::describe(image, self.max_tokens);
        let response = self.model.complete(&request).await?;
        let english = normalize_keywords(&response.text);

        if english.is_empty() {
            return Err(KeywordError::Model {
                message: "describe call returned no usable keywords".to_string(),
                status_code: None,
            });
        }

        Ok(english)
    }

    async fn translate(
        &self,
        english: &[String],
        language_name: &str,
    ) -> Result<Vec<String>, KeywordError> {
        let request = ModelRequest::translate(english, language_name, self.max_tokens);
        let response = self.model.complete(&request).await?;
        Ok(normalize_keywords(&response.text))
    }
}
