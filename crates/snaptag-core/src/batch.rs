//! Concurrent batch processing of images.
//!
//! The runner takes discovered image paths and processes them in parallel
//! with bounded concurrency (semaphore): generate keywords, persist them,
//! optionally embed them. Results are delivered through a callback as they
//! complete so the CLI can stream progress in real time.
//!
//! Concurrency is bounded across images only; inside one image the
//! describe call strictly precedes the translate calls.

use crate::embed;
use crate::generator::KeywordGenerator;
use crate::persist::KeywordStore;
use crate::types::{GenerationPhase, KeywordSet};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Configuration for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Maximum images processed concurrently
    pub parallel: usize,
    /// Requested output languages
    pub languages: Vec<String>,
    /// Union new keywords into existing files instead of replacing them
    pub append: bool,
    /// When set, embed these languages into each image after persisting
    pub embed_languages: Option<Vec<String>>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: 2,
            languages: vec!["en".to_string()],
            append: false,
            embed_languages: None,
        }
    }
}

/// Per-image result streamed back to the caller.
#[derive(Debug)]
pub struct ImageReport {
    pub path: PathBuf,
    /// Terminal generation phase (`Done` or `Failed`)
    pub phase: GenerationPhase,
    /// The generated keywords, keyed by the requested languages
    pub keywords: KeywordSet,
    /// Keyword files written for this image
    pub files_written: usize,
    /// Embed result; `None` when embedding was not requested
    pub embedded: Option<bool>,
    /// Human-readable messages for everything that degraded
    pub errors: Vec<String>,
}

impl ImageReport {
    /// An image counts as succeeded when generation completed and nothing
    /// downstream degraded.
    pub fn is_success(&self) -> bool {
        self.phase == GenerationPhase::Done
            && self.errors.is_empty()
            && self.embedded.unwrap_or(true)
    }
}

/// Concurrent batch runner over the generate → persist → embed pipeline.
pub struct BatchRunner {
    generator: Arc<KeywordGenerator>,
    store: Arc<KeywordStore>,
    options: BatchOptions,
}

impl BatchRunner {
    pub fn new(generator: KeywordGenerator, store: KeywordStore, options: BatchOptions) -> Self {
        Self {
            generator: Arc::new(generator),
            store: Arc::new(store),
            options,
        }
    }

    /// Process a batch of images.
    ///
    /// Spawns one tokio task per image, bounded by a semaphore. Calls
    /// `on_result` for each completed image so the caller can stream
    /// progress. Returns `(succeeded, failed)` counts.
    pub async fn run<F>(&self, images: &[PathBuf], on_result: F) -> (usize, usize)
    where
        F: Fn(ImageReport) + Send + Sync + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.options.parallel.max(1)));
        let on_result = Arc::new(on_result);
        let mut handles = Vec::with_capacity(images.len());

        for image in images {
            let permit = semaphore.clone().acquire_owned().await;
            if permit.is_err() {
                tracing::warn!("Batch semaphore closed unexpectedly, stopping");
                break;
            }
            let permit = permit.unwrap();

            let generator = self.generator.clone();
            let store = self.store.clone();
            let options = self.options.clone();
            let on_result = on_result.clone();
            let image = image.clone();

            let handle = tokio::spawn(async move {
                let report = process_single(&generator, &store, &image, &options).await;
                let success = report.is_success();
                drop(permit); // Release concurrency permit before callback
                on_result(report);
                success
            });

            handles.push(handle);
        }

        let mut succeeded = 0usize;
        let mut failed = 0usize;

        for handle in handles {
            match handle.await {
                Ok(true) => succeeded += 1,
                Ok(false) => failed += 1,
                Err(e) => {
                    tracing::error!("Batch task panicked: {e}");
                    failed += 1;
                }
            }
        }

        (succeeded, failed)
    }
}

/// Run one image through generate → persist → optional embed.
async fn process_single(
    generator: &KeywordGenerator,
    store: &KeywordStore,
    image: &PathBuf,
    options: &BatchOptions,
) -> ImageReport {
    let outcome = generator.generate(image, &options.languages).await;
    let mut errors = outcome.failures;

    let save = store.save(image, &outcome.keywords, options.append);
    for (lang, message) in &save.failed {
        errors.push(format!("save '{lang}' failed: {message}"));
    }

    let embedded = match &options.embed_languages {
        Some(selected) if outcome.phase == GenerationPhase::Done => {
            Some(embed::embed_keywords(image, &outcome.keywords, selected))
        }
        Some(_) => None, // Nothing worth embedding after a failed describe
        None => None,
    };

    ImageReport {
        path: image.clone(),
        phase: outcome.phase,
        keywords: outcome.keywords,
        files_written: save.written.len(),
        embedded,
        errors,
    }
}
