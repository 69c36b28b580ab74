//! snaptag-core - Batch keyword generation for images via vision LLMs.
//!
//! Given an image and a set of target languages, snaptag asks a
//! vision-capable model for English keywords, translates them into each
//! remaining requested language, and persists the per-language lists as
//! JSON records. Keywords can optionally be embedded into the image's own
//! metadata (JPEG comment segment, PNG text chunk).
//!
//! # Architecture
//!
//! ```text
//! Image → Describe (English pivot) → Translate per language → KeywordSet
//!       → persist (one JSON file per language)
//!       → embed (optional, in-image metadata)
//! ```
//!
//! Providers (local generate server, OpenAI-compatible local server,
//! OpenAI and Google cloud) are resolved from the model identifier by
//! prefix rules; they differ only in wire format, never in how responses
//! are normalized.
//!
//! # Usage
//!
//! ```rust,ignore
//! use snaptag_core::{provider, Config, KeywordGenerator, KeywordStore};
//!
//! #[tokio::main]
//! async fn main() -> snaptag_core::Result<()> {
//!     let config = Config::load()?;
//!     let provider_cfg = provider::resolve("llava", &config.llm);
//!     let model = provider::create_model(&provider_cfg, None)?;
//!     let generator = KeywordGenerator::new(model, config.llm.max_tokens);
//!
//!     let langs = vec!["en".to_string(), "dk".to_string()];
//!     let outcome = generator.generate("./photo.jpg".as_ref(), &langs).await;
//!
//!     let store = KeywordStore::new("./keywords")?;
//!     store.save("./photo.jpg".as_ref(), &outcome.keywords, false);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod batch;
pub mod config;
pub mod discovery;
pub mod embed;
pub mod error;
pub mod generator;
pub mod language;
pub mod parse;
pub mod persist;
pub mod provider;
pub mod types;

// Re-exports for convenient access
pub use batch::{BatchOptions, BatchRunner, ImageReport};
pub use config::Config;
pub use discovery::FileDiscovery;
pub use embed::embed_keywords;
pub use error::{ConfigError, KeywordError, KeywordResult, Result, SnaptagError};
pub use generator::{GenerationOutcome, KeywordGenerator};
pub use persist::{KeywordStore, SaveOutcome};
pub use types::{GenerationPhase, KeywordRecord, KeywordSet};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
