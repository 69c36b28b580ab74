//! Persistence of per-language keyword files.
//!
//! One JSON file per `(image, language)` pair, named
//! `<image-stem>_keywords_<lang>.json`. In append mode the new keywords are
//! unioned into the existing file as a set; otherwise the file is replaced.
//! Writes go through a temp file and rename so a crash never leaves a
//! truncated record behind.

use crate::error::KeywordError;
use crate::types::{KeywordRecord, KeywordSet};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Outcome of one save call: which language files were written and which
/// failed. A failure writing one language's file never stops the others.
#[derive(Debug, Default)]
pub struct SaveOutcome {
    /// Paths written successfully
    pub written: Vec<PathBuf>,
    /// `(language, message)` per failed write
    pub failed: Vec<(String, String)>,
}

impl SaveOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes keyword records into an output directory.
///
/// Concurrent saves for different images never collide (filenames derive
/// from distinct image stems), but append-mode saves to the same target
/// file are serialized through a per-file lock so the read-merge-write
/// sequence cannot lose updates.
pub struct KeywordStore {
    output_dir: PathBuf,
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl KeywordStore {
    /// Create a store rooted at `output_dir`, creating the directory if needed.
    pub fn new(output_dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self {
            output_dir,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Persist every language in the set, one file per language.
    pub fn save(&self, image_path: &Path, keywords: &KeywordSet, append: bool) -> SaveOutcome {
        let mut outcome = SaveOutcome::default();

        for (lang, list) in keywords.iter() {
            let target = self.file_path(image_path, lang);
            match self.save_language(image_path, lang, list, &target, append) {
                Ok(()) => outcome.written.push(target),
                Err(e) => {
                    tracing::warn!("Failed to write {}: {e}", target.display());
                    outcome.failed.push((lang.clone(), e.to_string()));
                }
            }
        }

        outcome
    }

    /// Deterministic output path for an `(image, language)` pair.
    pub fn file_path(&self, image_path: &Path, lang: &str) -> PathBuf {
        let stem = image_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        self.output_dir.join(format!("{stem}_keywords_{lang}.json"))
    }

    fn save_language(
        &self,
        image_path: &Path,
        lang: &str,
        keywords: &[String],
        target: &Path,
        append: bool,
    ) -> Result<(), KeywordError> {
        let lock = self.lock_for(target);
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let merged = if append && target.exists() {
            let prior = read_prior_keywords(target);
            // Set union: duplicates collapse, ordering is not preserved
            let set: BTreeSet<String> = prior.into_iter().chain(keywords.iter().cloned()).collect();
            set.into_iter().collect()
        } else {
            keywords.to_vec()
        };

        let record = KeywordRecord {
            image: image_path.display().to_string(),
            language: lang.to_string(),
            keywords: merged,
        };

        write_atomic(target, &record).map_err(|e| KeywordError::Persist {
            path: target.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn lock_for(&self, target: &Path) -> Arc<Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks
            .entry(target.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Load the keyword list from an existing record.
///
/// A corrupt or unreadable file is treated as empty prior state rather than
/// aborting the save.
fn read_prior_keywords(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<KeywordRecord>(&content) {
            Ok(record) => record.keywords,
            Err(e) => {
                tracing::warn!("Corrupt keyword file {}, starting fresh: {e}", path.display());
                Vec::new()
            }
        },
        Err(e) => {
            tracing::warn!("Unreadable keyword file {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// Whole-file overwrite via temp file + rename.
fn write_atomic(target: &Path, record: &KeywordRecord) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    let tmp = target.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, target)
}
