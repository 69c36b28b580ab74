//! Core data types shared across the keywording pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-image, per-language keyword lists produced by one generation pass.
///
/// The key set is always exactly the requested language set: languages whose
/// generation or translation failed are present with an empty list. Within a
/// list, order is model output order and duplicates are preserved; dedup only
/// happens when the store merges in append mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSet {
    languages: BTreeMap<String, Vec<String>>,
}

impl KeywordSet {
    /// Create a set with an empty keyword list for each requested language.
    pub fn for_languages<S: AsRef<str>>(codes: &[S]) -> Self {
        let languages = codes
            .iter()
            .map(|c| (c.as_ref().to_string(), Vec::new()))
            .collect();
        Self { languages }
    }

    /// Replace the keyword list for a language.
    pub fn insert(&mut self, code: impl Into<String>, keywords: Vec<String>) {
        self.languages.insert(code.into(), keywords);
    }

    /// Keywords for one language, if that language is present.
    pub fn get(&self, code: &str) -> Option<&Vec<String>> {
        self.languages.get(code)
    }

    /// Iterate over `(language code, keywords)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.languages.iter()
    }

    /// The language codes present in this set.
    pub fn codes(&self) -> Vec<&str> {
        self.languages.keys().map(String::as_str).collect()
    }

    /// Number of languages in the set.
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Whether the set contains no languages at all.
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

/// The phases a single image moves through during generation.
///
/// Translation consumes the English describe output, so the ordering here is
/// a hard invariant: no translate call is issued before `EnglishFetched`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationPhase {
    /// No model call issued yet
    Pending,
    /// English pivot keywords parsed successfully
    EnglishFetched,
    /// Translate calls in flight
    Translating,
    /// All requested languages attempted
    Done,
    /// The describe call failed; every language is empty
    Failed,
}

/// One persisted keyword file: a single `(image, language)` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRecord {
    /// Source image path as given to the generator
    pub image: String,
    /// Language code
    pub language: String,
    /// Deduplicated in append mode; otherwise model output order
    pub keywords: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_languages_all_empty() {
        let set = KeywordSet::for_languages(&["en", "dk"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("en"), Some(&vec![]));
        assert_eq!(set.get("dk"), Some(&vec![]));
        assert_eq!(set.get("vi"), None);
    }

    #[test]
    fn test_insert_replaces() {
        let mut set = KeywordSet::for_languages(&["en"]);
        set.insert("en", vec!["cat".to_string(), "dog".to_string()]);
        assert_eq!(set.get("en").unwrap().len(), 2);
    }

    #[test]
    fn test_record_json_shape() {
        let record = KeywordRecord {
            image: "photo.jpg".to_string(),
            language: "en".to_string(),
            keywords: vec!["cat".to_string()],
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["image"], "photo.jpg");
        assert_eq!(json["language"], "en");
        assert_eq!(json["keywords"][0], "cat");
    }
}
