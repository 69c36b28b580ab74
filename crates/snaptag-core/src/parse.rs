//! Normalization of raw model text into clean keyword lists.
//!
//! Providers differ only in how the raw text is extracted from the response
//! envelope; the cleaning rules here apply uniformly to English generation
//! and to every translation response.

/// Turn a raw model response into an ordered list of lowercase keywords.
///
/// Rules, in order:
/// - embedded line breaks become the list delimiter (comma)
/// - split on comma
/// - per fragment: delete `-` and bullet characters, trim whitespace,
///   lowercase
/// - drop fragments that are empty after cleaning
///
/// Output order matches first-occurrence order in the raw text. Duplicates
/// are kept; they only collapse at persistence merge time.
pub fn normalize_keywords(raw: &str) -> Vec<String> {
    raw.replace(['\n', '\r'], ",")
        .split(',')
        .map(clean_fragment)
        .filter(|kw| !kw.is_empty())
        .collect()
}

/// Clean a single comma-delimited fragment.
///
/// Hyphens are deleted outright, not replaced with a space: "Sky-blue"
/// becomes "skyblue". Bullet characters from list-formatted model output
/// are stripped the same way.
fn clean_fragment(fragment: &str) -> String {
    fragment
        .chars()
        .filter(|c| !matches!(c, '-' | '*' | '•'))
        .collect::<String>()
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_simple_list() {
        assert_eq!(
            normalize_keywords("cat, dog, sky"),
            vec!["cat", "dog", "sky"]
        );
    }

    #[test]
    fn test_normalize_newlines_and_empties() {
        // Newlines collapse into delimiters, empty fragments are dropped,
        // hyphens are deleted (not replaced with a space)
        assert_eq!(
            normalize_keywords("cat\n, dog,,  Sky-blue "),
            vec!["cat", "dog", "skyblue"]
        );
    }

    #[test]
    fn test_normalize_hyphen_deleted_literally() {
        assert_eq!(normalize_keywords("Sky-blue"), vec!["skyblue"]);
    }

    #[test]
    fn test_normalize_bulleted_output() {
        assert_eq!(
            normalize_keywords("- cat\n- dog\n- blue sky"),
            vec!["cat", "dog", "blue sky"]
        );
    }

    #[test]
    fn test_normalize_lowercases() {
        assert_eq!(
            normalize_keywords("Sunset, BEACH, Ocean Waves"),
            vec!["sunset", "beach", "ocean waves"]
        );
    }

    #[test]
    fn test_normalize_idempotent_on_clean_input() {
        let cleaned = normalize_keywords("cat\n, dog,,  Sky-blue ");
        let rejoined = cleaned.join(",");
        assert_eq!(normalize_keywords(&rejoined), cleaned);
    }

    #[test]
    fn test_normalize_preserves_order_and_duplicates() {
        // Dedup happens at persistence merge time, not here
        assert_eq!(
            normalize_keywords("dog, cat, dog"),
            vec!["dog", "cat", "dog"]
        );
    }

    #[test]
    fn test_normalize_empty_input() {
        assert!(normalize_keywords("").is_empty());
        assert!(normalize_keywords("\n\n, ,").is_empty());
        assert!(normalize_keywords("---").is_empty());
    }

    #[test]
    fn test_normalize_unicode_keywords() {
        assert_eq!(
            normalize_keywords("solnedgang, hav, blå himmel"),
            vec!["solnedgang", "hav", "blå himmel"]
        );
    }
}
