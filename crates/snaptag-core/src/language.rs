//! Supported output languages.
//!
//! A fixed registry mapping language codes to the display names used in
//! translation prompts. English is the pivot language: keywords are always
//! generated in English first, and every other language is translated from
//! that English list, never from another translation.

/// The pivot language code. Always generated first, even when not requested.
pub const PIVOT: &str = "en";

/// Registry of supported languages as `(code, display name)` pairs.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] =
    &[("en", "English"), ("dk", "Danish"), ("vi", "Vietnamese")];

/// Look up the display name for a language code.
///
/// Returns `None` for unrecognized codes; the generator turns that into an
/// empty keyword list for the language rather than failing the whole image.
pub fn display_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Check whether a language code is in the registry.
pub fn is_supported(code: &str) -> bool {
    display_name(code).is_some()
}
