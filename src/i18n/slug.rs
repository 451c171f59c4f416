//! Multilingual route segments built from dictionary entries.
//!
//! An identifier like `hello` with translations `{en: "hello", de: "hallo",
//! ru: "привет"}` yields one URL-safe alternative per locale. Handlers can
//! match an incoming path segment against the alternatives to learn which
//! locale the visitor used.

use crate::i18n::dictionary::Dictionary;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

static PUNCTUATION_REGEX: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlugError {
    #[error("Slug identifier '{0}' is not allowed to include special characters or uppercase letters")]
    InvalidIdentifier(String),

    #[error("Dictionary is missing translations for identifier '{0}'")]
    UnknownIdentifier(String),
}

/// Remove punctuation and turn inner whitespace into dashes.
///
/// Leading and trailing whitespace is trimmed first. ASCII punctuation and
/// the Unicode general/supplemental punctuation blocks are dropped; letters
/// of any script are kept.
pub fn strip(value: &str) -> String {
    let punctuation = PUNCTUATION_REGEX.get_or_init(|| {
        Regex::new(r##"[\x{2000}-\x{206F}\x{2E00}-\x{2E7F}\\'!"#$%&()*+,\-./:;<=>?@\[\]^_`{|}~]+"##)
            .unwrap()
    });
    let whitespace = WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").unwrap());

    let without_punctuation = punctuation.replace_all(value.trim(), "");
    whitespace.replace_all(&without_punctuation, "-").into_owned()
}

/// The per-locale path alternatives of one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slug {
    identifier: String,
    /// `(locale, segment)` pairs in locale code order
    alternatives: Vec<(String, String)>,
}

impl Slug {
    /// Build the slug of `identifier` from `dictionary`.
    ///
    /// # Errors
    /// * `InvalidIdentifier` if the identifier is not already lowercase and stripped
    /// * `UnknownIdentifier` if the dictionary has no translations for it
    pub fn from_dictionary(dictionary: &Dictionary, identifier: &str) -> Result<Self, SlugError> {
        if identifier.is_empty() || identifier != strip(identifier).to_lowercase() {
            return Err(SlugError::InvalidIdentifier(identifier.to_string()));
        }

        let translations = dictionary
            .entry(identifier)
            .filter(|translations| !translations.is_empty())
            .ok_or_else(|| SlugError::UnknownIdentifier(identifier.to_string()))?;

        let alternatives = translations
            .into_iter()
            .map(|(locale, text)| (locale, strip(&text).to_lowercase()))
            .filter(|(_, segment)| !segment.is_empty())
            .collect();

        Ok(Self {
            identifier: identifier.to_string(),
            alternatives,
        })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn alternatives(&self) -> &[(String, String)] {
        &self.alternatives
    }

    /// Alternatives joined with `|` (e.g. `hallo|hello|привет`).
    pub fn pattern(&self) -> String {
        self.alternatives
            .iter()
            .map(|(_, segment)| segment.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Named route parameter form, e.g. `:i18n_hello(hallo|hello|привет)`.
    pub fn param_pattern(&self) -> String {
        format!(":i18n_{}({})", self.identifier, self.pattern())
    }

    /// The locale whose alternative equals `segment`, compared case-insensitively.
    pub fn locale_of(&self, segment: &str) -> Option<&str> {
        let segment = segment.to_lowercase();
        self.alternatives
            .iter()
            .find(|(_, alternative)| *alternative == segment)
            .map(|(locale, _)| locale.as_str())
    }

    pub fn matches(&self, segment: &str) -> bool {
        self.locale_of(segment).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greeting_dictionary() -> Dictionary {
        let dictionary = Dictionary::new();
        dictionary
            .load_json(r#"{"hello": {"en": "hello", "fr": "bon jour", "de": "Hallo!", "ru": "привет"}}"#)
            .unwrap();
        dictionary
    }

    // ==================== strip Tests ====================

    #[test]
    fn test_strip_removes_punctuation() {
        assert_eq!(strip("  Hello, World!  "), "Hello-World");
    }

    #[test]
    fn test_strip_keeps_non_latin_letters() {
        assert_eq!(strip("Непонятный запрос…"), "Непонятный-запрос");
    }

    #[test]
    fn test_strip_collapses_whitespace() {
        assert_eq!(strip("a \t b\n\nc"), "a-b-c");
    }

    #[test]
    fn test_strip_removes_dashes_and_underscores() {
        assert_eq!(strip("well-known_path"), "wellknownpath");
    }

    // ==================== Slug Tests ====================

    #[test]
    fn test_pattern_joins_alternatives_in_locale_order() {
        let slug = Slug::from_dictionary(&greeting_dictionary(), "hello").unwrap();
        assert_eq!(slug.pattern(), "hallo|hello|bon-jour|привет");
        assert_eq!(slug.param_pattern(), ":i18n_hello(hallo|hello|bon-jour|привет)");
    }

    #[test]
    fn test_locale_of_segment() {
        let slug = Slug::from_dictionary(&greeting_dictionary(), "hello").unwrap();
        assert_eq!(slug.locale_of("HALLO"), Some("de"));
        assert_eq!(slug.locale_of("привет"), Some("ru"));
        assert!(!slug.matches("ciao"));
    }

    #[test]
    fn test_rejects_identifier_with_special_characters() {
        let err = Slug::from_dictionary(&greeting_dictionary(), "Hello!").unwrap_err();
        assert_eq!(err, SlugError::InvalidIdentifier("Hello!".to_string()));
    }

    #[test]
    fn test_rejects_unknown_identifier() {
        let err = Slug::from_dictionary(&greeting_dictionary(), "goodbye").unwrap_err();
        assert_eq!(err, SlugError::UnknownIdentifier("goodbye".to_string()));
    }
}
