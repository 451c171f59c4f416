//! Dictionary store: translation entries keyed by identifier and locale.
//!
//! A `Dictionary` is an explicit object rather than process-wide state, so
//! each renderer (and each test) can own an isolated instance. It is shared
//! behind an `Arc` and synchronized internally: the duplicate check and the
//! insert of `add` run under one write lock, so two concurrent registrations
//! of the same pair leave exactly one winner.

use crate::error::{DictionaryError, DuplicateTranslationError};
use crate::i18n::patch::patch;
use crate::i18n::strings::{
    BuiltinEntry, MISSING_LOCALE, MISSING_TRANSLATION, RESERVED_ENTRIES, RESPONSE_ENTRIES,
};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::path::Path;
use tracing::debug;

/// Translations of one identifier, keyed by locale code.
pub type Translations = BTreeMap<String, String>;

/// Dictionary input format: identifier -> locale -> text.
pub type Entries = BTreeMap<String, Translations>;

/// Fallback used if the reserved `missing_locale` text were ever empty.
const MISSING_LOCALE_FALLBACK: &str = "Missing translation for locale '$1'";

#[derive(Debug)]
pub struct Dictionary {
    entries: RwLock<HashMap<String, Translations>>,
}

impl Dictionary {
    /// Create a dictionary holding the reserved entries and the default
    /// response title/message.
    pub fn new() -> Self {
        let dictionary = Self::reserved_only();
        dictionary.insert_builtin(RESPONSE_ENTRIES);
        dictionary
    }

    /// Create a dictionary holding only `missing_translation` and
    /// `missing_locale`.
    pub fn reserved_only() -> Self {
        let dictionary = Self {
            entries: RwLock::new(HashMap::new()),
        };
        dictionary.insert_builtin(RESERVED_ENTRIES);
        dictionary
    }

    fn insert_builtin(&self, builtin: &[BuiltinEntry]) {
        let mut entries = self.entries.write();
        for (identifier, texts) in builtin {
            let bucket = entries.entry(identifier.to_string()).or_default();
            for (locale, text) in texts.iter() {
                bucket
                    .entry(locale.to_string())
                    .or_insert_with(|| text.to_string());
            }
        }
    }

    /// Check if the dictionary holds a non-empty translation for
    /// `identifier` in `locale`.
    pub fn has(&self, locale: &str, identifier: &str) -> bool {
        Self::has_in(&self.entries.read(), locale, identifier)
    }

    fn has_in(entries: &HashMap<String, Translations>, locale: &str, identifier: &str) -> bool {
        entries
            .get(identifier)
            .and_then(|translations| translations.get(locale))
            .is_some_and(|text| !text.is_empty())
    }

    /// Register a translation.
    ///
    /// # Errors
    /// `DuplicateTranslationError` if `has(locale, identifier)` is already
    /// true. Existing translations are never overwritten.
    pub fn add(
        &self,
        locale: &str,
        identifier: &str,
        text: impl Into<String>,
    ) -> Result<(), DuplicateTranslationError> {
        let mut entries = self.entries.write();
        if Self::has_in(&entries, locale, identifier) {
            return Err(DuplicateTranslationError {
                identifier: identifier.to_string(),
                locale: locale.to_string(),
            });
        }
        entries
            .entry(identifier.to_string())
            .or_default()
            .insert(locale.to_string(), text.into());
        Ok(())
    }

    /// Register many translations at once.
    ///
    /// Either every pair is inserted or, if any pair already exists, none is.
    pub fn extend(&self, batch: Entries) -> Result<(), DuplicateTranslationError> {
        let mut entries = self.entries.write();
        for (identifier, translations) in &batch {
            for locale in translations.keys() {
                if Self::has_in(&entries, locale, identifier) {
                    return Err(DuplicateTranslationError {
                        identifier: identifier.clone(),
                        locale: locale.clone(),
                    });
                }
            }
        }
        for (identifier, translations) in batch {
            entries.entry(identifier).or_default().extend(translations);
        }
        Ok(())
    }

    /// Register many translations, skipping pairs that already exist.
    ///
    /// Meant for feature modules that declare their own default strings and
    /// may be loaded more than once.
    ///
    /// # Returns
    /// The number of skipped pairs.
    pub fn extend_tolerant(&self, batch: Entries) -> usize {
        let mut entries = self.entries.write();
        let mut skipped = 0;
        for (identifier, translations) in batch {
            for (locale, text) in translations {
                if Self::has_in(&entries, &locale, &identifier) {
                    debug!(
                        "Skipping already registered translation '{}' ({})",
                        identifier, locale
                    );
                    skipped += 1;
                    continue;
                }
                entries
                    .entry(identifier.clone())
                    .or_default()
                    .insert(locale, text);
            }
        }
        skipped
    }

    /// Parse a JSON dictionary (identifier -> locale -> text) and `extend`.
    pub fn load_json(&self, json: &str) -> Result<(), DictionaryError> {
        let batch: Entries = serde_json::from_str(json)?;
        self.extend(batch)?;
        Ok(())
    }

    /// Read a JSON dictionary file and `extend`.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(), DictionaryError> {
        let json = std::fs::read_to_string(path)?;
        self.load_json(&json)
    }

    /// Translate `identifier` into `locale`, substituting `$n` placeholders.
    ///
    /// Unknown identifiers resolve to the `missing_translation` entry. A
    /// locale the resolved entry lacks resolves to the English
    /// `missing_locale` text, patched with the requested locale code.
    pub fn translate(&self, locale: &str, identifier: &str, substitutions: &[&dyn Display]) -> String {
        let entries = self.entries.read();

        let text = entries
            .get(identifier)
            .or_else(|| entries.get(MISSING_TRANSLATION))
            .and_then(|translations| translations.get(locale))
            .cloned()
            .unwrap_or_else(|| {
                let fallback = entries
                    .get(MISSING_LOCALE)
                    .and_then(|translations| translations.get("en"))
                    .filter(|text| !text.is_empty())
                    .map(String::as_str)
                    .unwrap_or(MISSING_LOCALE_FALLBACK);
                patch(fallback, &[&locale])
            });

        patch(&text, substitutions)
    }

    /// All identifiers, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> = self.entries.read().keys().cloned().collect();
        identifiers.sort();
        identifiers
    }

    /// A copy of the translations stored for `identifier`.
    pub fn entry(&self, identifier: &str) -> Option<Translations> {
        self.entries.read().get(identifier).cloned()
    }

    /// Locales that carry a non-empty translation for `identifier`.
    pub fn locales(&self, identifier: &str) -> Vec<String> {
        self.entries
            .read()
            .get(identifier)
            .map(|translations| {
                translations
                    .iter()
                    .filter(|(_, text)| !text.is_empty())
                    .map(|(locale, _)| locale.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A copy of every entry.
    pub fn snapshot(&self) -> Entries {
        self.entries
            .read()
            .iter()
            .map(|(identifier, translations)| (identifier.clone(), translations.clone()))
            .collect()
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::strings::{DEFAULT_RESPONSE_MESSAGE, DEFAULT_RESPONSE_TITLE};
    use proptest::prelude::*;
    use std::sync::Arc;

    fn entries(json: &str) -> Entries {
        serde_json::from_str(json).expect("valid test entries")
    }

    // ==================== has / add Tests ====================

    #[test]
    fn test_reserved_entries_always_present() {
        let dictionary = Dictionary::reserved_only();
        assert!(dictionary.has("en", MISSING_TRANSLATION));
        assert!(dictionary.has("en", MISSING_LOCALE));
        assert!(!dictionary.has("en", DEFAULT_RESPONSE_TITLE));
    }

    #[test]
    fn test_new_includes_response_defaults() {
        let dictionary = Dictionary::new();
        for locale in ["en", "de", "ru"] {
            assert!(dictionary.has(locale, DEFAULT_RESPONSE_TITLE));
            assert!(dictionary.has(locale, DEFAULT_RESPONSE_MESSAGE));
        }
    }

    #[test]
    fn test_add_then_has() {
        let dictionary = Dictionary::new();
        assert!(!dictionary.has("de", "hello"));
        dictionary.add("de", "hello", "hallo").expect("first add");
        assert!(dictionary.has("de", "hello"));
        assert!(!dictionary.has("en", "hello"));
    }

    #[test]
    fn test_add_duplicate_fails_without_overwrite() {
        let dictionary = Dictionary::new();
        dictionary.add("en", "hello", "hello").unwrap();

        let err = dictionary.add("en", "hello", "hi").unwrap_err();
        assert_eq!(err.identifier, "hello");
        assert_eq!(err.locale, "en");
        assert_eq!(dictionary.translate("en", "hello", &[]), "hello");
    }

    #[test]
    fn test_has_ignores_empty_text() {
        let dictionary = Dictionary::new();
        dictionary.add("en", "blank", "").unwrap();
        assert!(!dictionary.has("en", "blank"));
        // An empty text does not block a real registration.
        dictionary.add("en", "blank", "filled").unwrap();
        assert!(dictionary.has("en", "blank"));
    }

    #[test]
    fn test_concurrent_adds_have_single_winner() {
        let dictionary = Arc::new(Dictionary::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let dictionary = Arc::clone(&dictionary);
                std::thread::spawn(move || dictionary.add("en", "race", format!("winner {}", i)).is_ok())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }

    // ==================== extend Tests ====================

    #[test]
    fn test_extend_is_atomic() {
        let dictionary = Dictionary::new();
        dictionary.add("de", "bye", "tschüss").unwrap();

        let result = dictionary.extend(entries(
            r#"{"welcome": {"en": "welcome"}, "bye": {"en": "bye", "de": "ciao"}}"#,
        ));

        assert!(result.is_err());
        assert!(!dictionary.has("en", "welcome"));
        assert!(!dictionary.has("en", "bye"));
        assert_eq!(dictionary.translate("de", "bye", &[]), "tschüss");
    }

    #[test]
    fn test_extend_tolerant_skips_existing() {
        let dictionary = Dictionary::new();
        let skipped = dictionary.extend_tolerant(entries(
            r#"{"Request Not Matching (Default Title)": {"en": "Other", "fr": "Requête invalide"}}"#,
        ));

        assert_eq!(skipped, 1);
        assert_eq!(dictionary.translate("en", DEFAULT_RESPONSE_TITLE, &[]), "Invalid request");
        assert_eq!(dictionary.translate("fr", DEFAULT_RESPONSE_TITLE, &[]), "Requête invalide");
    }

    #[test]
    fn test_load_json_rejects_malformed_input() {
        let dictionary = Dictionary::new();
        let err = dictionary.load_json(r#"{"hello": "not a map"}"#).unwrap_err();
        assert!(matches!(err, DictionaryError::Json(_)));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary.json");
        std::fs::write(&path, r#"{"hello": {"en": "Hello $1", "de": "Hallo $1"}}"#).unwrap();

        let dictionary = Dictionary::new();
        dictionary.load_file(&path).unwrap();
        assert_eq!(dictionary.translate("de", "hello", &[&"Welt"]), "Hallo Welt");
    }

    #[test]
    fn test_load_file_missing() {
        let dictionary = Dictionary::new();
        let err = dictionary.load_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, DictionaryError::Io(_)));
    }

    // ==================== translate Tests ====================

    #[test]
    fn test_translate_unknown_identifier_uses_missing_translation() {
        let dictionary = Dictionary::new();
        for locale in ["en", "de", "ru", "xx"] {
            assert_eq!(
                dictionary.translate(locale, "no such identifier", &[]),
                dictionary.translate(locale, MISSING_TRANSLATION, &[])
            );
        }
    }

    #[test]
    fn test_translate_unknown_locale_reports_locale() {
        let dictionary = Dictionary::new();
        assert_eq!(
            dictionary.translate("xx", DEFAULT_RESPONSE_TITLE, &[]),
            "Missing translation for locale 'xx'"
        );
    }

    #[test]
    fn test_translate_applies_substitutions() {
        let dictionary = Dictionary::new();
        dictionary.add("en", "greeting", "Hello $1, you are $2").unwrap();
        assert_eq!(
            dictionary.translate("en", "greeting", &[&"Ada", &36]),
            "Hello Ada, you are 36"
        );
    }

    #[test]
    fn test_translate_locale_fallback_consumes_first_placeholder() {
        let dictionary = Dictionary::reserved_only();
        dictionary.add("en", "only english", "x").unwrap();
        // The requested locale fills `$1`; later placeholders stay untouched.
        assert_eq!(
            dictionary.translate("ja", "only english", &[&"unused"]),
            "Missing translation for locale 'ja'"
        );
    }

    // ==================== Introspection Tests ====================

    #[test]
    fn test_locales_and_entry() {
        let dictionary = Dictionary::new();
        assert_eq!(dictionary.locales(DEFAULT_RESPONSE_TITLE), vec!["de", "en", "ru"]);
        assert!(dictionary.entry("nope").is_none());
        assert!(dictionary.identifiers().contains(&MISSING_LOCALE.to_string()));
    }

    proptest! {
        #[test]
        fn prop_add_then_has_then_duplicate(
            locale in "[a-z]{2}",
            identifier in "[a-z ]{1,16}",
            text in ".{1,32}",
        ) {
            let dictionary = Dictionary::reserved_only();
            prop_assume!(!dictionary.has(&locale, &identifier));
            prop_assert!(dictionary.add(&locale, &identifier, text.clone()).is_ok());
            prop_assert!(dictionary.has(&locale, &identifier));
            prop_assert!(dictionary.add(&locale, &identifier, text).is_err());
        }
    }
}
