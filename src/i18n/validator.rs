//! Dictionary quality validation.
//!
//! Checks that translations of one identifier stay interchangeable: locale
//! keys are valid codes, texts are not empty, and every locale uses the same
//! set of `$n` placeholders.

use crate::i18n::dictionary::Dictionary;
use crate::i18n::language::Locale;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Audit report containing errors and warnings about a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    /// Entries that can never be served correctly
    pub errors: Vec<String>,

    /// Entries that are likely mistranslated
    pub warnings: Vec<String>,
}

impl AuditReport {
    /// Create a new empty audit report
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if the report has any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for AuditReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Validator for dictionary entries.
pub struct DictionaryValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl DictionaryValidator {
    /// Audit every entry of `dictionary`.
    ///
    /// Placeholder sets are compared against the English text when there is
    /// one, otherwise against the first locale in code order.
    pub fn validate(dictionary: &Dictionary) -> AuditReport {
        let mut report = AuditReport::new();

        for (identifier, translations) in dictionary.snapshot() {
            for (locale, text) in &translations {
                if !Locale::is_valid(locale) || locale.to_lowercase() != *locale {
                    report.errors.push(format!(
                        "Identifier '{}' uses invalid locale code '{}'",
                        identifier, locale
                    ));
                }
                if text.trim().is_empty() {
                    report.errors.push(format!(
                        "Identifier '{}' has an empty translation for '{}'",
                        identifier, locale
                    ));
                }
            }

            let baseline = translations
                .get_key_value("en")
                .or_else(|| translations.iter().next());
            let Some((baseline_locale, baseline_text)) = baseline else {
                continue;
            };
            let expected = Self::extract_placeholders(baseline_text);

            for (locale, text) in &translations {
                if locale == baseline_locale {
                    continue;
                }
                let found = Self::extract_placeholders(text);
                if found != expected {
                    report.warnings.push(format!(
                        "Placeholder mismatch in '{}': '{}' has {:?}, '{}' has {:?}",
                        identifier, baseline_locale, expected, locale, found
                    ));
                }
            }
        }

        report
    }

    /// Compare a single translation against its source text.
    pub fn compare(original: &str, translated: &str) -> Option<String> {
        let expected = Self::extract_placeholders(original);
        let found = Self::extract_placeholders(translated);
        (expected != found).then(|| {
            format!(
                "Placeholder mismatch: original has {:?}, translation has {:?}",
                expected, found
            )
        })
    }

    /// Extract the distinct `$n` placeholder indices used in `text`
    fn extract_placeholders(text: &str) -> BTreeSet<u32> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\$(\d+)").unwrap());

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).and_then(|m| m.as_str().parse().ok()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Placeholder Extraction Tests ====================

    #[test]
    fn test_extract_placeholders_distinct() {
        let found = DictionaryValidator::extract_placeholders("$1 and $2, again $1");
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_extract_placeholders_none() {
        assert!(DictionaryValidator::extract_placeholders("no $ placeholders").is_empty());
    }

    // ==================== compare Tests ====================

    #[test]
    fn test_compare_matching() {
        assert!(DictionaryValidator::compare("Hello $1", "Hallo $1").is_none());
    }

    #[test]
    fn test_compare_order_does_not_matter() {
        assert!(DictionaryValidator::compare("$1 sent $2", "$2 von $1").is_none());
    }

    #[test]
    fn test_compare_missing_placeholder() {
        let warning = DictionaryValidator::compare("Hello $1", "Hallo").unwrap();
        assert!(warning.contains("mismatch"));
    }

    // ==================== validate Tests ====================

    #[test]
    fn test_builtin_dictionary_is_clean() {
        let report = DictionaryValidator::validate(&Dictionary::new());
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn test_validate_reports_placeholder_mismatch() {
        let dictionary = Dictionary::new();
        dictionary.add("en", "inbox", "You have $1 messages").unwrap();
        dictionary.add("de", "inbox", "Du hast Nachrichten").unwrap();

        let report = DictionaryValidator::validate(&dictionary);
        assert!(!report.has_errors());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("inbox"));
    }

    #[test]
    fn test_validate_reports_invalid_locale_and_empty_text() {
        let dictionary = Dictionary::new();
        dictionary.add("english", "farewell", "bye").unwrap();
        dictionary.add("de", "farewell", " ").unwrap();

        let report = DictionaryValidator::validate(&dictionary);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors.iter().any(|e| e.contains("english")));
        assert!(report.errors.iter().any(|e| e.contains("empty")));
    }

    #[test]
    fn test_validate_reports_uppercase_locale() {
        let dictionary = Dictionary::new();
        dictionary.add("DE", "farewell", "tschüss").unwrap();

        let report = DictionaryValidator::validate(&dictionary);
        assert!(report.errors.iter().any(|e| e.contains("'DE'")));
    }

    #[test]
    fn test_report_default_is_clean() {
        assert!(AuditReport::default().is_clean());
    }
}
