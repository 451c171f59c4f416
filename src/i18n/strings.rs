/// Identifier of the reserved entry used when an identifier is unknown.
pub const MISSING_TRANSLATION: &str = "missing_translation";

/// Identifier of the reserved entry used when a locale is unknown.
/// Only its `en` text is consulted; `$1` receives the requested locale.
pub const MISSING_LOCALE: &str = "missing_locale";

/// Default identifier for the response title.
pub const DEFAULT_RESPONSE_TITLE: &str = "Request Not Matching (Default Title)";

/// Default identifier for the response message.
pub const DEFAULT_RESPONSE_MESSAGE: &str = "Request Not Matching (Default Message)";

/// A built-in entry: identifier and its `(locale, text)` pairs.
pub type BuiltinEntry = (&'static str, &'static [(&'static str, &'static str)]);

// ==================== Reserved Entries ====================

/// Entries present in every dictionary.
pub const RESERVED_ENTRIES: &[BuiltinEntry] = &[
    (
        MISSING_TRANSLATION,
        &[
            ("en", "Missing translation"),
            ("de", "Fehlende Übersetzung"),
            ("ru", "Перевод отсутствует"),
        ],
    ),
    (
        MISSING_LOCALE,
        &[
            ("en", "Missing translation for locale '$1'"),
            ("de", "Fehlende Übersetzung für die Sprache '$1'"),
            ("ru", "Нет перевода для языка '$1'"),
        ],
    ),
];

// ==================== Response Defaults ====================

/// Default response title and message.
pub const RESPONSE_ENTRIES: &[BuiltinEntry] = &[
    (
        DEFAULT_RESPONSE_TITLE,
        &[
            ("en", "Invalid request"),
            ("de", "Ungültige Anfrage"),
            ("ru", "Непонятный запрос"),
        ],
    ),
    (
        DEFAULT_RESPONSE_MESSAGE,
        &[
            (
                "en",
                "Are you looking for something special? Sorry, but there is nothing matching your request.",
            ),
            (
                "de",
                "Hälst du nach etwas besonderem Ausschau? Tschuldige, aber hier gibt es nichts passendes zu deiner Anfrage.",
            ),
            (
                "ru",
                "Ищешь что-то особенное? Извини, но здесь нет ничего подходящего под твой запрос.",
            ),
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(entries: &[BuiltinEntry], identifier: &str) -> Vec<(&'static str, &'static str)> {
        entries
            .iter()
            .find(|(id, _)| *id == identifier)
            .map(|(_, texts)| texts.to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn test_missing_locale_has_english_with_placeholder() {
        let english = texts(RESERVED_ENTRIES, MISSING_LOCALE)
            .into_iter()
            .find(|(locale, _)| *locale == "en")
            .map(|(_, text)| text);
        assert!(english.is_some_and(|text| text.contains("$1")));
    }

    #[test]
    fn test_missing_translation_has_no_placeholders() {
        for (_, text) in texts(RESERVED_ENTRIES, MISSING_TRANSLATION) {
            assert!(!text.contains('$'));
        }
    }

    #[test]
    fn test_response_defaults_cover_same_locales() {
        let title: Vec<_> = texts(RESPONSE_ENTRIES, DEFAULT_RESPONSE_TITLE)
            .into_iter()
            .map(|(locale, _)| locale)
            .collect();
        let message: Vec<_> = texts(RESPONSE_ENTRIES, DEFAULT_RESPONSE_MESSAGE)
            .into_iter()
            .map(|(locale, _)| locale)
            .collect();
        assert_eq!(title, vec!["en", "de", "ru"]);
        assert_eq!(title, message);
    }

    #[test]
    fn test_no_builtin_text_is_empty() {
        for (_, texts) in RESERVED_ENTRIES.iter().chain(RESPONSE_ENTRIES) {
            assert!(texts.iter().all(|(_, text)| !text.is_empty()));
        }
    }
}
