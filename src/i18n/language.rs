//! Locale type: validated two-letter language codes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A validated, lowercase ISO 639-1 style locale code.
///
/// Any two ASCII letters are accepted (case-insensitively) and stored in
/// lowercase. Whether a dictionary actually carries translations for a
/// locale is a separate question answered by the dictionary itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale {
    code: [u8; 2],
}

impl Locale {
    /// English, the locale of the global `missing_locale` fallback.
    pub const ENGLISH: Locale = Locale { code: *b"en" };

    /// Parse a locale code.
    ///
    /// # Returns
    /// * `Some(Locale)` if `value` is exactly two ASCII letters
    /// * `None` otherwise
    ///
    /// # Example
    /// ```
    /// use localized_responder::i18n::Locale;
    ///
    /// assert_eq!(Locale::parse("DE").unwrap().code(), "de");
    /// assert!(Locale::parse("deu").is_none());
    /// ```
    pub fn parse(value: &str) -> Option<Locale> {
        match value.as_bytes() {
            [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => Some(Locale {
                code: [a.to_ascii_lowercase(), b.to_ascii_lowercase()],
            }),
            _ => None,
        }
    }

    /// Check whether `value` would parse as a locale.
    pub fn is_valid(value: &str) -> bool {
        Self::parse(value).is_some()
    }

    /// The lowercase code (e.g. "en", "de").
    pub fn code(&self) -> &str {
        // Both bytes are ASCII letters by construction.
        std::str::from_utf8(&self.code).unwrap_or("en")
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::ENGLISH
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a string is not a valid locale code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid locale '{0}': a language code should be a string of two letters")]
pub struct InvalidLocale(pub String);

impl FromStr for Locale {
    type Err = InvalidLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::parse(s).ok_or_else(|| InvalidLocale(s.to_string()))
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        self.code()
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
