//! Internationalization (i18n) module: translations and locales.
//!
//! # Architecture
//!
//! - `dictionary`: Injectable translation store with locale fallback
//! - `patch`: Positional `$n` placeholder substitution
//! - `language`: Validated two-letter `Locale` type
//! - `detect`: Language detection collaborators
//! - `strings`: Reserved and default response entries
//! - `validator`: Dictionary quality audit
//! - `slug`: Multilingual route segments
//!
//! # Example
//!
//! ```
//! use localized_responder::i18n::{Dictionary, DEFAULT_RESPONSE_TITLE};
//!
//! let dictionary = Dictionary::new();
//! dictionary.add("en", "greeting", "Hello, $1!").unwrap();
//!
//! assert_eq!(dictionary.translate("en", "greeting", &[&"Ada"]), "Hello, Ada!");
//! assert_eq!(dictionary.translate("de", DEFAULT_RESPONSE_TITLE, &[]), "Ungültige Anfrage");
//! ```

mod detect;
mod dictionary;
mod language;
mod patch;
mod slug;
mod strings;
mod validator;

pub use detect::{LanguageDetector, NoDetection, WhatlangDetector};
pub use dictionary::{Dictionary, Entries, Translations};
pub use language::{InvalidLocale, Locale};
pub use patch::patch;
pub use slug::{strip, Slug, SlugError};
pub use strings::{
    DEFAULT_RESPONSE_MESSAGE, DEFAULT_RESPONSE_TITLE, MISSING_LOCALE, MISSING_TRANSLATION,
};
pub use validator::{AuditReport, DictionaryValidator};
