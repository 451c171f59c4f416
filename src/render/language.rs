//! Response language resolution.
//!
//! Strategies run in a fixed order and the first valid locale wins:
//! explicit context language, detected language of the message, detected
//! language of the title, then the configured default provider. Explicit
//! caller intent outranks inference, and message text outranks the title
//! because it is usually longer and detects more reliably.

use crate::error::RenderError;
use crate::i18n::{LanguageDetector, Locale};
use crate::render::provider::{Provider, RequestInfo};

/// Which strategy produced the locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSource {
    Explicit,
    Message,
    Title,
    Default,
}

/// Inputs of one resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageHints<'a> {
    pub explicit: Option<&'a str>,
    pub message: Option<&'a str>,
    pub title: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLanguage {
    pub locale: Locale,
    pub source: LanguageSource,
    /// Non-fatal problems noticed on the way, for the caller to report
    pub warnings: Vec<String>,
}

pub struct LanguageResolver<'a> {
    detector: &'a dyn LanguageDetector,
    fallback: &'a Provider,
}

impl<'a> LanguageResolver<'a> {
    pub fn new(detector: &'a dyn LanguageDetector, fallback: &'a Provider) -> Self {
        Self { detector, fallback }
    }

    /// Resolve the response locale.
    ///
    /// # Errors
    /// `RenderError::InvalidDefaultLanguage` if every strategy fails and the
    /// default provider yields nothing valid.
    pub fn resolve(
        &self,
        request: &RequestInfo,
        hints: LanguageHints<'_>,
    ) -> Result<ResolvedLanguage, RenderError> {
        let mut warnings = Vec::new();

        if let Some(explicit) = hints.explicit {
            if let Some(locale) = Locale::parse(explicit) {
                return Ok(ResolvedLanguage {
                    locale,
                    source: LanguageSource::Explicit,
                    warnings,
                });
            }
            warnings.push(format!(
                "Template context language was set to '{}' but this is not valid! \
                 A language code should be a string of two lowercase letters.",
                explicit
            ));
        }

        let detected = [
            (hints.message, LanguageSource::Message),
            (hints.title, LanguageSource::Title),
        ]
        .into_iter()
        .find_map(|(text, source)| self.detect(text?).map(|locale| (locale, source)));

        if let Some((locale, source)) = detected {
            return Ok(ResolvedLanguage {
                locale,
                source,
                warnings,
            });
        }

        let fallback = self.fallback.evaluate(request);
        match fallback.as_deref().and_then(Locale::parse) {
            Some(locale) => Ok(ResolvedLanguage {
                locale,
                source: LanguageSource::Default,
                warnings,
            }),
            None => Err(RenderError::InvalidDefaultLanguage(fallback)),
        }
    }

    fn detect(&self, text: &str) -> Option<Locale> {
        if text.trim().is_empty() {
            return None;
        }
        self.detector
            .detect(text)
            .as_deref()
            .and_then(Locale::parse)
    }
}
