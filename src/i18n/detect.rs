//! Language detection collaborators.

/// Best-effort classifier mapping free text to a language code.
///
/// Implementations return whatever code they believe in (ideally ISO 639-1)
/// or `None`. Callers validate the result; an "unknown" style answer is
/// simply not a valid locale.
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Option<String>;
}

impl<F> LanguageDetector for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn detect(&self, text: &str) -> Option<String> {
        self(text)
    }
}

/// Detector that never recognizes anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDetection;

impl LanguageDetector for NoDetection {
    fn detect(&self, _text: &str) -> Option<String> {
        None
    }
}

/// Trigram-based detection backed by `whatlang`.
///
/// By default only guesses `whatlang` marks as reliable are returned, so
/// short texts like "ok" yield nothing instead of an arbitrary language.
#[derive(Debug, Clone, Copy)]
pub struct WhatlangDetector {
    /// Only accept results `whatlang` itself marks as reliable.
    pub reliable_only: bool,
}

impl Default for WhatlangDetector {
    fn default() -> Self {
        Self::reliable_only()
    }
}

impl WhatlangDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reliable_only() -> Self {
        Self {
            reliable_only: true,
        }
    }

    /// Accept every guess, however weak.
    pub fn permissive() -> Self {
        Self {
            reliable_only: false,
        }
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text)?;
        if self.reliable_only && !info.is_reliable() {
            return None;
        }
        iso_639_1(info.lang().code()).map(str::to_string)
    }
}

/// Map the ISO 639-3 codes `whatlang` reports to two-letter codes.
fn iso_639_1(code: &str) -> Option<&'static str> {
    let mapped = match code {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "nb",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        _ => return None,
    };
    Some(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_a_detector() {
        let detector = |text: &str| text.starts_with("Hallo").then(|| "de".to_string());
        assert_eq!(detector.detect("Hallo Welt"), Some("de".to_string()));
        assert_eq!(detector.detect("Hello world"), None);
    }

    #[test]
    fn test_no_detection() {
        assert_eq!(NoDetection.detect("Guten Tag, wie geht es dir heute?"), None);
    }

    #[test]
    fn test_iso_mapping() {
        assert_eq!(iso_639_1("deu"), Some("de"));
        assert_eq!(iso_639_1("rus"), Some("ru"));
        assert_eq!(iso_639_1("cmn"), Some("zh"));
        assert_eq!(iso_639_1("xyz"), None);
    }

    #[test]
    fn test_whatlang_detects_long_german_text() {
        let text = "Hälst du nach etwas besonderem Ausschau? Tschuldige, aber hier gibt es \
                    nichts passendes zu deiner Anfrage. Die Seite wurde nicht gefunden.";
        assert_eq!(WhatlangDetector::new().detect(text), Some("de".to_string()));
    }

    #[test]
    fn test_whatlang_detects_russian_text() {
        let text = "Ищешь что-то особенное? Извини, но здесь нет ничего подходящего под твой запрос.";
        assert_eq!(WhatlangDetector::permissive().detect(text), Some("ru".to_string()));
    }

    #[test]
    fn test_default_detector_ignores_short_text() {
        let detector = WhatlangDetector::default();
        assert!(detector.reliable_only);
        for text in ["ok", "Hello", "Welcome back"] {
            assert_eq!(detector.detect(text), None, "guessed a language for {:?}", text);
        }
    }

    #[test]
    fn test_whatlang_empty_text() {
        assert_eq!(WhatlangDetector::new().detect(""), None);
    }
}
