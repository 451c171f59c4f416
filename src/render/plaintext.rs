//! Markup-to-plaintext conversion for plain-text responses.

use ammonia::Builder;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

static TEXT_ONLY: OnceLock<Builder<'static>> = OnceLock::new();
static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();

/// Sanitizer allowing no tags at all, so parsing keeps nothing but text.
fn text_only() -> &'static Builder<'static> {
    TEXT_ONLY.get_or_init(|| {
        let mut builder = Builder::empty();
        builder
            .clean_content_tags(HashSet::from(["script", "style", "template"]))
            .strip_comments(true);
        builder
    })
}

/// Strip markup from `value` if it contains HTML tags.
///
/// The value is parsed as an HTML fragment. Without tags (elements or
/// comments) it is returned unchanged; otherwise its text content is
/// returned with all entities decoded and whitespace runs collapsed to a
/// single space. If nothing but whitespace would remain, the original value
/// is returned.
pub fn plaintext(value: &str) -> String {
    let builder = text_only();
    let stripped = builder.clean(value).to_string();

    // With every '<' escaped no markup can be parsed, so a different
    // result means the fragment had tags.
    let as_text = builder.clean(&value.replace('<', "&lt;")).to_string();
    if stripped == as_text {
        return value.to_string();
    }

    let whitespace = WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").unwrap());
    let decoded = unescape_text(&stripped);
    let text = whitespace.replace_all(decoded.trim(), " ");

    if text.is_empty() {
        value.to_string()
    } else {
        text.into_owned()
    }
}

/// Undo the escaping the HTML serializer applies to text nodes.
fn unescape_text(serialized: &str) -> String {
    serialized
        .replace("&nbsp;", "\u{a0}")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_unchanged() {
        assert_eq!(plaintext("Nothing to see here."), "Nothing to see here.");
    }

    #[test]
    fn test_entities_without_elements_are_unchanged() {
        assert_eq!(plaintext("Fish &amp; chips, 1 < 2"), "Fish &amp; chips, 1 < 2");
    }

    #[test]
    fn test_markup_is_stripped() {
        assert_eq!(
            plaintext("<p>Hello <strong>World</strong>!</p>\n<p>Second   line</p>"),
            "Hello World! Second line"
        );
    }

    #[test]
    fn test_entities_are_decoded_in_markup() {
        assert_eq!(plaintext("<em>Fish &amp; chips</em>"), "Fish & chips");
    }

    #[test]
    fn test_scripts_and_comments_are_dropped() {
        assert_eq!(
            plaintext("<div>Visible<script>alert(1)</script><!-- hidden --></div>"),
            "Visible"
        );
    }

    #[test]
    fn test_attribute_values_never_leak_into_text() {
        assert_eq!(plaintext(r#"<a title="a>b">link</a>"#), "link");
        assert_eq!(plaintext(r#"<img alt="x > y" src="/a.png"> caption"#), "caption");
    }

    #[test]
    fn test_named_and_numeric_entities_are_decoded() {
        assert_eq!(plaintext("<p>caf&#233; &mdash; ok</p>"), "café — ok");
        assert_eq!(plaintext("<b>&#x3C;tag&#x3E; &amp;&nbsp;more</b>"), "<tag> & more");
    }

    #[test]
    fn test_angle_brackets_without_elements_are_unchanged() {
        assert_eq!(plaintext("1 < 2 and 3 > 2"), "1 < 2 and 3 > 2");
    }

    #[test]
    fn test_empty_markup_returns_original() {
        assert_eq!(plaintext("<br/>"), "<br/>");
    }
}
