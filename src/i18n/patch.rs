//! Positional placeholder substitution (`$1`, `$2`, ...).

use regex::{Captures, Regex};
use std::fmt::Display;
use std::sync::OnceLock;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\$(\d+)").unwrap())
}

/// Substitute 1-based positional placeholders with `values`.
///
/// Every occurrence of `$n` is replaced with `values[n - 1]`, so the same
/// placeholder may appear any number of times. Placeholders without a
/// matching value (including `$0`) stay in the text as they are.
///
/// # Example
/// ```
/// use localized_responder::i18n::patch;
///
/// let text = patch(
///     "Welcome back, $1. There are $2 messages for you, $1.",
///     &[&"Eric", &2],
/// );
/// assert_eq!(text, "Welcome back, Eric. There are 2 messages for you, Eric.");
/// ```
pub fn patch(template: &str, values: &[&dyn Display]) -> String {
    if values.is_empty() {
        return template.to_string();
    }

    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| index.checked_sub(1))
                .and_then(|index| values.get(index))
                .map(|value| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_patch_repeated_placeholder() {
        let text = patch(
            "Welcome back, $1. There are $2 messages for you, $1.",
            &[&"Eric", &2],
        );
        assert_eq!(text, "Welcome back, Eric. There are 2 messages for you, Eric.");
    }

    #[test]
    fn test_patch_keeps_unresolved_placeholder() {
        assert_eq!(patch("Hi $1, $3", &[&"A"]), "Hi A, $3");
    }

    #[test]
    fn test_patch_zero_is_not_a_placeholder_index() {
        assert_eq!(patch("$0 and $1", &[&"x"]), "$0 and x");
    }

    #[test]
    fn test_patch_without_values_is_identity() {
        assert_eq!(patch("Costs $5", &[]), "Costs $5");
    }

    #[test]
    fn test_patch_does_not_expand_recursively() {
        assert_eq!(patch("$1 $2", &[&"$2", &"b"]), "$2 b");
    }

    #[test]
    fn test_patch_lone_dollar_is_literal() {
        assert_eq!(patch("price: $ and $1", &[&"ten"]), "price: $ and ten");
    }

    #[test]
    fn test_patch_multi_digit_index() {
        let values: Vec<String> = (1..=12).map(|i| format!("v{}", i)).collect();
        let refs: Vec<&dyn Display> = values.iter().map(|v| v as &dyn Display).collect();
        assert_eq!(patch("$12-$1", &refs), "v12-v1");
    }

    #[test]
    fn test_patch_huge_index_is_kept() {
        assert_eq!(
            patch("$99999999999999999999999", &[&"a"]),
            "$99999999999999999999999"
        );
    }

    proptest! {
        #[test]
        fn prop_text_without_dollar_is_unchanged(text in "[^$]*", value in ".*") {
            prop_assert_eq!(patch(&text, &[&value]), text);
        }

        #[test]
        fn prop_every_occurrence_is_replaced(count in 1usize..8, value in "[a-z]{1,6}") {
            let template = vec!["$1"; count].join(" ");
            let expected = vec![value.as_str(); count].join(" ");
            prop_assert_eq!(patch(&template, &[&value]), expected);
        }
    }
}
