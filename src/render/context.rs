//! Response contexts: what the caller supplies and what gets rendered.

use crate::i18n::Locale;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Keys with a fixed meaning in every context.
pub const RESERVED_KEYS: [&str; 4] = ["status", "title", "message", "language"];

/// Keys a context may consist of and still count as complete.
const COMPLETE_KEYS: [&str; 3] = ["status", "message", "language"];

/// A fully resolved context, handed to the view renderer and serialized for
/// JSON and plain-text responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseContext {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub language: Locale,
    /// Caller-supplied template data, never holding a reserved key
    #[serde(flatten)]
    pub(crate) extra: Map<String, Value>,
}

impl ResponseContext {
    /// Template data besides the reserved fields.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// A caller-supplied, possibly partial context.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PartialContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Filled through `with` or deserialization, both of which route the
    /// reserved keys to their own fields.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl PartialContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Attach template data under `key`. Reserved keys are set through their
    /// own builders and are ignored here.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) {
            warn!("Ignoring template data under reserved context key '{}'", key);
            return self;
        }
        self.extra.insert(key, value.into());
        self
    }

    /// Template data besides the reserved fields.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub(crate) fn into_extra(self) -> Map<String, Value> {
        self.extra
    }

    /// Names of the keys this context carries.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        [
            self.status.map(|_| "status"),
            self.title.as_ref().map(|_| "title"),
            self.message.as_ref().map(|_| "message"),
            self.language.as_ref().map(|_| "language"),
        ]
        .into_iter()
        .flatten()
        .chain(self.extra.keys().map(String::as_str))
    }

    /// A context is complete when it only consists of `status`, `message`
    /// and `language` keys and carries a valid language. Complete contexts
    /// are rendered as given, without merging defaults (so without a title).
    pub fn is_complete(&self) -> bool {
        self.keys().all(|key| COMPLETE_KEYS.contains(&key))
            && self.language.as_deref().is_some_and(Locale::is_valid)
    }
}

/// One unresolved argument of a render call.
///
/// Both the view and the context argument of `Responder::respond` are
/// `RenderArg`s, so either may be omitted and a context may be passed in
/// the view position.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RenderArg {
    #[default]
    Absent,
    Text(String),
    Object(PartialContext),
    /// A JSON value that is neither text nor a context object.
    Invalid(Value),
}

impl RenderArg {
    pub fn is_absent(&self) -> bool {
        matches!(self, RenderArg::Absent)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, RenderArg::Object(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RenderArg::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<()> for RenderArg {
    fn from(_: ()) -> Self {
        RenderArg::Absent
    }
}

impl From<&str> for RenderArg {
    fn from(value: &str) -> Self {
        RenderArg::Text(value.to_string())
    }
}

impl From<String> for RenderArg {
    fn from(value: String) -> Self {
        RenderArg::Text(value)
    }
}

impl From<PartialContext> for RenderArg {
    fn from(value: PartialContext) -> Self {
        RenderArg::Object(value)
    }
}

impl<T: Into<RenderArg>> From<Option<T>> for RenderArg {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl From<Value> for RenderArg {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RenderArg::Absent,
            Value::String(text) => RenderArg::Text(text),
            Value::Object(map) => {
                // Explicit nulls count as absent keys.
                let map: Map<String, Value> =
                    map.into_iter().filter(|(_, value)| !value.is_null()).collect();
                match serde_json::from_value::<PartialContext>(Value::Object(map.clone())) {
                    Ok(context) => RenderArg::Object(context),
                    Err(_) => RenderArg::Invalid(Value::Object(map)),
                }
            }
            other => RenderArg::Invalid(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== Completeness Tests ====================

    #[test]
    fn test_status_message_language_is_complete() {
        let context = PartialContext::new().status(200).message("ok").language("en");
        assert!(context.is_complete());
    }

    #[test]
    fn test_missing_language_is_incomplete() {
        let context = PartialContext::new().status(200).message("ok");
        assert!(!context.is_complete());
    }

    #[test]
    fn test_invalid_language_is_incomplete() {
        let context = PartialContext::new().message("ok").language("english");
        assert!(!context.is_complete());
    }

    #[test]
    fn test_missing_message_can_be_complete() {
        assert!(PartialContext::new().language("de").is_complete());
    }

    #[test]
    fn test_title_makes_context_incomplete() {
        let context = PartialContext::new().message("ok").language("en").title("Hi");
        assert!(!context.is_complete());
    }

    #[test]
    fn test_template_data_makes_context_incomplete() {
        let context = PartialContext::new().language("en").with("items", json!([1, 2]));
        assert!(!context.is_complete());
    }

    #[test]
    fn test_with_ignores_reserved_keys() {
        let context = PartialContext::new().with("message", "sneaky");
        assert!(context.extra().is_empty());
        assert!(context.message.is_none());
    }

    // ==================== RenderArg Conversion Tests ====================

    #[test]
    fn test_value_object_becomes_context() {
        let arg = RenderArg::from(json!({"message": "Hallo", "language": "de", "user": "ada", "title": null}));
        let RenderArg::Object(context) = arg else {
            panic!("expected an object argument");
        };
        assert_eq!(context.message.as_deref(), Some("Hallo"));
        assert_eq!(context.extra().get("user"), Some(&json!("ada")));
        assert!(context.title.is_none());
    }

    #[test]
    fn test_value_with_mistyped_reserved_key_is_invalid() {
        let arg = RenderArg::from(json!({"status": "not a number"}));
        assert!(matches!(arg, RenderArg::Invalid(_)));
    }

    #[test]
    fn test_value_scalars() {
        assert_eq!(RenderArg::from(Value::Null), RenderArg::Absent);
        assert_eq!(RenderArg::from(json!("text")), RenderArg::Text("text".to_string()));
        assert!(matches!(RenderArg::from(json!(42)), RenderArg::Invalid(_)));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(RenderArg::from(None::<&str>), RenderArg::Absent);
        assert_eq!(RenderArg::from(Some("index")), RenderArg::Text("index".to_string()));
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_response_context_serializes_flat() {
        let mut extra = Map::new();
        extra.insert("user".to_string(), json!("ada"));
        let context = ResponseContext {
            status: 404,
            title: None,
            message: Some("nope".to_string()),
            language: Locale::ENGLISH,
            extra,
        };
        assert_eq!(
            serde_json::to_value(&context).unwrap(),
            json!({"status": 404, "message": "nope", "language": "en", "user": "ada"})
        );
    }
}
