//! Error types for dictionary, configuration and render operations.
//!
//! Setup-time failures (`ConfigurationError`) abort renderer construction.
//! Per-request validation failures (`ValidationError`) never leave the
//! context resolver: they select the recovery path instead. Everything a
//! handler can observe is a `RenderError`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Re-registration of an existing (locale, identifier) pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Translation with identifier '{identifier}' and locale '{locale}' already exists")]
pub struct DuplicateTranslationError {
    pub identifier: String,
    pub locale: String,
}

/// Failures while loading dictionary sources.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error(transparent)]
    Duplicate(#[from] DuplicateTranslationError),

    #[error("Failed to parse dictionary: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read dictionary file: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid renderer setup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Response decorator name must not be empty")]
    EmptyDecoratorName,

    #[error("Response decorator with name '{0}' can't be used")]
    InvalidDecoratorName(String),

    #[error("Response decorator with name '{0}' is already attached to this request")]
    DecoratorCollision(String),

    #[error("Response renderer is missing a default identifier for the response {0}")]
    MissingDefaultIdentifier(&'static str),

    #[error("Dictionary is missing the default translation '{identifier}' for locale '{locale}'")]
    MissingDefaultTranslation { identifier: String, locale: String },

    #[error("Invalid reference to default language: '{0}'")]
    InvalidPreferredLanguage(String),

    #[error("Invalid reference to default view template")]
    InvalidDefaultTemplate,
}

/// Malformed view or context detected after merging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing a view")]
    MissingView,

    #[error("Missing a context for the view '{view}'")]
    MissingContext { view: String },

    #[error("Context of the view '{view}' is missing a 'message'")]
    MissingMessage { view: String },
}

/// Failure reported by a `ViewRenderer`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to render HTML view '{view}': {reason}")]
pub struct RenderEngineError {
    pub view: String,
    pub reason: String,
}

impl RenderEngineError {
    pub fn new(view: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            view: view.into(),
            reason: reason.to_string(),
        }
    }
}

/// Errors surfaced to request handlers.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Missing or invalid reference to default view template")]
    MissingViewTemplate,

    #[error("Invalid reference to default language: {0:?}")]
    InvalidDefaultLanguage(Option<String>),

    #[error("Response headers have already been sent for '{method} {url}'")]
    AlreadyResponded { method: String, url: String },

    #[error(transparent)]
    RenderEngine(#[from] RenderEngineError),

    #[error("Failed to serialize response context: {0}")]
    Serialize(String),

    #[error("No response decorator is attached to this request")]
    NotAttached,
}

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_translation_message() {
        let err = DuplicateTranslationError {
            identifier: "hello".to_string(),
            locale: "de".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Translation with identifier 'hello' and locale 'de' already exists"
        );
    }

    #[test]
    fn test_render_error_wraps_engine_error() {
        let err: RenderError = RenderEngineError::new("index", "template not found").into();
        assert!(matches!(err, RenderError::RenderEngine(_)));
        assert!(err.to_string().contains("index"));
    }

    #[test]
    fn test_render_error_response_hides_details() {
        let response = RenderError::MissingViewTemplate.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
