//! Localized response rendering for axum.
//!
//! A middleware attaches a [`Responder`](middleware::Responder) to each
//! request. Handlers pass it an optional view and an optional context; the
//! responder fills in a localized title, message and language, validates
//! the result and renders it as HTML, JSON or plain text depending on the
//! request's `Accept` header.

pub mod config;
pub mod error;
pub mod i18n;
pub mod middleware;
pub mod render;

pub use config::{Config, RendererConfig};
pub use error::{
    ConfigurationError, DictionaryError, DuplicateTranslationError, RenderEngineError, RenderError,
    ValidationError,
};
pub use middleware::{responder_middleware, Responder, Responders};
pub use render::{PartialContext, RenderArg, Renderer, RendererBuilder};
