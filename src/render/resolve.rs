//! Turning the arguments of a render call into a view name and a complete
//! response context.
//!
//! The resolver shifts arguments, fills the view from the default provider,
//! merges incomplete contexts with defaults and validates the outcome. A
//! failed validation does not fail the render: the default view and a fresh
//! default context are used instead, with the context status forced to 500.

use crate::config::RendererConfig;
use crate::error::{RenderError, ValidationError};
use crate::i18n::{Dictionary, LanguageDetector, Locale};
use crate::render::context::{PartialContext, RenderArg, ResponseContext};
use crate::render::language::{LanguageHints, LanguageResolver};
use crate::render::metrics::RenderMetrics;
use crate::render::provider::RequestInfo;
use axum::http::StatusCode;
use serde_json::Map;
use tracing::{error, info, warn};

/// Status line of the response being built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseStatus {
    pub code: StatusCode,
    /// Explicit status text, if the handler set one
    pub message: Option<String>,
}

impl ResponseStatus {
    pub fn new(code: StatusCode) -> Self {
        Self { code, message: None }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Outcome of context resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub view: String,
    pub context: ResponseContext,
    /// Whether validation failed and defaults were rendered instead
    pub recovered: bool,
}

/// Caller-supplied values that influence the default context.
#[derive(Debug, Clone, Default)]
struct CallerHints {
    title: Option<String>,
    message: Option<String>,
    language: Option<String>,
}

impl CallerHints {
    fn from_arg(context: &RenderArg) -> Self {
        match context {
            RenderArg::Object(partial) => Self {
                title: non_empty(partial.title.as_deref()),
                message: non_empty(partial.message.as_deref()),
                language: partial.language.clone(),
            },
            RenderArg::Text(message) => Self {
                message: non_empty(Some(message.as_str())),
                ..Self::default()
            },
            RenderArg::Absent | RenderArg::Invalid(_) => Self::default(),
        }
    }

    /// Only the title and language survive a recovery.
    fn for_recovery(&self) -> Self {
        Self {
            title: self.title.clone(),
            message: None,
            language: self.language.clone(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|value| !value.is_empty()).map(str::to_string)
}

pub struct ContextResolver<'a> {
    config: &'a RendererConfig,
    dictionary: &'a Dictionary,
    detector: &'a dyn LanguageDetector,
    metrics: &'a RenderMetrics,
}

impl<'a> ContextResolver<'a> {
    pub fn new(
        config: &'a RendererConfig,
        dictionary: &'a Dictionary,
        detector: &'a dyn LanguageDetector,
        metrics: &'a RenderMetrics,
    ) -> Self {
        Self {
            config,
            dictionary,
            detector,
            metrics,
        }
    }

    /// Resolve the `(view, context)` arguments of one render call.
    ///
    /// # Errors
    /// `MissingViewTemplate` or `InvalidDefaultLanguage` when a default
    /// provider is needed and yields nothing usable.
    pub fn resolve(
        &self,
        request: &RequestInfo,
        status: &ResponseStatus,
        view: RenderArg,
        context: RenderArg,
    ) -> Result<Resolved, RenderError> {
        let (mut view, context) = if !context.is_object() && view.is_object() {
            (RenderArg::Text(self.default_view(request)?), view)
        } else {
            (view, context)
        };

        if view.is_absent() {
            view = RenderArg::Text(self.default_view(request)?);
        }

        let hints = CallerHints::from_arg(&context);
        let resolved = match context {
            RenderArg::Object(partial) => match complete_context(&partial, status) {
                Some(complete) => Some(complete),
                None => {
                    let mut merged = self.default_context(request, status, &hints)?;
                    merged.extra = partial.into_extra();
                    Some(merged)
                }
            },
            RenderArg::Text(_) | RenderArg::Absent => {
                Some(self.default_context(request, status, &hints)?)
            }
            RenderArg::Invalid(_) => None,
        };

        match validate(view, resolved, status.code) {
            Ok((view, context)) => Ok(Resolved {
                view,
                context,
                recovered: false,
            }),
            Err(failure) => self.recover(request, status, &hints, failure),
        }
    }

    fn recover(
        &self,
        request: &RequestInfo,
        status: &ResponseStatus,
        hints: &CallerHints,
        failure: ValidationError,
    ) -> Result<Resolved, RenderError> {
        error!(
            "Server can not respond properly to the request '{}' from {}: {}",
            request.method,
            request.ip(),
            failure
        );

        let view = self.default_view(request)?;
        let mut context = self.default_context(request, status, &hints.for_recovery())?;
        context.status = StatusCode::INTERNAL_SERVER_ERROR.as_u16();
        self.metrics.record_recovery();

        info!(
            "Server will respond with default view '{}' and context settings instead: {}",
            view,
            serde_json::to_string(&context).unwrap_or_default()
        );

        Ok(Resolved {
            view,
            context,
            recovered: true,
        })
    }

    fn default_view(&self, request: &RequestInfo) -> Result<String, RenderError> {
        self.config
            .default_template
            .evaluate(request)
            .filter(|view| !view.trim().is_empty())
            .ok_or(RenderError::MissingViewTemplate)
    }

    fn default_context(
        &self,
        request: &RequestInfo,
        status: &ResponseStatus,
        hints: &CallerHints,
    ) -> Result<ResponseContext, RenderError> {
        let message = hints
            .message
            .clone()
            .or_else(|| non_empty(status.message.as_deref()));

        let language = LanguageResolver::new(self.detector, &self.config.preferred_language)
            .resolve(
                request,
                LanguageHints {
                    explicit: hints.language.as_deref(),
                    message: message.as_deref(),
                    title: hints.title.as_deref(),
                },
            )?;
        for warning in &language.warnings {
            warn!("{}", warning);
        }
        self.metrics.record_language(language.source);
        let locale = language.locale.code();

        let title = hints.title.clone().unwrap_or_else(|| {
            self.dictionary
                .translate(locale, &self.config.default_response_title, &[])
        });
        let message = message.unwrap_or_else(|| {
            self.dictionary
                .translate(locale, &self.config.default_response_message, &[])
        });

        Ok(ResponseContext {
            status: status.code.as_u16(),
            title: Some(title),
            message: Some(message),
            language: language.locale,
            extra: Map::new(),
        })
    }
}

/// A complete caller context rendered as given. Contexts that fail the
/// completeness check yield `None`.
fn complete_context(partial: &PartialContext, status: &ResponseStatus) -> Option<ResponseContext> {
    if !partial.is_complete() {
        return None;
    }
    let language = partial.language.as_deref().and_then(Locale::parse)?;
    Some(ResponseContext {
        status: partial.status.unwrap_or(status.code.as_u16()),
        title: None,
        message: partial.message.clone(),
        language,
        extra: Map::new(),
    })
}

fn validate(
    view: RenderArg,
    context: Option<ResponseContext>,
    status: StatusCode,
) -> Result<(String, ResponseContext), ValidationError> {
    let view = match view {
        RenderArg::Text(view) if !view.trim().is_empty() => view,
        _ => return Err(ValidationError::MissingView),
    };
    let Some(context) = context else {
        return Err(ValidationError::MissingContext { view });
    };
    if status.as_u16() >= 400 && context.message.as_deref().map_or(true, str::is_empty) {
        return Err(ValidationError::MissingMessage { view });
    }
    Ok((view, context))
}
