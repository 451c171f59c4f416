//! Response rendering: context resolution, language selection and format
//! dispatch.
//!
//! # Architecture
//!
//! - `provider`: Request snapshots and static or request-scoped values
//! - `context`: Caller arguments and the resolved response context
//! - `language`: Ordered response language strategies
//! - `resolve`: Argument shifting, merging, validation and recovery
//! - `negotiate`: `Accept` header negotiation
//! - `dispatch`: HTML, JSON and plain-text bodies
//! - `views`: The view rendering collaborator and its handlebars backend
//! - `plaintext`: Markup stripping for plain-text bodies
//! - `metrics`: Render counters
//!
//! # Example
//!
//! ```
//! use localized_responder::config::RendererConfig;
//! use localized_responder::render::{PartialContext, RenderArg, Renderer, RequestInfo, ResponseStatus};
//! use localized_responder::i18n::NoDetection;
//! use axum::http::{Method, StatusCode, Uri};
//! use std::sync::Arc;
//!
//! let renderer = Renderer::builder(RendererConfig::default().with_default_template("default"))
//!     .detector(Arc::new(NoDetection))
//!     .build()
//!     .unwrap();
//!
//! let request = RequestInfo::new(Method::GET, Uri::from_static("/"));
//! let resolved = renderer
//!     .resolve(
//!         &request,
//!         &ResponseStatus::new(StatusCode::NOT_FOUND),
//!         RenderArg::Absent,
//!         PartialContext::new().language("de").title("Nicht gefunden").into(),
//!     )
//!     .unwrap();
//!
//! assert_eq!(resolved.view, "default");
//! assert_eq!(resolved.context.status, 404);
//! assert_eq!(resolved.context.title.as_deref(), Some("Nicht gefunden"));
//! ```

pub mod context;
pub mod dispatch;
pub mod language;
pub mod metrics;
pub mod negotiate;
pub mod plaintext;
pub mod provider;
pub mod resolve;
pub mod views;

pub use context::{PartialContext, RenderArg, ResponseContext};
pub use language::{LanguageHints, LanguageResolver, LanguageSource, ResolvedLanguage};
pub use metrics::{MetricsReport, RenderMetrics};
pub use negotiate::Format;
pub use provider::{AppSettings, Provider, RequestInfo};
pub use resolve::{ContextResolver, Resolved, ResponseStatus};
pub use views::{HandlebarsViews, ViewRenderer};

use crate::config::RendererConfig;
use crate::error::{ConfigurationError, RenderError};
use crate::i18n::{Dictionary, DictionaryValidator, LanguageDetector, WhatlangDetector};
use axum::response::Response;
use std::sync::Arc;
use tracing::{info, warn};

/// A configured renderer. Cheap to clone; clones share the dictionary,
/// collaborators and metrics.
#[derive(Clone)]
pub struct Renderer {
    inner: Arc<Inner>,
}

struct Inner {
    config: RendererConfig,
    dictionary: Arc<Dictionary>,
    detector: Arc<dyn LanguageDetector>,
    views: Arc<dyn ViewRenderer>,
    metrics: RenderMetrics,
}

impl Renderer {
    pub fn builder(config: RendererConfig) -> RendererBuilder {
        RendererBuilder::new(config)
    }

    pub fn config(&self) -> &RendererConfig {
        &self.inner.config
    }

    pub fn dictionary(&self) -> &Arc<Dictionary> {
        &self.inner.dictionary
    }

    pub fn metrics(&self) -> MetricsReport {
        self.inner.metrics.report()
    }

    pub(crate) fn record_duplicate_render(&self) {
        self.inner.metrics.record_duplicate_render();
    }

    /// Resolve view and context without producing a body.
    pub fn resolve(
        &self,
        request: &RequestInfo,
        status: &ResponseStatus,
        view: RenderArg,
        context: RenderArg,
    ) -> Result<Resolved, RenderError> {
        ContextResolver::new(
            &self.inner.config,
            &self.inner.dictionary,
            self.inner.detector.as_ref(),
            &self.inner.metrics,
        )
        .resolve(request, status, view, context)
    }

    /// Resolve and render a response for `request`.
    pub async fn render(
        &self,
        request: &RequestInfo,
        status: &ResponseStatus,
        view: RenderArg,
        context: RenderArg,
    ) -> Result<Response, RenderError> {
        let resolved = self.resolve(request, status, view, context)?;
        dispatch::dispatch(
            self.inner.views.as_ref(),
            &self.inner.metrics,
            request,
            status.code,
            resolved,
        )
        .await
    }
}

pub struct RendererBuilder {
    config: RendererConfig,
    dictionary: Option<Arc<Dictionary>>,
    detector: Option<Arc<dyn LanguageDetector>>,
    views: Option<Arc<dyn ViewRenderer>>,
}

impl RendererBuilder {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            dictionary: None,
            detector: None,
            views: None,
        }
    }

    pub fn dictionary(mut self, dictionary: Arc<Dictionary>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    pub fn detector(mut self, detector: Arc<dyn LanguageDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn views(mut self, views: Arc<dyn ViewRenderer>) -> Self {
        self.views = Some(views);
        self
    }

    /// Validate the configuration against the dictionary and assemble the
    /// renderer. Dictionary audit findings are logged, never fatal.
    pub fn build(self) -> Result<Renderer, ConfigurationError> {
        let dictionary = self
            .dictionary
            .unwrap_or_else(|| Arc::new(Dictionary::new()));
        self.config.validate(&dictionary)?;

        let report = DictionaryValidator::validate(&dictionary);
        for error in &report.errors {
            warn!("Dictionary error: {}", error);
        }
        for warning in &report.warnings {
            warn!("Dictionary warning: {}", warning);
        }

        info!(
            "Response renderer '{}' ready with {} dictionary identifiers",
            self.config.decorator_name,
            dictionary.identifiers().len()
        );

        Ok(Renderer {
            inner: Arc::new(Inner {
                config: self.config,
                dictionary,
                detector: self
                    .detector
                    .unwrap_or_else(|| Arc::new(WhatlangDetector::new())),
                views: self
                    .views
                    .unwrap_or_else(|| Arc::new(HandlebarsViews::new())),
                metrics: RenderMetrics::new(),
            }),
        })
    }
}
