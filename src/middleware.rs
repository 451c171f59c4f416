//! Axum middleware attaching a `Responder` to every request.
//!
//! ```no_run
//! use axum::{middleware, routing::get, Router};
//! use localized_responder::config::RendererConfig;
//! use localized_responder::middleware::{responder_middleware, Responder};
//! use localized_responder::render::Renderer;
//! use localized_responder::RenderError;
//!
//! async fn hello(responder: Responder) -> Result<(), RenderError> {
//!     responder.respond("index", "Hello there").await
//! }
//!
//! let renderer = Renderer::builder(RendererConfig::default()).build().unwrap();
//! let app: Router = Router::new()
//!     .route("/", get(hello))
//!     .layer(middleware::from_fn_with_state(renderer, responder_middleware));
//! ```

use crate::error::{ConfigurationError, RenderError};
use crate::render::{RenderArg, Renderer, RequestInfo, ResponseStatus};
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{error, info};

/// Responders attached to one request, in registration order.
#[derive(Clone, Default)]
pub struct Responders(Arc<Mutex<Vec<(String, Responder)>>>);

impl Responders {
    fn register(&self, name: &str, responder: Responder) -> Result<(), ConfigurationError> {
        let mut responders = self.0.lock();
        if responders.iter().any(|(existing, _)| existing == name) {
            return Err(ConfigurationError::DecoratorCollision(name.to_string()));
        }
        responders.push((name.to_string(), responder));
        Ok(())
    }

    /// The most recently registered responder.
    pub fn innermost(&self) -> Option<Responder> {
        self.0.lock().last().map(|(_, responder)| responder.clone())
    }

    pub fn names(&self) -> Vec<String> {
        self.0.lock().iter().map(|(name, _)| name.clone()).collect()
    }
}

#[derive(Debug, Default)]
struct ResponseState {
    status: ResponseStatus,
    /// Set while a render is running or once it produced a response
    sent: bool,
    response: Option<Response>,
}

/// Per-request response decorator.
///
/// Extract it in a handler, optionally set the status, then call
/// `respond`. The middleware sends the rendered response in place of
/// whatever the handler returns.
#[derive(Clone)]
pub struct Responder {
    renderer: Renderer,
    request: Arc<RequestInfo>,
    state: Arc<Mutex<ResponseState>>,
}

impl Responder {
    fn new(renderer: Renderer, request: Arc<RequestInfo>) -> Self {
        Self {
            renderer,
            request,
            state: Arc::new(Mutex::new(ResponseState::default())),
        }
    }

    /// Set the response status.
    pub fn status(&self, code: StatusCode) -> &Self {
        self.state.lock().status.code = code;
        self
    }

    /// Set an explicit status text, used as the message of default contexts.
    pub fn status_message(&self, message: impl Into<String>) -> &Self {
        self.state.lock().status.message = Some(message.into());
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.state.lock().status.code
    }

    /// Whether a response has already been produced for this request.
    pub fn headers_sent(&self) -> bool {
        self.state.lock().sent
    }

    pub fn request(&self) -> &RequestInfo {
        &self.request
    }

    /// Translate with the renderer's dictionary.
    pub fn translate(&self, locale: &str, identifier: &str, substitutions: &[&dyn Display]) -> String {
        self.renderer
            .dictionary()
            .translate(locale, identifier, substitutions)
    }

    /// Render a response from a view and a context; both may be omitted
    /// and a context may be passed in the view position.
    ///
    /// Responding twice is a logged no-op.
    ///
    /// # Errors
    /// Provider failures and view rendering failures. The request then gets
    /// whatever the handler returns, typically this error as a bare 500.
    pub async fn respond(
        &self,
        view: impl Into<RenderArg>,
        context: impl Into<RenderArg>,
    ) -> Result<(), RenderError> {
        let status = {
            let mut state = self.state.lock();
            if state.sent {
                drop(state);
                self.refuse_duplicate();
                return Ok(());
            }
            state.sent = true;
            state.status.clone()
        };

        match self
            .renderer
            .render(&self.request, &status, view.into(), context.into())
            .await
        {
            Ok(response) => {
                self.state.lock().response = Some(response);
                Ok(())
            }
            Err(e) => {
                self.state.lock().sent = false;
                Err(e)
            }
        }
    }

    /// Respond with the default view and context.
    pub async fn respond_default(&self) -> Result<(), RenderError> {
        self.respond(RenderArg::Absent, RenderArg::Absent).await
    }

    fn refuse_duplicate(&self) {
        let refused = RenderError::AlreadyResponded {
            method: self.request.method.to_string(),
            url: self.request.hyperlink(),
        };
        error!(
            "Server failed to respond to the request from {}: {}. Prevent repetitive responses to the same request.",
            self.request.ip(),
            refused
        );
        self.renderer.record_duplicate_render();
    }

    fn take_response(&self) -> Option<Response> {
        self.state.lock().response.take()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Responder
where
    S: Send + Sync,
{
    type Rejection = RenderError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Responders>()
            .and_then(Responders::innermost)
            .ok_or(RenderError::NotAttached)
    }
}

/// Middleware for `axum::middleware::from_fn_with_state`.
pub async fn responder_middleware(
    State(renderer): State<Renderer>,
    mut request: Request,
    next: Next,
) -> Response {
    let info = Arc::new(RequestInfo::from_request(&request));
    info!(
        "Server received a request from {} to '{} {}': {:?}",
        info.ip(),
        info.method,
        info.hyperlink(),
        info.headers
    );

    let responders = request
        .extensions()
        .get::<Responders>()
        .cloned()
        .unwrap_or_default();
    let responder = Responder::new(renderer.clone(), info);
    if let Err(e) = responders.register(&renderer.config().decorator_name, responder.clone()) {
        error!("{}", e);
        return RenderError::from(e).into_response();
    }
    request.extensions_mut().insert(responders);

    let response = next.run(request).await;
    responder.take_response().unwrap_or(response)
}
