//! Request snapshots and request-scoped value providers.

use axum::extract::{ConnectInfo, Request};
use axum::http::{header, HeaderMap, Method, Uri};
use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

/// App-level setting naming the default view template.
pub const DEFAULT_VIEW_TEMPLATE_SETTING: &str = "default view template";

/// App-level setting naming the preferred response language.
pub const PREFERRED_LANGUAGE_SETTING: &str = "preferred language";

/// App-level settings, installed as a request extension
/// (e.g. `Router::layer(Extension(settings))`).
#[derive(Debug, Clone, Default)]
pub struct AppSettings(Arc<HashMap<String, String>>);

impl AppSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.0).insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// The parts of an incoming request the renderer needs, captured once.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub remote_addr: Option<SocketAddr>,
    pub settings: AppSettings,
}

impl RequestInfo {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            remote_addr: None,
            settings: AppSettings::default(),
        }
    }

    /// Capture a request, including `ConnectInfo` and `AppSettings`
    /// extensions when present.
    pub fn from_request(request: &Request) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
            remote_addr: request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr),
            settings: request
                .extensions()
                .get::<AppSettings>()
                .cloned()
                .unwrap_or_default(),
        }
    }

    pub fn with_header(mut self, name: header::HeaderName, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn with_settings(mut self, settings: AppSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key)
    }

    /// `https` if the URI or a `X-Forwarded-Proto` header says so, else `http`.
    pub fn protocol(&self) -> &str {
        if let Some(scheme) = self.uri.scheme_str() {
            return scheme;
        }
        self.headers
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or("http")
    }

    pub fn host(&self) -> &str {
        self.uri
            .authority()
            .map(|authority| authority.as_str())
            .or_else(|| {
                self.headers
                    .get(header::HOST)
                    .and_then(|value| value.to_str().ok())
            })
            .unwrap_or("localhost")
    }

    /// Full URL of the request as the client addressed it.
    pub fn hyperlink(&self) -> String {
        let path = self
            .uri
            .path_and_query()
            .map(|path| path.as_str())
            .unwrap_or("/");
        format!("{}://{}{}", self.protocol(), self.host(), path)
    }

    pub fn ip(&self) -> String {
        self.remote_addr
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn accept(&self) -> Option<&str> {
        self.headers
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok())
    }
}

type Accessor = dyn Fn(&RequestInfo) -> Option<String> + Send + Sync;

/// A value that is either fixed at setup or computed per request.
#[derive(Clone)]
pub enum Provider {
    Static(String),
    Computed(Arc<Accessor>),
}

impl Provider {
    pub fn computed<F>(accessor: F) -> Self
    where
        F: Fn(&RequestInfo) -> Option<String> + Send + Sync + 'static,
    {
        Provider::Computed(Arc::new(accessor))
    }

    /// Provider reading an app-level setting.
    pub fn setting(key: &'static str) -> Self {
        Self::computed(move |request| request.setting(key).map(str::to_string))
    }

    /// Resolve the value for `request`.
    pub fn evaluate(&self, request: &RequestInfo) -> Option<String> {
        match self {
            Provider::Static(value) => Some(value.clone()),
            Provider::Computed(accessor) => accessor(request),
        }
    }

    pub fn as_static(&self) -> Option<&str> {
        match self {
            Provider::Static(value) => Some(value.as_str()),
            Provider::Computed(_) => None,
        }
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Provider::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for Provider {
    fn from(value: &str) -> Self {
        Provider::Static(value.to_string())
    }
}

impl From<String> for Provider {
    fn from(value: String) -> Self {
        Provider::Static(value)
    }
}
