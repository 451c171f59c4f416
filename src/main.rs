use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use localized_responder::config::Config;
use localized_responder::i18n::{Dictionary, Slug};
use localized_responder::render::provider::{DEFAULT_VIEW_TEMPLATE_SETTING, PREFERRED_LANGUAGE_SETTING};
use localized_responder::render::{AppSettings, HandlebarsViews, MetricsReport, PartialContext, Renderer};
use localized_responder::{responder_middleware, RenderError, Responder};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Identifier of the greeting used for the multilingual `/greet` route.
const GREETING: &str = "hello";

#[derive(Clone)]
struct AppState {
    renderer: Renderer,
    greeting: Arc<Slug>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("localized_responder=info".parse()?),
        )
        .init();

    info!("Starting localized responder");

    // Load configuration from environment
    let config = Config::from_env()?;

    // Step 1: Translations
    let dictionary = Arc::new(Dictionary::new());
    dictionary.add("en", GREETING, "Hello")?;
    dictionary.add("de", GREETING, "Hallo")?;
    dictionary.add("ru", GREETING, "Привет")?;
    if let Some(path) = &config.dictionary_file {
        dictionary
            .load_file(path)
            .with_context(|| format!("Failed to load dictionary from {}", path.display()))?;
        info!("Loaded dictionary from {}", path.display());
    }

    // Step 2: Views
    let views = HandlebarsViews::new();
    views
        .load_directory(&config.templates_dir, &config.template_extension)
        .with_context(|| format!("Failed to load templates from {}", config.templates_dir.display()))?;

    // Step 3: Renderer
    let renderer = Renderer::builder(config.renderer_config())
        .dictionary(dictionary.clone())
        .views(Arc::new(views))
        .build()?;

    let state = AppState {
        renderer: renderer.clone(),
        greeting: Arc::new(Slug::from_dictionary(&dictionary, GREETING)?),
    };

    let settings = AppSettings::new()
        .with(DEFAULT_VIEW_TEMPLATE_SETTING, config.default_view_template.clone())
        .with(PREFERRED_LANGUAGE_SETTING, config.preferred_language.clone());

    let app = Router::new()
        .route("/", get(index))
        .route("/greet/:segment", get(greet))
        .route("/metrics", get(metrics))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(renderer, responder_middleware))
        .layer(Extension(settings))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}

async fn index(responder: Responder) -> Result<(), RenderError> {
    responder
        .respond(
            "index",
            PartialContext::new()
                .title("Localized responder")
                .message("Ask for /greet/hallo, /greet/hello or /greet/привет."),
        )
        .await
}

/// Greets in the language whose translation of the greeting matches the
/// path segment.
async fn greet(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    responder: Responder,
) -> Result<(), RenderError> {
    let Some(locale) = state.greeting.locale_of(&segment) else {
        responder.status(StatusCode::NOT_FOUND);
        return responder.respond_default().await;
    };
    let message = state.renderer.dictionary().translate(locale, GREETING, &[]);
    responder
        .respond("index", PartialContext::new().message(message).language(locale))
        .await
}

async fn metrics(State(state): State<AppState>) -> Json<MetricsReport> {
    Json(state.renderer.metrics())
}

async fn not_found(responder: Responder) -> Result<(), RenderError> {
    responder.status(StatusCode::NOT_FOUND);
    responder.respond_default().await
}
