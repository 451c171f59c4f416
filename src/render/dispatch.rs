//! Format dispatch: one resolved context, three possible bodies.

use crate::error::RenderError;
use crate::render::metrics::RenderMetrics;
use crate::render::negotiate::Format;
use crate::render::plaintext::plaintext;
use crate::render::provider::RequestInfo;
use crate::render::resolve::Resolved;
use crate::render::views::ViewRenderer;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{error, info};

/// Render `resolved` in the format negotiated from the request's `Accept`
/// header. The response carries `status` unchanged, whatever status the
/// context records.
///
/// # Errors
/// `RenderEngine` if the HTML view fails to render; no body is produced.
pub async fn dispatch(
    views: &dyn ViewRenderer,
    metrics: &RenderMetrics,
    request: &RequestInfo,
    status: StatusCode,
    resolved: Resolved,
) -> Result<Response, RenderError> {
    let Resolved {
        view, mut context, ..
    } = resolved;
    let format = Format::negotiate(request.accept());

    let body = match format {
        Format::Html => match views.render(&view, &context).await {
            Ok(html) => {
                info!("Rendered an HTML view '{}'", view);
                html
            }
            Err(e) => {
                error!("{}", e);
                metrics.record_engine_failure();
                return Err(e.into());
            }
        },
        Format::Json => {
            let json = serde_json::to_string(&context)
                .map_err(|e| RenderError::Serialize(e.to_string()))?;
            info!("Rendered a JSON object: {}", json);
            json
        }
        Format::PlainText => {
            context.message = context.message.as_deref().map(plaintext);
            let text = serde_yaml::to_string(&context)
                .map_err(|e| RenderError::Serialize(e.to_string()))?;
            info!("Rendered a plain-text string: {:?}", text);
            text
        }
    };

    metrics.record_render(format);
    info!(
        "Server sent a {} {} response to the request '{} {}' from {}",
        status.as_u16(),
        format_name(format),
        request.method,
        request.hyperlink(),
        request.ip()
    );

    let mut response = (status, body).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(format.content_type()),
    );
    headers.insert(header::VARY, HeaderValue::from_static("Accept"));
    Ok(response)
}

fn format_name(format: Format) -> &'static str {
    match format {
        Format::Html => "HTML",
        Format::Json => "JSON",
        Format::PlainText => "plain-text",
    }
}
