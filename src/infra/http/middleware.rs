use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

/// Listener a request arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Public,
    Admin,
}

impl Surface {
    pub fn as_str(self) -> &'static str {
        match self {
            Surface::Public => "public",
            Surface::Admin => "admin",
        }
    }
}

#[derive(Clone)]
pub struct RequestContext {
    pub request_id: String,
}

pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let ctx = RequestContext {
        request_id: Uuid::new_v4().to_string(),
    };
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;
    response.extensions_mut().insert(ctx);
    response
}

/// Log every response, escalating 4xx to `warn` and 5xx to `error` with the
/// attached `ErrorReport`. The report is consumed here.
pub async fn log_responses(
    State(surface): State<Surface>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();

    let mut response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis();

    let Some(class) = error_class(status) else {
        debug!(
            target = "bulletin::http::response",
            surface = surface.as_str(),
            status = status.as_u16(),
            method = %method,
            path = %path,
            elapsed_ms,
            request_id,
            "request served",
        );
        return response;
    };

    metrics::counter!(
        "bulletin_http_errors_total",
        "class" => class,
        "surface" => surface.as_str()
    )
    .increment(1);

    let report = response.extensions_mut().remove::<ErrorReport>();
    let (source, chain) = report
        .map(|report| (report.source, report.messages))
        .unwrap_or(("unknown", Vec::new()));
    let detail = chain
        .first()
        .map(String::as_str)
        .unwrap_or("no diagnostic available");

    if status.is_server_error() {
        error!(
            target = "bulletin::http::response",
            surface = surface.as_str(),
            status = status.as_u16(),
            method = %method,
            path = %path,
            elapsed_ms,
            source,
            detail,
            chain = ?chain,
            request_id,
            "request failed",
        );
    } else {
        warn!(
            target = "bulletin::http::response",
            surface = surface.as_str(),
            status = status.as_u16(),
            method = %method,
            path = %path,
            elapsed_ms,
            source,
            detail,
            request_id,
            "request rejected",
        );
    }

    response
}

fn error_class(status: StatusCode) -> Option<&'static str> {
    if status.is_server_error() {
        Some("5xx")
    } else if status.is_client_error() {
        Some("4xx")
    } else {
        None
    }
}
