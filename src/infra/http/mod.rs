mod admin;
mod flash;
mod middleware;
mod public;

pub use admin::{AdminState, build_admin_router};
pub use public::{PublicState, build_public_router};

use crate::application::error::ErrorReport;
use crate::application::error::HttpError;
use crate::application::repos::RepoError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

fn db_health_response(result: Result<(), RepoError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}

/// Map a repository error to a consistent HTTP error response for admin/public surfaces.
pub fn repo_error_to_http(source: &'static str, err: RepoError) -> HttpError {
    match err {
        RepoError::Duplicate { constraint } => {
            HttpError::new(source, StatusCode::CONFLICT, "Duplicate record", constraint)
        }
        RepoError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Resource not found",
            "resource not found",
        ),
        RepoError::InvalidInput { message } => {
            HttpError::new(source, StatusCode::BAD_REQUEST, "Invalid input", message)
        }
        RepoError::Integrity { message } => HttpError::new(
            source,
            StatusCode::CONFLICT,
            "Integrity constraint violated",
            message,
        ),
        RepoError::Timeout => HttpError::new(
            source,
            StatusCode::SERVICE_UNAVAILABLE,
            "Database timeout",
            "Database timeout",
        ),
        RepoError::Persistence(message) => HttpError::new(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Persistence error",
            message,
        ),
    }
}

/// Parse an optional uuid query/form value; blank means absent.
fn parse_optional_uuid(
    source: &'static str,
    value: Option<&str>,
) -> Result<Option<uuid::Uuid>, HttpError> {
    match value.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(raw) => uuid::Uuid::parse_str(raw).map(Some).map_err(|err| {
            HttpError::new(
                source,
                StatusCode::BAD_REQUEST,
                "Invalid identifier",
                format!("`{raw}` is not a valid id: {err}"),
            )
        }),
    }
}

/// Lenient page parsing: anything unparseable means the first page.
fn parse_page(value: Option<&str>) -> Option<u32> {
    value.and_then(|raw| raw.trim().parse::<u32>().ok())
}
