use axum::http::StatusCode;

use crate::application::{admin::contacts::AdminContactError, error::HttpError};
use crate::infra::http::repo_error_to_http;

pub(super) fn admin_contact_error(source: &'static str, err: AdminContactError) -> HttpError {
    match err {
        AdminContactError::Validation(errors) => HttpError::new(
            source,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Contact message could not be saved",
            errors.to_string(),
        ),
        AdminContactError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Contact message not found",
            "contact message not found",
        ),
        AdminContactError::Export(err) => HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Export failed",
            &err,
        ),
        AdminContactError::Repo(repo) => repo_error_to_http(source, repo),
    }
}
