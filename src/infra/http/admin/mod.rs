mod contacts;
mod health;
mod shared;
mod state;

pub use state::AdminState;

use axum::{
    Router,
    http::{StatusCode, Uri},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};

use crate::application::error::HttpError;

use super::middleware::{Surface, log_responses, set_request_context};

pub fn build_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/", get(admin_root))
        .route("/contacts", get(contacts::admin_contacts))
        .route("/contacts/new", get(contacts::admin_contact_new))
        .route("/contacts/create", post(contacts::admin_contact_create))
        .route(
            "/contacts/batch-delete",
            post(contacts::admin_contacts_batch_delete),
        )
        .route(
            "/contacts/batch-read",
            post(contacts::admin_contacts_batch_read),
        )
        .route("/contacts/{id}", get(contacts::admin_contact_view))
        .route(
            "/contacts/{id}/edit",
            get(contacts::admin_contact_edit).post(contacts::admin_contact_update),
        )
        .route("/contacts/{id}/delete", post(contacts::admin_contact_delete))
        .route("/_health/db", get(health::admin_health))
        .fallback(admin_fallback)
        .with_state(state)
        .layer(middleware::from_fn_with_state(Surface::Admin, log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn admin_root() -> Redirect {
    Redirect::to("/contacts")
}

async fn admin_fallback(uri: Uri) -> Response {
    HttpError::new(
        "infra::http::admin::fallback",
        StatusCode::NOT_FOUND,
        "Page not found",
        format!("no admin route for `{}`", uri.path()),
    )
    .into_response()
}
