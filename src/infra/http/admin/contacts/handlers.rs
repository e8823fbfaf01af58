use axum::{
    extract::{Form, Path, Query, State},
    http::{
        StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{Form as MultiForm, cookie::CookieJar};
use tracing::info;
use uuid::Uuid;

use crate::{
    application::{
        admin::{
            contact_export::{EXPORT_CONTENT_TYPE, EXPORT_FILENAME},
            contacts::AdminContactError,
        },
        error::HttpError,
        repos::{ContactQueryFilter, ContactSort},
    },
    domain::{
        contacts::{ContactDraft, ContactField},
        types::ContactStatus,
    },
    infra::http::{
        flash::{Flash, set_flash, take_flash},
        parse_page,
    },
    presentation::{
        admin::views as admin_views,
        views::{FlashView, render_template_response},
    },
};

use super::super::{
    AdminState,
    shared::{ADMIN_ACTOR, parse_id_list},
};
use super::{
    editor::{build_contact_edit_view, build_new_contact_view},
    errors::admin_contact_error,
    forms::{AdminContactBatchForm, AdminContactForm, AdminContactQuery},
    panel::{build_contact_detail_view, build_contact_list_view},
    status::parse_listing_params,
};

const NOTHING_SELECTED_NOTICE: &str = "Select at least one message first";

fn parse_contact_id(source: &'static str, raw: &str) -> Result<Uuid, HttpError> {
    Uuid::parse_str(raw.trim()).map_err(|_| {
        HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Contact message not found",
            format!("`{raw}` is not a contact id"),
        )
    })
}

fn parse_listing_query(
    query: &AdminContactQuery,
) -> Result<(ContactQueryFilter, ContactSort), HttpError> {
    parse_listing_params(
        query.status.as_deref(),
        query.search.as_deref(),
        query.month.as_deref(),
        query.sort.as_deref(),
    )
}

pub(crate) async fn admin_contacts(
    State(state): State<AdminState>,
    jar: CookieJar,
    Query(query): Query<AdminContactQuery>,
) -> Response {
    let (filter, sort) = match parse_listing_query(&query) {
        Ok(parsed) => parsed,
        Err(err) => return err.into_response(),
    };

    if query.wants_export() {
        return export_contacts(&state, &filter, sort).await;
    }

    let listing = match state
        .contacts
        .list(&filter, sort, parse_page(query.page.as_deref()))
        .await
    {
        Ok(listing) => listing,
        Err(err) => {
            return admin_contact_error("infra::http::admin_contacts", err).into_response();
        }
    };

    let content = build_contact_list_view(listing, &filter, sort);
    let (jar, flash) = take_flash(jar);
    let view = admin_views::AdminLayout::new(
        admin_views::AdminChrome::new("Messages", "/contacts"),
        content,
    )
    .with_flash(flash.map(FlashView::from));

    (
        jar,
        render_template_response(admin_views::AdminContactsTemplate { view }, StatusCode::OK),
    )
        .into_response()
}

async fn export_contacts(
    state: &AdminState,
    filter: &ContactQueryFilter,
    sort: ContactSort,
) -> Response {
    match state.contacts.export(filter, sort).await {
        Ok(bytes) => (
            [
                (CONTENT_TYPE, EXPORT_CONTENT_TYPE.to_string()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{EXPORT_FILENAME}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => admin_contact_error("infra::http::admin_contacts_export", err).into_response(),
    }
}

pub(crate) async fn admin_contact_view(
    State(state): State<AdminState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    let source = "infra::http::admin_contact_view";
    let id = match parse_contact_id(source, &id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    let record = match state.contacts.view(ADMIN_ACTOR, id).await {
        Ok(record) => record,
        Err(err) => return admin_contact_error(source, err).into_response(),
    };

    let (jar, flash) = take_flash(jar);
    let view = admin_views::AdminLayout::new(
        admin_views::AdminChrome::new(record.name.clone(), "/contacts"),
        build_contact_detail_view(&record),
    )
    .with_flash(flash.map(FlashView::from));

    (
        jar,
        render_template_response(
            admin_views::AdminContactDetailTemplate { view },
            StatusCode::OK,
        ),
    )
        .into_response()
}

pub(crate) async fn admin_contact_new() -> Response {
    render_editor(
        build_new_contact_view(&ContactDraft::default(), None),
        "/contacts/new",
        StatusCode::OK,
    )
}

pub(crate) async fn admin_contact_create(
    State(state): State<AdminState>,
    jar: CookieJar,
    Form(form): Form<AdminContactForm>,
) -> Response {
    let draft = form.draft();

    match state.contacts.create(ADMIN_ACTOR, &draft).await {
        Ok(record) => {
            let jar = set_flash(jar, &Flash::success("Message created"));
            (jar, Redirect::to(&format!("/contacts/{}", record.id))).into_response()
        }
        Err(AdminContactError::Validation(errors)) => render_editor(
            build_new_contact_view(&draft, Some(&errors)),
            "/contacts/new",
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        Err(err) => admin_contact_error("infra::http::admin_contact_create", err).into_response(),
    }
}

pub(crate) async fn admin_contact_edit(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> Response {
    let source = "infra::http::admin_contact_edit";
    let id = match parse_contact_id(source, &id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match state.contacts.find(id).await {
        Ok(record) => render_editor(
            build_contact_edit_view(
                id,
                &ContactDraft::from(&record),
                Some(record.status),
                None,
            ),
            "/contacts",
            StatusCode::OK,
        ),
        Err(err) => admin_contact_error(source, err).into_response(),
    }
}

pub(crate) async fn admin_contact_update(
    State(state): State<AdminState>,
    jar: CookieJar,
    Path(id): Path<String>,
    Form(form): Form<AdminContactForm>,
) -> Response {
    let source = "infra::http::admin_contact_update";
    let id = match parse_contact_id(source, &id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };
    let draft = form.draft();

    let status = form
        .status
        .as_deref()
        .map(str::trim)
        .and_then(|raw| ContactStatus::try_from(raw).ok());
    let Some(status) = status else {
        if let Err(err) = state.contacts.find(id).await {
            return admin_contact_error(source, err).into_response();
        }
        let mut errors = draft.validate().err().unwrap_or_default();
        errors.push(ContactField::Status, "Choose a valid status");
        return render_editor(
            build_contact_edit_view(id, &draft, None, Some(&errors)),
            "/contacts",
            StatusCode::UNPROCESSABLE_ENTITY,
        );
    };

    match state.contacts.update(ADMIN_ACTOR, id, &draft, status).await {
        Ok(record) => {
            let jar = set_flash(jar, &Flash::success("Message updated"));
            (jar, Redirect::to(&format!("/contacts/{}", record.id))).into_response()
        }
        Err(AdminContactError::Validation(errors)) => render_editor(
            build_contact_edit_view(id, &draft, Some(status), Some(&errors)),
            "/contacts",
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        Err(err) => admin_contact_error(source, err).into_response(),
    }
}

pub(crate) async fn admin_contact_delete(
    State(state): State<AdminState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Response {
    let source = "infra::http::admin_contact_delete";
    let id = match parse_contact_id(source, &id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match state.contacts.delete(ADMIN_ACTOR, id).await {
        Ok(_) => {
            let jar = set_flash(jar, &Flash::success("Message deleted"));
            (jar, Redirect::to("/contacts")).into_response()
        }
        Err(err) => admin_contact_error(source, err).into_response(),
    }
}

pub(crate) async fn admin_contacts_batch_delete(
    State(state): State<AdminState>,
    jar: CookieJar,
    MultiForm(form): MultiForm<AdminContactBatchForm>,
) -> Response {
    let ids = parse_id_list(&form.ids);
    if ids.is_empty() {
        return nothing_selected(jar);
    }

    match state.contacts.batch_delete(ADMIN_ACTOR, &ids).await {
        Ok(affected) => {
            info!(
                target = "bulletin::http::admin::contacts",
                requested = ids.len(),
                affected,
                "batch delete applied"
            );
            let jar = set_flash(jar, &Flash::success(format!("Messages deleted: {affected}")));
            (jar, Redirect::to("/contacts")).into_response()
        }
        Err(err) => {
            admin_contact_error("infra::http::admin_contacts_batch_delete", err).into_response()
        }
    }
}

pub(crate) async fn admin_contacts_batch_read(
    State(state): State<AdminState>,
    jar: CookieJar,
    MultiForm(form): MultiForm<AdminContactBatchForm>,
) -> Response {
    let ids = parse_id_list(&form.ids);
    if ids.is_empty() {
        return nothing_selected(jar);
    }

    match state.contacts.batch_read(ADMIN_ACTOR, &ids).await {
        Ok(affected) => {
            info!(
                target = "bulletin::http::admin::contacts",
                requested = ids.len(),
                affected,
                "batch read applied"
            );
            let jar = set_flash(
                jar,
                &Flash::success(format!("Messages marked as read: {affected}")),
            );
            (jar, Redirect::to("/contacts")).into_response()
        }
        Err(err) => {
            admin_contact_error("infra::http::admin_contacts_batch_read", err).into_response()
        }
    }
}

fn nothing_selected(jar: CookieJar) -> Response {
    let jar = set_flash(jar, &Flash::error(NOTHING_SELECTED_NOTICE));
    (jar, Redirect::to("/contacts")).into_response()
}

fn render_editor(
    content: admin_views::AdminContactEditorView,
    active_href: &str,
    status: StatusCode,
) -> Response {
    let chrome = admin_views::AdminChrome::new(content.heading.clone(), active_href);
    let view = admin_views::AdminLayout::new(chrome, content);
    render_template_response(admin_views::AdminContactEditorTemplate { view }, status)
}
