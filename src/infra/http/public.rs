use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::debug;
use url::form_urlencoded::Serializer;
use uuid::Uuid;

use crate::{
    application::{
        contact_form::{ContactFormError, ContactFormService},
        error::HttpError,
        news::{NewsError, NewsIndex, NewsService},
        repos::HealthRepo,
    },
    domain::{
        contacts::{ContactDraft, FieldErrors},
        entities::NewsRecord,
        news::ALL_CATEGORIES_LABEL,
    },
    presentation::views::{
        CategoryTabView, ContactFormView, ContactTemplate, FlashView, LayoutChrome,
        LayoutContext, NewsCardView, NewsDetailTemplate, NewsDetailView, NewsIndexTemplate,
        NewsIndexView, PageLinkView, contact_form_fields, format_date,
        render_not_found_response, render_template_response,
    },
};

use super::{
    db_health_response,
    flash::{Flash, set_flash, take_flash},
    middleware::{Surface, log_responses, set_request_context},
    parse_optional_uuid, parse_page, repo_error_to_http,
};

const CONTACT_RECEIVED_NOTICE: &str = "Thank you, your message has been received.";
const PAGE_LINK_RADIUS: u32 = 2;

#[derive(Clone)]
pub struct PublicState {
    pub health: Arc<dyn HealthRepo>,
    pub news: Arc<NewsService>,
    pub contact_form: Arc<ContactFormService>,
}

pub fn build_public_router(state: PublicState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/news", get(news_index))
        .route("/news/{id}", get(news_detail))
        .route("/contact", get(contact_form).post(submit_contact))
        .route("/_health/db", get(public_health))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn_with_state(Surface::Public, log_responses))
        .layer(middleware::from_fn(set_request_context))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NewsQuery {
    id: Option<String>,
    page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContactForm {
    name: String,
    company: String,
    mobile: String,
    email: String,
    demand: String,
    /// Hidden from people; automated submitters tend to fill it in.
    website: String,
}

impl From<ContactForm> for ContactDraft {
    fn from(form: ContactForm) -> Self {
        Self {
            name: form.name,
            company: form.company,
            mobile: form.mobile,
            email: form.email,
            demand: form.demand,
        }
    }
}

async fn index() -> Redirect {
    Redirect::to("/news")
}

async fn news_index(State(state): State<PublicState>, Query(query): Query<NewsQuery>) -> Response {
    let source = "infra::http::public::news_index";
    let category = match parse_optional_uuid(source, query.id.as_deref()) {
        Ok(category) => category,
        Err(err) => return err.into_response(),
    };
    let page = parse_page(query.page.as_deref());

    match state.news.list_news(category, page).await {
        Ok(index) => {
            let chrome = LayoutChrome::new(index.category_label.clone(), "/news");
            let view = LayoutContext::new(chrome, build_news_index_view(index));
            render_template_response(NewsIndexTemplate { view }, StatusCode::OK)
        }
        Err(err) => news_error(source, err).into_response(),
    }
}

async fn news_detail(State(state): State<PublicState>, Path(id): Path<String>) -> Response {
    let Ok(id) = Uuid::parse_str(id.trim()) else {
        return render_not_found_response(LayoutChrome::new("Not found", "/news"));
    };

    match state.news.news_detail(id).await {
        Ok(Some(record)) => {
            let chrome = LayoutChrome::new(record.title.clone(), "/news");
            let view = LayoutContext::new(chrome, build_news_detail_view(record));
            render_template_response(NewsDetailTemplate { view }, StatusCode::OK)
        }
        Ok(None) => render_not_found_response(LayoutChrome::new("Not found", "/news")),
        Err(err) => news_error("infra::http::public::news_detail", err).into_response(),
    }
}

async fn contact_form(jar: CookieJar) -> Response {
    let (jar, flash) = take_flash(jar);
    let response = render_contact_form(
        &ContactDraft::default(),
        None,
        flash.map(FlashView::from),
        StatusCode::OK,
    );
    (jar, response).into_response()
}

async fn submit_contact(
    State(state): State<PublicState>,
    jar: CookieJar,
    Form(form): Form<ContactForm>,
) -> Response {
    if !form.website.trim().is_empty() {
        metrics::counter!("bulletin_contact_spam_rejected_total").increment(1);
        debug!(
            target = "bulletin::http::public::contact",
            "honeypot field filled, submission discarded"
        );
        let jar = set_flash(jar, &Flash::success(CONTACT_RECEIVED_NOTICE));
        return (jar, Redirect::to("/contact")).into_response();
    }

    let draft = ContactDraft::from(form);

    match state.contact_form.submit(&draft).await {
        Ok(_) => {
            let jar = set_flash(jar, &Flash::success(CONTACT_RECEIVED_NOTICE));
            (jar, Redirect::to("/contact")).into_response()
        }
        Err(ContactFormError::Validation(errors)) => render_contact_form(
            &draft,
            Some(&errors),
            None,
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        Err(ContactFormError::Repo(err)) => {
            repo_error_to_http("infra::http::public::submit_contact", err).into_response()
        }
    }
}

async fn public_health(State(state): State<PublicState>) -> Response {
    db_health_response(state.health.ping().await)
}

async fn fallback() -> Response {
    render_not_found_response(LayoutChrome::new("Not found", ""))
}

fn render_contact_form(
    draft: &ContactDraft,
    errors: Option<&FieldErrors>,
    flash: Option<FlashView>,
    status: StatusCode,
) -> Response {
    let content = ContactFormView {
        action: "/contact".to_string(),
        fields: contact_form_fields(draft, errors),
        has_errors: errors.is_some_and(|errors| !errors.is_empty()),
    };
    let chrome = LayoutChrome::new("Contact us", "/contact").with_flash(flash);
    render_template_response(
        ContactTemplate {
            view: LayoutContext::new(chrome, content),
        },
        status,
    )
}

fn news_error(source: &'static str, err: NewsError) -> HttpError {
    match err {
        NewsError::Repo(repo) => repo_error_to_http(source, repo),
    }
}

fn news_href(category: Option<Uuid>, page: Option<u32>) -> String {
    let mut serializer = Serializer::new(String::new());
    if let Some(category) = category {
        serializer.append_pair("id", &category.to_string());
    }
    if let Some(page) = page.filter(|page| *page > 1) {
        serializer.append_pair("page", &page.to_string());
    }
    let query = serializer.finish();
    if query.is_empty() {
        "/news".to_string()
    } else {
        format!("/news?{query}")
    }
}

fn build_news_index_view(index: NewsIndex) -> NewsIndexView {
    let NewsIndex {
        categories,
        selected_category,
        category_label,
        items,
    } = index;

    let mut tabs = Vec::with_capacity(categories.len() + 1);
    tabs.push(CategoryTabView {
        label: ALL_CATEGORIES_LABEL.to_string(),
        href: news_href(None, None),
        is_active: selected_category.is_none(),
    });
    tabs.extend(categories.into_iter().map(|category| CategoryTabView {
        is_active: selected_category == Some(category.id),
        href: news_href(Some(category.id), None),
        label: category.name,
    }));

    let first = items.page.saturating_sub(PAGE_LINK_RADIUS).max(1);
    let last = items
        .page
        .saturating_add(PAGE_LINK_RADIUS)
        .min(items.total_pages);
    let pages = if items.total_pages > 1 {
        (first..=last)
            .map(|page| PageLinkView {
                label: page.to_string(),
                href: news_href(selected_category, Some(page)),
                is_current: page == items.page,
            })
            .collect()
    } else {
        Vec::new()
    };

    let previous_href = items
        .has_previous()
        .then(|| news_href(selected_category, Some(items.page - 1)));
    let next_href = items
        .has_next()
        .then(|| news_href(selected_category, Some(items.page + 1)));

    NewsIndexView {
        category_label,
        categories: tabs,
        items: items
            .items
            .into_iter()
            .map(|record| NewsCardView {
                href: format!("/news/{}", record.id),
                published: format_date(record.published_at.unwrap_or(record.created_at)),
                title: record.title,
                summary: record.summary,
                cover_url: record.cover_url,
            })
            .collect(),
        pages,
        previous_href,
        next_href,
    }
}

fn build_news_detail_view(record: NewsRecord) -> NewsDetailView {
    NewsDetailView {
        published: format_date(record.published_at.unwrap_or(record.created_at)),
        body_html: ammonia::clean(&record.body_html),
        title: record.title,
        summary: record.summary,
        cover_url: record.cover_url,
    }
}
