use crate::application::error::{ErrorReport, HttpError};
use crate::domain::contacts::{ContactDraft, ContactField, FieldErrors};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use time::{OffsetDateTime, macros::format_description};

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

/// `YYYY-MM-DD` in UTC; empty when the value cannot be formatted.
pub fn format_date(value: OffsetDateTime) -> String {
    value
        .to_offset(time::UtcOffset::UTC)
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

/// `YYYY-MM-DD HH:MM` in UTC.
pub fn format_timestamp(value: OffsetDateTime) -> String {
    value
        .to_offset(time::UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]"
        ))
        .unwrap_or_default()
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct FlashView {
    pub kind: &'static str,
    pub message: String,
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub site_title: String,
    pub page_title: String,
    pub navigation: Vec<NavigationLinkView>,
    pub flash: Option<FlashView>,
}

impl LayoutChrome {
    /// Site chrome with `active_href` highlighted in the navigation.
    pub fn new(page_title: impl Into<String>, active_href: &str) -> Self {
        let navigation = [("News", "/news"), ("Contact", "/contact")]
            .into_iter()
            .map(|(label, href)| NavigationLinkView {
                label: label.to_string(),
                href: href.to_string(),
                is_active: href == active_href,
            })
            .collect();

        Self {
            site_title: "Bulletin".to_string(),
            page_title: page_title.into(),
            navigation,
            flash: None,
        }
    }

    pub fn with_flash(self, flash: Option<FlashView>) -> Self {
        Self { flash, ..self }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub site_title: String,
    pub page_title: String,
    pub navigation: Vec<NavigationLinkView>,
    pub flash: Option<FlashView>,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            site_title: chrome.site_title,
            page_title: chrome.page_title,
            navigation: chrome.navigation,
            flash: chrome.flash,
            content,
        }
    }
}

pub struct CategoryTabView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

pub struct NewsCardView {
    pub title: String,
    pub summary: String,
    pub cover_url: Option<String>,
    pub published: String,
    pub href: String,
}

pub struct PageLinkView {
    pub label: String,
    pub href: String,
    pub is_current: bool,
}

pub struct NewsIndexView {
    pub category_label: String,
    pub categories: Vec<CategoryTabView>,
    pub items: Vec<NewsCardView>,
    pub pages: Vec<PageLinkView>,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
}

#[derive(Template)]
#[template(path = "news/index.html")]
pub struct NewsIndexTemplate {
    pub view: LayoutContext<NewsIndexView>,
}

pub struct NewsDetailView {
    pub title: String,
    pub summary: String,
    pub cover_url: Option<String>,
    pub published: String,
    /// Sanitised markup, emitted unescaped.
    pub body_html: String,
}

#[derive(Template)]
#[template(path = "news/detail.html")]
pub struct NewsDetailTemplate {
    pub view: LayoutContext<NewsDetailView>,
}

/// A text input plus its validation message.
pub struct FormFieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub error: Option<String>,
    pub required: bool,
    pub multiline: bool,
}

/// Inputs for the contact fields shared by the public and admin forms.
pub fn contact_form_fields(
    draft: &ContactDraft,
    errors: Option<&FieldErrors>,
) -> Vec<FormFieldView> {
    let error_for =
        |field: ContactField| errors.and_then(|errors| errors.get(field)).map(str::to_string);

    [
        (ContactField::Name, "Name", &draft.name, true, false),
        (ContactField::Company, "Company", &draft.company, false, false),
        (ContactField::Mobile, "Mobile", &draft.mobile, true, false),
        (ContactField::Email, "Email", &draft.email, false, false),
        (ContactField::Demand, "Demand", &draft.demand, true, true),
    ]
    .into_iter()
    .map(|(field, label, value, required, multiline)| FormFieldView {
        name: field.as_str(),
        label,
        value: value.clone(),
        error: error_for(field),
        required,
        multiline,
    })
    .collect()
}

pub struct ContactFormView {
    pub action: String,
    pub fields: Vec<FormFieldView>,
    pub has_errors: bool,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub view: LayoutContext<ContactFormView>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist.".to_string(),
            primary_action: Some(ErrorAction::news()),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn news() -> Self {
        Self {
            href: "/news".to_string(),
            label: "Back to news".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn timestamps_render_in_utc() {
        let value = datetime!(2024-05-01 23:30 -02:00);
        assert_eq!(format_date(value), "2024-05-02");
        assert_eq!(format_timestamp(value), "2024-05-02 01:30");
    }

    #[test]
    fn navigation_marks_the_active_entry() {
        let chrome = LayoutChrome::new("News", "/news");
        let active: Vec<_> = chrome
            .navigation
            .iter()
            .filter(|link| link.is_active)
            .map(|link| link.label.as_str())
            .collect();
        assert_eq!(active, ["News"]);
    }

    #[test]
    fn not_found_page_renders_with_status() {
        let response = render_not_found_response(LayoutChrome::new("Not found", ""));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.extensions().get::<ErrorReport>().is_some());
    }

    #[test]
    fn contact_form_renders_field_errors() {
        let view = ContactFormView {
            action: "/contact".to_string(),
            fields: vec![FormFieldView {
                name: "name",
                label: "Name",
                value: "<b>".to_string(),
                error: Some("Name is required".to_string()),
                required: true,
                multiline: false,
            }],
            has_errors: true,
        };
        let html = ContactTemplate {
            view: LayoutContext::new(LayoutChrome::new("Contact", "/contact"), view),
        }
        .render()
        .expect("render contact form");

        assert!(html.contains("Name is required"));
        assert!(!html.contains("\"<b>\""));
    }
}
