use axum::http::StatusCode;
use url::form_urlencoded::Serializer;

use crate::{
    application::{
        admin::contacts::ContactStatusCounts,
        error::HttpError,
        repos::{ContactFilterError, ContactQueryFilter, ContactSort},
    },
    domain::types::ContactStatus,
    presentation::admin::views as admin_views,
};

const PARSE_SOURCE: &str = "infra::http::admin::contacts::parse_listing_params";

/// Listing filter and order from raw query values. Unknown values answer 400.
pub(super) fn parse_listing_params(
    status: Option<&str>,
    search: Option<&str>,
    month: Option<&str>,
    sort: Option<&str>,
) -> Result<(ContactQueryFilter, ContactSort), HttpError> {
    let filter = ContactQueryFilter::from_params(status, search, month).map_err(filter_error)?;
    let sort = ContactSort::from_param(sort).map_err(filter_error)?;
    Ok((filter, sort))
}

fn filter_error(err: ContactFilterError) -> HttpError {
    let public = match &err {
        ContactFilterError::UnknownStatus(_) => "Unknown status filter",
        ContactFilterError::UnknownSort(_) => "Unknown sort order",
        ContactFilterError::Month(_) => "Invalid month filter",
    };
    HttpError::new(PARSE_SOURCE, StatusCode::BAD_REQUEST, public, err.to_string())
}

/// Listing URL for `filter`, `sort` and `page`, omitting defaults.
pub(super) fn contact_list_href(
    filter: &ContactQueryFilter,
    sort: ContactSort,
    page: Option<u32>,
) -> String {
    let query = contact_list_query(filter, sort, page);
    if query.is_empty() {
        "/contacts".to_string()
    } else {
        format!("/contacts?{query}")
    }
}

pub(super) fn contact_list_query(
    filter: &ContactQueryFilter,
    sort: ContactSort,
    page: Option<u32>,
) -> String {
    let mut serializer = Serializer::new(String::new());
    if let Some(status) = filter.status {
        serializer.append_pair("status", status.as_str());
    }
    if let Some(search) = filter.search.as_ref() {
        serializer.append_pair("search", search);
    }
    if let Some(month) = filter.month.as_ref() {
        serializer.append_pair("month", month);
    }
    if sort != ContactSort::default() {
        serializer.append_pair("sort", sort.as_str());
    }
    if let Some(page) = page.filter(|page| *page > 1) {
        serializer.append_pair("page", &page.to_string());
    }
    serializer.finish()
}

pub(super) fn contact_status_filters(
    counts: &ContactStatusCounts,
    filter: &ContactQueryFilter,
    sort: ContactSort,
) -> Vec<admin_views::AdminStatusFilterView> {
    let mut filters = vec![admin_views::AdminStatusFilterView {
        label: "All".to_string(),
        count: counts.visible(),
        href: contact_list_href(&filter.without_status(), sort, None),
        is_active: filter.status.is_none(),
    }];

    filters.extend(ContactStatus::ALL.into_iter().map(|status| {
        let scoped = ContactQueryFilter {
            status: Some(status),
            ..filter.clone()
        };
        admin_views::AdminStatusFilterView {
            label: status.label().to_string(),
            count: counts.get(status),
            href: contact_list_href(&scoped, sort, None),
            is_active: filter.status == Some(status),
        }
    }));

    filters
}
