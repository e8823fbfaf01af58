use crate::{
    application::{admin::contacts::ContactListing, repos::ContactQueryFilter, repos::ContactSort},
    domain::{entities::ContactRecord, types::ContactStatus},
    presentation::{admin::views as admin_views, views::format_timestamp},
};

use super::status::{contact_list_href, contact_list_query, contact_status_filters};

const DEMAND_EXCERPT_CHARS: usize = 80;

pub(super) fn build_contact_list_view(
    listing: ContactListing,
    filter: &ContactQueryFilter,
    sort: ContactSort,
) -> admin_views::AdminContactListView {
    let ContactListing { page, counts } = listing;

    let previous_href = page
        .has_previous()
        .then(|| contact_list_href(filter, sort, Some(page.page - 1)));
    let next_href = page
        .has_next()
        .then(|| contact_list_href(filter, sort, Some(page.page + 1)));

    let sort_options = ContactSort::ALL
        .into_iter()
        .map(|option| admin_views::AdminSelectOptionView {
            value: option.as_str().to_string(),
            label: option.label().to_string(),
            is_selected: option == sort,
        })
        .collect();

    let export_query = contact_list_query(filter, sort, None);
    let export_href = if export_query.is_empty() {
        "/contacts?export=1".to_string()
    } else {
        format!("/contacts?{export_query}&export=1")
    };

    admin_views::AdminContactListView {
        heading: "Messages".to_string(),
        filters: contact_status_filters(&counts, filter, sort),
        sort_options,
        filter_status: filter.status.map(|status| status.as_str().to_string()),
        filter_search: filter.search.clone(),
        filter_month: filter.month.clone(),
        total: page.total,
        page: page.page,
        total_pages: page.total_pages,
        previous_href,
        next_href,
        export_href,
        new_href: "/contacts/new".to_string(),
        batch_delete_action: "/contacts/batch-delete".to_string(),
        batch_read_action: "/contacts/batch-read".to_string(),
        rows: page.items.iter().map(build_contact_row).collect(),
    }
}

fn build_contact_row(record: &ContactRecord) -> admin_views::AdminContactRowView {
    let id = record.id.to_string();
    admin_views::AdminContactRowView {
        name: record.name.clone(),
        company: record.company.clone().unwrap_or_default(),
        mobile: record.mobile.clone(),
        email: record.email.clone().unwrap_or_default(),
        demand_excerpt: excerpt(&record.demand, DEMAND_EXCERPT_CHARS),
        status_key: record.status.as_str(),
        status_label: record.status.label(),
        is_unread: record.status == ContactStatus::Unread,
        created_at: format_timestamp(record.created_at),
        view_href: format!("/contacts/{id}"),
        edit_href: format!("/contacts/{id}/edit"),
        delete_action: format!("/contacts/{id}/delete"),
        id,
    }
}

pub(super) fn build_contact_detail_view(
    record: &ContactRecord,
) -> admin_views::AdminContactDetailView {
    let id = record.id.to_string();
    admin_views::AdminContactDetailView {
        name: record.name.clone(),
        company: record.company.clone().unwrap_or_default(),
        mobile: record.mobile.clone(),
        email: record.email.clone().unwrap_or_default(),
        demand: record.demand.clone(),
        status_key: record.status.as_str(),
        status_label: record.status.label(),
        is_deleted: record.status.is_terminal(),
        created_at: format_timestamp(record.created_at),
        updated_at: format_timestamp(record.updated_at),
        edit_href: format!("/contacts/{id}/edit"),
        delete_action: format!("/contacts/{id}/delete"),
        back_href: "/contacts".to_string(),
        id,
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
        None => text.to_string(),
    }
}
