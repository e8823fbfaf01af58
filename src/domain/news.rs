//! Public news index rules.

use uuid::Uuid;

use crate::domain::entities::CategoryRecord;

/// Number of news items shown per index page.
pub const NEWS_PAGE_SIZE: u32 = 12;
/// Maximum number of categories offered as filters.
pub const NEWS_CATEGORY_LIMIT: u32 = 10;
/// Label shown when no category filter is active or it cannot be resolved.
pub const ALL_CATEGORIES_LABEL: &str = "All";

/// Display name for the active category filter.
///
/// Only the listed categories are consulted, so a filter pointing outside the
/// offered set keeps the default label while still narrowing the items.
pub fn resolve_category_label(categories: &[CategoryRecord], selected: Option<Uuid>) -> String {
    selected
        .and_then(|id| categories.iter().find(|category| category.id == id))
        .map(|category| category.name.clone())
        .unwrap_or_else(|| ALL_CATEGORIES_LABEL.to_string())
}
