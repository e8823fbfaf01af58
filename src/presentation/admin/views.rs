use askama::Template;

use crate::presentation::views::{FlashView, FormFieldView};

#[derive(Clone)]
pub struct AdminNavigationItemView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct AdminChrome {
    pub brand: String,
    pub title: String,
    pub navigation: Vec<AdminNavigationItemView>,
}

impl AdminChrome {
    pub fn new(title: impl Into<String>, active_href: &str) -> Self {
        let navigation = [("Messages", "/contacts"), ("New message", "/contacts/new")]
            .into_iter()
            .map(|(label, href)| AdminNavigationItemView {
                label: label.to_string(),
                href: href.to_string(),
                is_active: href == active_href,
            })
            .collect();

        Self {
            brand: "Bulletin admin".to_string(),
            title: title.into(),
            navigation,
        }
    }
}

#[derive(Clone)]
pub struct AdminLayout<T> {
    pub chrome: AdminChrome,
    pub asset_version: String,
    pub flash: Option<FlashView>,
    pub content: T,
}

impl<T> AdminLayout<T> {
    pub fn new(chrome: AdminChrome, content: T) -> Self {
        Self {
            chrome,
            asset_version: asset_version(),
            flash: None,
            content,
        }
    }

    pub fn with_flash(self, flash: Option<FlashView>) -> Self {
        Self { flash, ..self }
    }
}

fn asset_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[derive(Clone)]
pub struct AdminStatusFilterView {
    pub label: String,
    pub count: u64,
    pub href: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct AdminSelectOptionView {
    pub value: String,
    pub label: String,
    pub is_selected: bool,
}

#[derive(Clone)]
pub struct AdminContactRowView {
    pub id: String,
    pub name: String,
    pub company: String,
    pub mobile: String,
    pub email: String,
    pub demand_excerpt: String,
    pub status_key: &'static str,
    pub status_label: &'static str,
    pub is_unread: bool,
    pub created_at: String,
    pub view_href: String,
    pub edit_href: String,
    pub delete_action: String,
}

#[derive(Clone)]
pub struct AdminContactListView {
    pub heading: String,
    pub rows: Vec<AdminContactRowView>,
    pub filters: Vec<AdminStatusFilterView>,
    pub sort_options: Vec<AdminSelectOptionView>,
    pub filter_status: Option<String>,
    pub filter_search: Option<String>,
    pub filter_month: Option<String>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
    pub export_href: String,
    pub new_href: String,
    pub batch_delete_action: String,
    pub batch_read_action: String,
}

impl AdminContactListView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Template)]
#[template(path = "admin/contacts/list.html")]
pub struct AdminContactsTemplate {
    pub view: AdminLayout<AdminContactListView>,
}

#[derive(Clone)]
pub struct AdminContactDetailView {
    pub id: String,
    pub name: String,
    pub company: String,
    pub mobile: String,
    pub email: String,
    pub demand: String,
    pub status_key: &'static str,
    pub status_label: &'static str,
    pub is_deleted: bool,
    pub created_at: String,
    pub updated_at: String,
    pub edit_href: String,
    pub delete_action: String,
    pub back_href: String,
}

#[derive(Template)]
#[template(path = "admin/contacts/detail.html")]
pub struct AdminContactDetailTemplate {
    pub view: AdminLayout<AdminContactDetailView>,
}

pub struct AdminContactEditorView {
    pub heading: String,
    pub form_action: String,
    pub submit_label: String,
    pub cancel_href: String,
    pub fields: Vec<FormFieldView>,
    /// Present only when editing an existing message.
    pub status_options: Option<Vec<AdminSelectOptionView>>,
    pub status_error: Option<String>,
    pub has_errors: bool,
}

#[derive(Template)]
#[template(path = "admin/contacts/editor.html")]
pub struct AdminContactEditorTemplate {
    pub view: AdminLayout<AdminContactEditorView>,
}
