use uuid::Uuid;

use crate::{
    domain::{
        contacts::{ContactDraft, ContactField, FieldErrors},
        types::ContactStatus,
    },
    presentation::{admin::views as admin_views, views::contact_form_fields},
};

pub(super) fn build_new_contact_view(
    draft: &ContactDraft,
    errors: Option<&FieldErrors>,
) -> admin_views::AdminContactEditorView {
    admin_views::AdminContactEditorView {
        heading: "New message".to_string(),
        form_action: "/contacts/create".to_string(),
        submit_label: "Create message".to_string(),
        cancel_href: "/contacts".to_string(),
        fields: contact_form_fields(draft, errors),
        status_options: None,
        status_error: None,
        has_errors: errors.is_some_and(|errors| !errors.is_empty()),
    }
}

pub(super) fn build_contact_edit_view(
    id: Uuid,
    draft: &ContactDraft,
    status: Option<ContactStatus>,
    errors: Option<&FieldErrors>,
) -> admin_views::AdminContactEditorView {
    let status_options = ContactStatus::ALL
        .into_iter()
        .map(|option| admin_views::AdminSelectOptionView {
            value: option.as_str().to_string(),
            label: option.label().to_string(),
            is_selected: Some(option) == status,
        })
        .collect();

    admin_views::AdminContactEditorView {
        heading: "Edit message".to_string(),
        form_action: format!("/contacts/{id}/edit"),
        submit_label: "Save changes".to_string(),
        cancel_href: format!("/contacts/{id}"),
        fields: contact_form_fields(draft, errors),
        status_options: Some(status_options),
        status_error: errors
            .and_then(|errors| errors.get(ContactField::Status))
            .map(str::to_string),
        has_errors: errors.is_some_and(|errors| !errors.is_empty()),
    }
}
