mod editor;
mod errors;
mod forms;
mod handlers;
mod panel;
mod status;

pub(super) use handlers::{
    admin_contact_create, admin_contact_delete, admin_contact_edit, admin_contact_new,
    admin_contact_update, admin_contact_view, admin_contacts, admin_contacts_batch_delete,
    admin_contacts_batch_read,
};
