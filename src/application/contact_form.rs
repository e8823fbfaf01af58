//! Public contact form submissions.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::admin::audit::AdminAuditService;
use crate::application::admin::contacts::ContactSnapshot;
use crate::application::repos::{ContactsWriteRepo, CreateContactParams, RepoError};
use crate::domain::contacts::{ContactDraft, FieldErrors};
use crate::domain::entities::ContactRecord;
use crate::domain::types::ContactStatus;

const PUBLIC_ACTOR: &str = "public";

#[derive(Debug, Error)]
pub enum ContactFormError {
    #[error("submission failed validation: {0}")]
    Validation(FieldErrors),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct ContactFormService {
    writer: Arc<dyn ContactsWriteRepo>,
    audit: AdminAuditService,
}

impl ContactFormService {
    pub fn new(writer: Arc<dyn ContactsWriteRepo>, audit: AdminAuditService) -> Self {
        Self { writer, audit }
    }

    /// Store a visitor's message as unread.
    pub async fn submit(&self, draft: &ContactDraft) -> Result<ContactRecord, ContactFormError> {
        let valid = draft.validate().map_err(ContactFormError::Validation)?;

        let record = self
            .writer
            .create_contact(CreateContactParams {
                name: valid.name,
                company: valid.company,
                mobile: valid.mobile,
                email: valid.email,
                demand: valid.demand,
                status: ContactStatus::Unread,
            })
            .await?;

        metrics::counter!("bulletin_contact_submissions_total", "source" => "public").increment(1);
        info!(
            target = "bulletin::application::contact_form",
            contact_id = %record.id,
            "contact message received"
        );
        self.audit
            .record(
                PUBLIC_ACTOR,
                "contact.submit",
                "contact",
                Some(&record.id.to_string()),
                Some(&ContactSnapshot::from(&record)),
            )
            .await?;
        Ok(record)
    }
}
