use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::admin::audit::AdminAuditService;
use crate::application::admin::contact_export::{
    ContactExportError, build_workbook, export_table,
};
use crate::application::pagination::{OffsetPage, PageRequest};
use crate::application::repos::{
    ContactQueryFilter, ContactSort, ContactsRepo, ContactsWriteRepo, CreateContactParams,
    RepoError, UpdateContactParams,
};
use crate::domain::contacts::{
    BulkContactAction, ContactDraft, ContactField, FieldErrors, status_after_view, transition,
};
use crate::domain::entities::ContactRecord;
use crate::domain::types::ContactStatus;

#[derive(Debug, Error)]
pub enum AdminContactError {
    #[error("contact message failed validation: {0}")]
    Validation(FieldErrors),
    #[error("contact message not found")]
    NotFound,
    #[error(transparent)]
    Export(#[from] ContactExportError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContactStatusCounts {
    pub unread: u64,
    pub read: u64,
    pub deleted: u64,
}

impl ContactStatusCounts {
    pub fn get(&self, status: ContactStatus) -> u64 {
        match status {
            ContactStatus::Unread => self.unread,
            ContactStatus::Read => self.read,
            ContactStatus::Deleted => self.deleted,
        }
    }

    /// Messages shown when no status filter is active.
    pub fn visible(&self) -> u64 {
        self.unread + self.read
    }
}

#[derive(Debug, Clone)]
pub struct ContactListing {
    pub page: OffsetPage<ContactRecord>,
    pub counts: ContactStatusCounts,
}

#[derive(Clone)]
pub struct AdminContactService {
    reader: Arc<dyn ContactsRepo>,
    writer: Arc<dyn ContactsWriteRepo>,
    audit: AdminAuditService,
    page_size: u32,
}

impl AdminContactService {
    pub fn new(
        reader: Arc<dyn ContactsRepo>,
        writer: Arc<dyn ContactsWriteRepo>,
        audit: AdminAuditService,
        page_size: u32,
    ) -> Self {
        Self {
            reader,
            writer,
            audit,
            page_size,
        }
    }

    pub async fn list(
        &self,
        filter: &ContactQueryFilter,
        sort: ContactSort,
        page: Option<u32>,
    ) -> Result<ContactListing, AdminContactError> {
        let total = self.reader.count_contacts(filter).await?;
        let window = PageRequest::new(page, self.page_size).resolve(total);
        let items = self.reader.list_contacts(filter, sort, window).await?;
        let counts = self.status_counts(filter).await?;

        Ok(ContactListing {
            page: OffsetPage::new(items, window),
            counts,
        })
    }

    pub async fn status_counts(
        &self,
        filter: &ContactQueryFilter,
    ) -> Result<ContactStatusCounts, AdminContactError> {
        let rows = self.reader.status_counts(&filter.without_status()).await?;
        let mut counts = ContactStatusCounts::default();
        for row in rows {
            match row.status {
                ContactStatus::Unread => counts.unread += row.count,
                ContactStatus::Read => counts.read += row.count,
                ContactStatus::Deleted => counts.deleted += row.count,
            }
        }
        Ok(counts)
    }

    /// Sheet contents for every message matching `filter`, in listing order.
    /// Not paginated.
    pub async fn export_table(
        &self,
        filter: &ContactQueryFilter,
        sort: ContactSort,
    ) -> Result<Vec<[String; 7]>, AdminContactError> {
        let records = self.reader.list_all_contacts(filter, sort).await?;
        Ok(export_table(&records)?)
    }

    /// `export_table` serialized as an xlsx workbook.
    pub async fn export(
        &self,
        filter: &ContactQueryFilter,
        sort: ContactSort,
    ) -> Result<Vec<u8>, AdminContactError> {
        let table = self.export_table(filter, sort).await?;
        let bytes = build_workbook(&table)?;
        metrics::counter!("bulletin_contact_exports_total").increment(1);
        info!(
            target = "bulletin::application::admin::contacts",
            rows = table.len().saturating_sub(1),
            bytes = bytes.len(),
            "contact export generated"
        );
        Ok(bytes)
    }

    pub async fn find(&self, id: Uuid) -> Result<ContactRecord, AdminContactError> {
        self.reader
            .find_contact(id)
            .await?
            .ok_or(AdminContactError::NotFound)
    }

    /// Load a message for display, marking it read the first time it is opened.
    pub async fn view(&self, actor: &str, id: Uuid) -> Result<ContactRecord, AdminContactError> {
        let mut record = self.find(id).await?;

        if let Some(next) = status_after_view(record.status)
            && self.writer.mark_read_if_unread(id).await?
        {
            self.record_transition(actor, "contact.read", &record, next)
                .await?;
            record.status = next;
        }

        Ok(record)
    }

    pub async fn create(
        &self,
        actor: &str,
        draft: &ContactDraft,
    ) -> Result<ContactRecord, AdminContactError> {
        let valid = draft.validate().map_err(AdminContactError::Validation)?;

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

        metrics::counter!("bulletin_contact_submissions_total", "source" => "admin").increment(1);
        self.audit
            .record(
                actor,
                "contact.create",
                "contact",
                Some(&record.id.to_string()),
                Some(&ContactSnapshot::from(&record)),
            )
            .await?;
        Ok(record)
    }

    pub async fn update(
        &self,
        actor: &str,
        id: Uuid,
        draft: &ContactDraft,
        status: ContactStatus,
    ) -> Result<ContactRecord, AdminContactError> {
        let existing = self.find(id).await?;

        let validated = draft.validate();
        let transitioned = transition(existing.status, status);
        let (valid, status) = match (validated, transitioned) {
            (Ok(valid), Ok(status)) => (valid, status),
            (validated, transitioned) => {
                let mut errors = validated.err().unwrap_or_default();
                if let Err(err) = transitioned {
                    errors.push(ContactField::Status, err.to_string());
                }
                return Err(AdminContactError::Validation(errors));
            }
        };

        let record = self
            .writer
            .update_contact(UpdateContactParams {
                id,
                name: valid.name,
                company: valid.company,
                mobile: valid.mobile,
                email: valid.email,
                demand: valid.demand,
                status,
            })
            .await
            .map_err(not_found)?;

        if record.status != existing.status {
            metrics::counter!(
                "bulletin_contact_status_transitions_total",
                "to" => record.status.as_str()
            )
            .increment(1);
        }
        self.audit
            .record(
                actor,
                "contact.update",
                "contact",
                Some(&record.id.to_string()),
                Some(&ContactSnapshot::from(&record)),
            )
            .await?;
        Ok(record)
    }

    /// Soft delete. Validation is not consulted, and deleting an already deleted
    /// message still rewrites the row and leaves an audit entry.
    pub async fn delete(&self, actor: &str, id: Uuid) -> Result<ContactRecord, AdminContactError> {
        let existing = self.find(id).await?;
        let record = self
            .writer
            .set_contact_status(id, ContactStatus::Deleted)
            .await
            .map_err(not_found)?;

        self.record_transition(actor, "contact.delete", &existing, ContactStatus::Deleted)
            .await?;
        Ok(record)
    }

    pub async fn batch_delete(&self, actor: &str, ids: &[Uuid]) -> Result<u64, AdminContactError> {
        self.apply_bulk(actor, BulkContactAction::Delete, ids).await
    }

    pub async fn batch_read(&self, actor: &str, ids: &[Uuid]) -> Result<u64, AdminContactError> {
        self.apply_bulk(actor, BulkContactAction::MarkRead, ids).await
    }

    async fn apply_bulk(
        &self,
        actor: &str,
        action: BulkContactAction,
        ids: &[Uuid],
    ) -> Result<u64, AdminContactError> {
        let mut seen = HashSet::with_capacity(ids.len());
        let ids: Vec<Uuid> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();
        if ids.is_empty() {
            debug!(
                target = "bulletin::application::admin::contacts",
                action = action.audit_action(),
                "bulk action skipped: no ids"
            );
            return Ok(0);
        }

        let affected = self
            .writer
            .bulk_update_status(&ids, action.eligible_statuses(), action.target())
            .await?;

        metrics::counter!(
            "bulletin_contact_status_transitions_total",
            "to" => action.target().as_str()
        )
        .increment(affected);

        let payload = BulkSnapshot {
            ids: &ids,
            affected,
        };
        self.audit
            .record(actor, action.audit_action(), "contact", None, Some(&payload))
            .await?;
        Ok(affected)
    }

    async fn record_transition(
        &self,
        actor: &str,
        action: &str,
        record: &ContactRecord,
        to: ContactStatus,
    ) -> Result<(), AdminContactError> {
        if record.status != to {
            metrics::counter!("bulletin_contact_status_transitions_total", "to" => to.as_str())
                .increment(1);
        }
        let payload = TransitionSnapshot {
            from: record.status.as_str(),
            to: to.as_str(),
        };
        self.audit
            .record(
                actor,
                action,
                "contact",
                Some(&record.id.to_string()),
                Some(&payload),
            )
            .await?;
        Ok(())
    }
}

fn not_found(err: RepoError) -> AdminContactError {
    match err {
        RepoError::NotFound => AdminContactError::NotFound,
        other => AdminContactError::Repo(other),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ContactSnapshot<'a> {
    name: &'a str,
    mobile: &'a str,
    status: &'a str,
}

impl<'a> From<&'a ContactRecord> for ContactSnapshot<'a> {
    fn from(record: &'a ContactRecord) -> Self {
        Self {
            name: record.name.as_str(),
            mobile: record.mobile.as_str(),
            status: record.status.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TransitionSnapshot<'a> {
    from: &'a str,
    to: &'a str,
}

#[derive(Debug, Serialize)]
struct BulkSnapshot<'a> {
    ids: &'a [Uuid],
    affected: u64,
}
