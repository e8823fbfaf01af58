//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::application::pagination::PageWindow;
use crate::domain::contacts::normalize_month_key;
use crate::domain::entities::{AuditLogRecord, CategoryRecord, ContactRecord, NewsRecord};
use crate::domain::error::DomainError;
use crate::domain::types::{CategoryKind, ContactStatus};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Ordering applied to contact listings and exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactSort {
    #[default]
    Newest,
    Oldest,
    Name,
}

impl ContactSort {
    pub const ALL: [ContactSort; 3] = [ContactSort::Newest, ContactSort::Oldest, ContactSort::Name];

    pub fn as_str(self) -> &'static str {
        match self {
            ContactSort::Newest => "newest",
            ContactSort::Oldest => "oldest",
            ContactSort::Name => "name",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ContactSort::Newest => "Newest first",
            ContactSort::Oldest => "Oldest first",
            ContactSort::Name => "Name",
        }
    }

    /// Case-insensitive lookup of a sort key.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str().eq_ignore_ascii_case(value))
    }

    /// Blank means the default order.
    pub fn from_param(value: Option<&str>) -> Result<Self, ContactFilterError> {
        match non_blank(value) {
            None => Ok(Self::default()),
            Some(raw) => {
                Self::parse(raw).ok_or_else(|| ContactFilterError::UnknownSort(raw.to_string()))
            }
        }
    }
}

/// Rejected listing or export parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactFilterError {
    #[error("status `{0}` is not recognised")]
    UnknownStatus(String),
    #[error("sort order `{0}` is not recognised")]
    UnknownSort(String),
    #[error(transparent)]
    Month(#[from] DomainError),
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQueryFilter {
    pub status: Option<ContactStatus>,
    pub search: Option<String>,
    pub month: Option<String>,
}

impl ContactQueryFilter {
    /// Build a filter from raw parameters shared by the admin listing and the
    /// export command. Blank values mean "no restriction".
    pub fn from_params(
        status: Option<&str>,
        search: Option<&str>,
        month: Option<&str>,
    ) -> Result<Self, ContactFilterError> {
        let status = non_blank(status)
            .map(|raw| {
                ContactStatus::try_from(raw.to_ascii_lowercase().as_str())
                    .map_err(|_| ContactFilterError::UnknownStatus(raw.to_string()))
            })
            .transpose()?;
        let month = non_blank(month).map(normalize_month_key).transpose()?;

        Ok(Self {
            status,
            search: non_blank(search).map(str::to_string),
            month,
        })
    }

    /// Statuses a listing shows. Deleted messages only appear when asked for.
    pub fn visible_statuses(&self) -> Vec<ContactStatus> {
        match self.status {
            Some(status) => vec![status],
            None => vec![ContactStatus::Unread, ContactStatus::Read],
        }
    }

    /// Same search and month, without a status restriction. Used for tab counts.
    pub fn without_status(&self) -> Self {
        Self {
            status: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactStatusCount {
    pub status: ContactStatus,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateContactParams {
    pub name: String,
    pub company: Option<String>,
    pub mobile: String,
    pub email: Option<String>,
    pub demand: String,
    pub status: ContactStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateContactParams {
    pub id: Uuid,
    pub name: String,
    pub company: Option<String>,
    pub mobile: String,
    pub email: Option<String>,
    pub demand: String,
    pub status: ContactStatus,
}

#[async_trait]
pub trait ContactsRepo: Send + Sync {
    async fn list_contacts(
        &self,
        filter: &ContactQueryFilter,
        sort: ContactSort,
        window: PageWindow,
    ) -> Result<Vec<ContactRecord>, RepoError>;

    async fn count_contacts(&self, filter: &ContactQueryFilter) -> Result<u64, RepoError>;

    /// Every matching message in listing order, for export.
    async fn list_all_contacts(
        &self,
        filter: &ContactQueryFilter,
        sort: ContactSort,
    ) -> Result<Vec<ContactRecord>, RepoError>;

    /// Per-status totals for the search and month part of `filter`.
    async fn status_counts(
        &self,
        filter: &ContactQueryFilter,
    ) -> Result<Vec<ContactStatusCount>, RepoError>;

    async fn find_contact(&self, id: Uuid) -> Result<Option<ContactRecord>, RepoError>;
}

#[async_trait]
pub trait ContactsWriteRepo: Send + Sync {
    async fn create_contact(&self, params: CreateContactParams)
    -> Result<ContactRecord, RepoError>;

    /// Overwrite a message. A deleted message keeps its status.
    async fn update_contact(&self, params: UpdateContactParams)
    -> Result<ContactRecord, RepoError>;

    /// Move an unread message to read. Returns whether a row changed.
    async fn mark_read_if_unread(&self, id: Uuid) -> Result<bool, RepoError>;

    async fn set_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> Result<ContactRecord, RepoError>;

    /// Move every listed message currently in one of `from` to `to`.
    async fn bulk_update_status(
        &self,
        ids: &[Uuid],
        from: &[ContactStatus],
        to: ContactStatus,
    ) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait CategoriesRepo: Send + Sync {
    /// Enabled categories of `kind` ordered by sort order.
    async fn list_enabled_categories(
        &self,
        kind: CategoryKind,
        limit: u32,
    ) -> Result<Vec<CategoryRecord>, RepoError>;
}

#[async_trait]
pub trait NewsRepo: Send + Sync {
    async fn count_enabled_news(&self, category: Option<Uuid>) -> Result<u64, RepoError>;

    async fn list_enabled_news(
        &self,
        category: Option<Uuid>,
        window: PageWindow,
    ) -> Result<Vec<NewsRecord>, RepoError>;

    async fn find_news(&self, id: Uuid) -> Result<Option<NewsRecord>, RepoError>;
}

#[async_trait]
pub trait AuditRepo: Send + Sync {
    async fn append_log(&self, record: AuditLogRecord) -> Result<(), RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
