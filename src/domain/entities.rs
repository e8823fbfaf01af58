//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::{CategoryKind, ContactStatus, VisibilityStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactRecord {
    pub id: Uuid,
    pub name: String,
    pub company: Option<String>,
    pub mobile: String,
    pub email: Option<String>,
    pub demand: String,
    pub status: ContactStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub kind: CategoryKind,
    pub name: String,
    pub sort_order: i32,
    pub status: VisibilityStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsRecord {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub summary: String,
    pub body_html: String,
    pub cover_url: Option<String>,
    pub sort_order: i32,
    pub status: VisibilityStatus,
    pub published_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditLogRecord {
    pub id: Uuid,
    pub actor: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub payload_text: Option<String>,
    pub created_at: OffsetDateTime,
}
