//! Shared domain enumerations aligned with persisted database enums.

use serde::{Deserialize, Serialize};

/// Lifecycle state of an inbound contact message.
///
/// `Deleted` is a soft delete and is terminal: once a message reaches it, no
/// transition leads back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "contact_status", rename_all = "snake_case")]
pub enum ContactStatus {
    Unread,
    Read,
    Deleted,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 3] = [
        ContactStatus::Unread,
        ContactStatus::Read,
        ContactStatus::Deleted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContactStatus::Unread => "unread",
            ContactStatus::Read => "read",
            ContactStatus::Deleted => "deleted",
        }
    }

    /// Human-readable label used by listings and the spreadsheet export.
    pub fn label(self) -> &'static str {
        match self {
            ContactStatus::Unread => "Unread",
            ContactStatus::Read => "Read",
            ContactStatus::Deleted => "Deleted",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ContactStatus::Deleted)
    }
}

impl TryFrom<&str> for ContactStatus {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "unread" => Ok(ContactStatus::Unread),
            "read" => Ok(ContactStatus::Read),
            "deleted" => Ok(ContactStatus::Deleted),
            _ => Err(()),
        }
    }
}

/// Category families; the public news index only lists `News`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "category_kind", rename_all = "snake_case")]
pub enum CategoryKind {
    News,
    Service,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "visibility_status", rename_all = "snake_case")]
pub enum VisibilityStatus {
    Enabled,
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_keys_round_trip_through_try_from() {
        for status in ContactStatus::ALL {
            assert_eq!(ContactStatus::try_from(status.as_str()), Ok(status));
        }
        assert!(ContactStatus::try_from("archived").is_err());
    }

    #[test]
    fn only_deleted_is_terminal() {
        assert!(ContactStatus::Deleted.is_terminal());
        assert!(!ContactStatus::Read.is_terminal());
        assert!(!ContactStatus::Unread.is_terminal());
    }
}
