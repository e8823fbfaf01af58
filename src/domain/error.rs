use thiserror::Error;

use crate::domain::types::ContactStatus;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("domain validation failed: {message}")]
    Validation { message: String },
    #[error("status cannot change from `{}` to `{}`", .from.as_str(), .to.as_str())]
    InvalidTransition {
        from: ContactStatus,
        to: ContactStatus,
    },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
