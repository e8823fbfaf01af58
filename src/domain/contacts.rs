//! Contact message rules: field validation, status transitions and bulk actions.

use std::fmt;

use time::{Date, macros::format_description};

use crate::domain::{entities::ContactRecord, error::DomainError, types::ContactStatus};

pub const NAME_MAX_CHARS: usize = 64;
pub const COMPANY_MAX_CHARS: usize = 128;
pub const MOBILE_MAX_CHARS: usize = 32;
pub const EMAIL_MAX_CHARS: usize = 128;
pub const DEMAND_MAX_CHARS: usize = 2000;

/// Raw form input for a contact message, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub company: String,
    pub mobile: String,
    pub email: String,
    pub demand: String,
}

/// Trimmed, validated contact fields ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub company: Option<String>,
    pub mobile: String,
    pub email: Option<String>,
    pub demand: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Company,
    Mobile,
    Email,
    Demand,
    Status,
}

impl ContactField {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Company => "company",
            ContactField::Mobile => "mobile",
            ContactField::Email => "email",
            ContactField::Demand => "demand",
            ContactField::Status => "status",
        }
    }
}

/// Every field-level problem found in one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(ContactField, String)>,
}

impl FieldErrors {
    pub fn push(&mut self, field: ContactField, message: impl Into<String>) {
        self.entries.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// First message recorded for `field`.
    pub fn get(&self, field: ContactField) -> Option<&str> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContactField, &str)> {
        self.entries
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.entries {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field.as_str(), message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl ContactDraft {
    pub fn validate(&self) -> Result<ValidContact, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(ContactField::Name, "Name is required");
        } else if name.chars().count() > NAME_MAX_CHARS {
            errors.push(
                ContactField::Name,
                format!("Name must be at most {NAME_MAX_CHARS} characters"),
            );
        }

        let company = optional(&self.company);
        if let Some(company) = company.as_deref()
            && company.chars().count() > COMPANY_MAX_CHARS
        {
            errors.push(
                ContactField::Company,
                format!("Company must be at most {COMPANY_MAX_CHARS} characters"),
            );
        }

        let mobile = self.mobile.trim();
        if mobile.is_empty() {
            errors.push(ContactField::Mobile, "Mobile is required");
        } else if mobile.chars().count() > MOBILE_MAX_CHARS {
            errors.push(
                ContactField::Mobile,
                format!("Mobile must be at most {MOBILE_MAX_CHARS} characters"),
            );
        } else if !is_valid_mobile(mobile) {
            errors.push(ContactField::Mobile, "Mobile may only contain digits, spaces and + - ( )");
        }

        let email = optional(&self.email);
        if let Some(email) = email.as_deref() {
            if email.chars().count() > EMAIL_MAX_CHARS {
                errors.push(
                    ContactField::Email,
                    format!("Email must be at most {EMAIL_MAX_CHARS} characters"),
                );
            } else if !is_valid_email(email) {
                errors.push(ContactField::Email, "Email is not a valid address");
            }
        }

        let demand = self.demand.trim();
        if demand.is_empty() {
            errors.push(ContactField::Demand, "Demand is required");
        } else if demand.chars().count() > DEMAND_MAX_CHARS {
            errors.push(
                ContactField::Demand,
                format!("Demand must be at most {DEMAND_MAX_CHARS} characters"),
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidContact {
            name: name.to_string(),
            company,
            mobile: mobile.to_string(),
            email,
            demand: demand.to_string(),
        })
    }
}

impl From<&ContactRecord> for ContactDraft {
    fn from(record: &ContactRecord) -> Self {
        Self {
            name: record.name.clone(),
            company: record.company.clone().unwrap_or_default(),
            mobile: record.mobile.clone(),
            email: record.email.clone().unwrap_or_default(),
            demand: record.demand.clone(),
        }
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn is_valid_mobile(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
}

fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut labels = domain.split('.');
    let first = labels.next().unwrap_or_default();
    let rest: Vec<&str> = labels.collect();
    !first.is_empty() && !rest.is_empty() && rest.iter().all(|label| !label.is_empty())
}

/// Resolve a requested status change. `Deleted` is terminal.
pub fn transition(from: ContactStatus, to: ContactStatus) -> Result<ContactStatus, DomainError> {
    if from == to {
        return Ok(to);
    }
    if from.is_terminal() {
        return Err(DomainError::InvalidTransition { from, to });
    }
    Ok(to)
}

/// Status a message moves to when an administrator opens it, if any.
pub fn status_after_view(current: ContactStatus) -> Option<ContactStatus> {
    match current {
        ContactStatus::Unread => Some(ContactStatus::Read),
        ContactStatus::Read | ContactStatus::Deleted => None,
    }
}

/// Status updates applied to a selection of messages at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkContactAction {
    Delete,
    MarkRead,
}

impl BulkContactAction {
    pub fn target(self) -> ContactStatus {
        match self {
            BulkContactAction::Delete => ContactStatus::Deleted,
            BulkContactAction::MarkRead => ContactStatus::Read,
        }
    }

    /// Statuses a message must currently hold for the action to touch it.
    pub fn eligible_statuses(self) -> &'static [ContactStatus] {
        match self {
            BulkContactAction::Delete => &[ContactStatus::Unread, ContactStatus::Read],
            BulkContactAction::MarkRead => &[ContactStatus::Unread],
        }
    }

    pub fn audit_action(self) -> &'static str {
        match self {
            BulkContactAction::Delete => "contact.batch_delete",
            BulkContactAction::MarkRead => "contact.batch_read",
        }
    }
}

/// Normalise a `YYYY-MM` month filter.
pub fn normalize_month_key(value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    let date = Date::parse(
        &format!("{trimmed}-01"),
        format_description!("[year]-[month]-[day]"),
    )
    .map_err(|_| DomainError::validation(format!("`{trimmed}` is not a YYYY-MM month")))?;
    date.format(format_description!("[year]-[month]"))
        .map_err(|err| DomainError::validation(err.to_string()))
}
