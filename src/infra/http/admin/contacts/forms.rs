use serde::Deserialize;

use crate::domain::contacts::ContactDraft;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AdminContactQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub month: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub export: Option<String>,
}

impl AdminContactQuery {
    pub(crate) fn wants_export(&self) -> bool {
        matches!(self.export.as_deref().map(str::trim), Some("1" | "true"))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AdminContactForm {
    pub name: String,
    pub company: String,
    pub mobile: String,
    pub email: String,
    pub demand: String,
    pub status: Option<String>,
}

impl AdminContactForm {
    pub(crate) fn draft(&self) -> ContactDraft {
        ContactDraft {
            name: self.name.clone(),
            company: self.company.clone(),
            mobile: self.mobile.clone(),
            email: self.email.clone(),
            demand: self.demand.clone(),
        }
    }
}

/// Checkbox selection from the listing; `ids` repeats once per checked row.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AdminContactBatchForm {
    pub ids: Vec<String>,
}
