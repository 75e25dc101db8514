use serde::{Deserialize, Serialize};

use crate::messages::Catalog;
use crate::validate::FieldError;

/// A tenant mirrored from the external identity provider. The id is issued
/// by the provider and never generated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,

    pub name: String,

    pub create_time: u64,

    pub update_time: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationPatch {
    pub name: Option<String>,
}

impl OrganizationPatch {
    pub fn validate(&self, messages: &Catalog) -> Vec<FieldError> {
        let mut errs = vec![];
        if let Some(ref name) = self.name {
            if name.trim().is_empty() {
                errs.push(FieldError::new("name", messages.get("org.name.required")));
            }
        }
        errs
    }
}
