use serde::{Deserialize, Serialize};

use crate::messages::Catalog;
use crate::validate::FieldError;

/// Client-specific exam price, overriding the catalog price for one
/// client company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExameCli {
    pub id: u64,

    pub client_id: u64,

    pub exame_id: u64,

    pub valor: u64,

    pub organization_id: String,

    pub create_time: u64,

    pub update_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExameCliPut {
    pub client_id: u64,

    pub exame_id: u64,

    pub valor: u64,

    #[serde(default)]
    pub organization_id: Option<String>,
}

impl ExameCliPut {
    pub fn validate(&self, messages: &Catalog) -> Vec<FieldError> {
        let mut errs = vec![];
        if self.valor == 0 {
            errs.push(FieldError::new(
                "valor",
                messages.get("common.valor.positive"),
            ));
        }
        errs
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExameCliPatch {
    pub valor: Option<u64>,
}

impl ExameCliPatch {
    pub fn validate(&self, messages: &Catalog) -> Vec<FieldError> {
        let mut errs = vec![];
        if let Some(0) = self.valor {
            errs.push(FieldError::new(
                "valor",
                messages.get("common.valor.positive"),
            ));
        }
        errs
    }
}
