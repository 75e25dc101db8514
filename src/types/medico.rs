use serde::{Deserialize, Serialize};

use crate::messages::Catalog;
use crate::validate::FieldError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medico {
    pub id: u64,

    pub nome: String,

    /// Regional medical council registration, e.g. "CRM/SP 123456".
    pub crm: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub especialidade: Option<String>,

    pub organization_id: String,

    pub create_time: u64,

    pub update_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicoPut {
    pub nome: String,

    pub crm: String,

    #[serde(default)]
    pub especialidade: Option<String>,

    #[serde(default)]
    pub organization_id: Option<String>,
}

impl MedicoPut {
    pub fn validate(&self, messages: &Catalog) -> Vec<FieldError> {
        let mut errs = vec![];
        if self.nome.trim().is_empty() {
            errs.push(FieldError::new(
                "nome",
                messages.get("medico.nome.required"),
            ));
        }
        if self.crm.trim().is_empty() {
            errs.push(FieldError::new("crm", messages.get("medico.crm.required")));
        }
        errs
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicoPatch {
    pub nome: Option<String>,

    pub crm: Option<String>,

    pub especialidade: Option<String>,
}

impl MedicoPatch {
    pub fn validate(&self, messages: &Catalog) -> Vec<FieldError> {
        let mut errs = vec![];
        if let Some(ref nome) = self.nome {
            if nome.trim().is_empty() {
                errs.push(FieldError::new(
                    "nome",
                    messages.get("medico.nome.required"),
                ));
            }
        }
        if let Some(ref crm) = self.crm {
            if crm.trim().is_empty() {
                errs.push(FieldError::new("crm", messages.get("medico.crm.required")));
            }
        }
        errs
    }
}
