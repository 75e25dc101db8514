use serde::{Deserialize, Serialize};

use crate::messages::Catalog;
use crate::validate::FieldError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exame {
    pub id: u64,

    pub nome: String,

    /// Catalog price in centavos. Client-specific overrides live in the
    /// exames-cli resource.
    pub valor: u64,

    pub organization_id: String,

    pub create_time: u64,

    pub update_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamePut {
    pub nome: String,

    pub valor: u64,

    #[serde(default)]
    pub organization_id: Option<String>,
}

impl ExamePut {
    pub fn validate(&self, messages: &Catalog) -> Vec<FieldError> {
        let mut errs = vec![];
        if self.nome.trim().is_empty() {
            errs.push(FieldError::new("nome", messages.get("exame.nome.required")));
        }
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
pub struct ExamePatch {
    pub nome: Option<String>,

    pub valor: Option<u64>,
}

impl ExamePatch {
    pub fn validate(&self, messages: &Catalog) -> Vec<FieldError> {
        let mut errs = vec![];
        if let Some(ref nome) = self.nome {
            if nome.trim().is_empty() {
                errs.push(FieldError::new("nome", messages.get("exame.nome.required")));
            }
        }
        if let Some(0) = self.valor {
            errs.push(FieldError::new(
                "valor",
                messages.get("common.valor.positive"),
            ));
        }
        errs
    }
}
