use serde::{Deserialize, Serialize};

use crate::messages::Catalog;
use crate::validate::{self, FieldError};

/// A payable (conta a pagar) of the clinic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContaAPagar {
    pub id: u64,

    pub descricao: String,

    pub valor: u64,

    /// Due date, `YYYY-MM-DD`.
    pub vencimento: String,

    pub pago: bool,

    pub organization_id: String,

    pub create_time: u64,

    pub update_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContaPut {
    pub descricao: String,

    pub valor: u64,

    pub vencimento: String,

    #[serde(default)]
    pub pago: bool,

    #[serde(default)]
    pub organization_id: Option<String>,
}

impl ContaPut {
    pub fn validate(&self, messages: &Catalog) -> Vec<FieldError> {
        let mut errs = vec![];
        if self.descricao.trim().is_empty() {
            errs.push(FieldError::new(
                "descricao",
                messages.get("conta.descricao.required"),
            ));
        }
        if self.valor == 0 {
            errs.push(FieldError::new(
                "valor",
                messages.get("common.valor.positive"),
            ));
        }
        if !validate::is_valid_date(&self.vencimento) {
            errs.push(FieldError::new(
                "vencimento",
                messages.get("conta.vencimento.invalid"),
            ));
        }
        errs
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContaPatch {
    pub descricao: Option<String>,

    pub valor: Option<u64>,

    pub vencimento: Option<String>,

    pub pago: Option<bool>,
}

impl ContaPatch {
    pub fn validate(&self, messages: &Catalog) -> Vec<FieldError> {
        let mut errs = vec![];
        if let Some(ref descricao) = self.descricao {
            if descricao.trim().is_empty() {
                errs.push(FieldError::new(
                    "descricao",
                    messages.get("conta.descricao.required"),
                ));
            }
        }
        if let Some(0) = self.valor {
            errs.push(FieldError::new(
                "valor",
                messages.get("common.valor.positive"),
            ));
        }
        if let Some(ref vencimento) = self.vencimento {
            if !validate::is_valid_date(vencimento) {
                errs.push(FieldError::new(
                    "vencimento",
                    messages.get("conta.vencimento.invalid"),
                ));
            }
        }
        errs
    }
}
