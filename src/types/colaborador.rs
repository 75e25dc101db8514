use serde::{Deserialize, Serialize};

use crate::messages::Catalog;
use crate::validate::{self, FieldError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Colaborador {
    pub id: u64,

    pub nome: String,

    /// Personal tax id, checksum-validated CPF.
    pub cpf: String,

    /// Birth date, `YYYY-MM-DD`.
    pub data_nascimento: String,

    /// Job title, e.g. "Soldador".
    pub funcao: String,

    /// Employer (client company) id.
    pub client_id: u64,

    pub organization_id: String,

    pub create_time: u64,

    pub update_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColaboradorPut {
    pub nome: String,

    pub cpf: String,

    pub data_nascimento: String,

    pub funcao: String,

    pub client_id: u64,

    #[serde(default)]
    pub organization_id: Option<String>,
}

impl ColaboradorPut {
    pub fn validate(&self, messages: &Catalog) -> Vec<FieldError> {
        let mut errs = vec![];
        if self.nome.trim().is_empty() {
            errs.push(FieldError::new(
                "nome",
                messages.get("colaborador.nome.required"),
            ));
        }
        if !validate::is_valid_cpf(&self.cpf) {
            errs.push(FieldError::new(
                "cpf",
                messages.get("colaborador.cpf.invalid"),
            ));
        }
        if !validate::is_valid_date(&self.data_nascimento) {
            errs.push(FieldError::new(
                "dataNascimento",
                messages.get("colaborador.data_nascimento.invalid"),
            ));
        }
        if self.funcao.trim().is_empty() {
            errs.push(FieldError::new(
                "funcao",
                messages.get("colaborador.funcao.required"),
            ));
        }
        errs
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColaboradorPatch {
    pub nome: Option<String>,

    pub cpf: Option<String>,

    pub data_nascimento: Option<String>,

    pub funcao: Option<String>,

    pub client_id: Option<u64>,
}

impl ColaboradorPatch {
    pub fn validate(&self, messages: &Catalog) -> Vec<FieldError> {
        let mut errs = vec![];
        if let Some(ref nome) = self.nome {
            if nome.trim().is_empty() {
                errs.push(FieldError::new(
                    "nome",
                    messages.get("colaborador.nome.required"),
                ));
            }
        }
        if let Some(ref cpf) = self.cpf {
            if !validate::is_valid_cpf(cpf) {
                errs.push(FieldError::new(
                    "cpf",
                    messages.get("colaborador.cpf.invalid"),
                ));
            }
        }
        if let Some(ref data) = self.data_nascimento {
            if !validate::is_valid_date(data) {
                errs.push(FieldError::new(
                    "dataNascimento",
                    messages.get("colaborador.data_nascimento.invalid"),
                ));
            }
        }
        if let Some(ref funcao) = self.funcao {
            if funcao.trim().is_empty() {
                errs.push(FieldError::new(
                    "funcao",
                    messages.get("colaborador.funcao.required"),
                ));
            }
        }
        errs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_validate() {
        let messages = Catalog::default();
        let put = ColaboradorPut {
            nome: "Maria Souza".to_string(),
            cpf: "52998224725".to_string(),
            data_nascimento: "1990-05-17".to_string(),
            funcao: "Soldadora".to_string(),
            client_id: 1,
            organization_id: None,
        };
        assert!(put.validate(&messages).is_empty());

        let bad = ColaboradorPut {
            cpf: "52998224724".to_string(),
            data_nascimento: "17/05/1990".to_string(),
            ..put
        };
        let errs = bad.validate(&messages);
        assert_eq!(errs.len(), 2);
        assert_eq!(errs[0].field, "cpf");
        assert_eq!(errs[1].field, "dataNascimento");
    }
}
