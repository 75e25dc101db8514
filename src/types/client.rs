use serde::{Deserialize, Serialize};

use crate::messages::Catalog;
use crate::validate::{self, FieldError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: u64,

    pub razao_social: String,

    /// National tax id, digits only: 11 (CPF) or 14 (CNPJ).
    pub cpf: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub endereco: Option<String>,

    pub organization_id: String,

    pub create_time: u64,

    pub update_time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPut {
    pub razao_social: String,

    pub cpf: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub telefone: Option<String>,

    #[serde(default)]
    pub endereco: Option<String>,

    /// Target organization for the new row. Honored only for super_admin
    /// principals; everyone else writes into their active organization.
    #[serde(default)]
    pub organization_id: Option<String>,
}

impl ClientPut {
    pub fn validate(&self, messages: &Catalog) -> Vec<FieldError> {
        let mut errs = vec![];
        if self.razao_social.trim().is_empty() {
            errs.push(FieldError::new(
                "razaoSocial",
                messages.get("client.razao_social.required"),
            ));
        }
        if !validate::is_tax_id(&self.cpf) {
            errs.push(FieldError::new("cpf", messages.get("client.cpf.invalid")));
        }
        errs
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    pub razao_social: Option<String>,

    pub cpf: Option<String>,

    pub email: Option<String>,

    pub telefone: Option<String>,

    pub endereco: Option<String>,
}

impl ClientPatch {
    pub fn validate(&self, messages: &Catalog) -> Vec<FieldError> {
        let mut errs = vec![];
        if let Some(ref razao_social) = self.razao_social {
            if razao_social.trim().is_empty() {
                errs.push(FieldError::new(
                    "razaoSocial",
                    messages.get("client.razao_social.required"),
                ));
            }
        }
        if let Some(ref cpf) = self.cpf {
            if !validate::is_tax_id(cpf) {
                errs.push(FieldError::new("cpf", messages.get("client.cpf.invalid")));
            }
        }
        errs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(razao_social: &str, cpf: &str) -> ClientPut {
        ClientPut {
            razao_social: razao_social.to_string(),
            cpf: cpf.to_string(),
            email: None,
            telefone: None,
            endereco: None,
            organization_id: None,
        }
    }

    #[test]
    fn test_put_validate() {
        let messages = Catalog::default();

        assert!(put("Acme Ltda", "12345678000190")
            .validate(&messages)
            .is_empty());
        assert!(put("Acme Ltda", "52998224725").validate(&messages).is_empty());

        let errs = put("", "123").validate(&messages);
        assert_eq!(errs.len(), 2);
        assert_eq!(errs[0].field, "razaoSocial");
        assert_eq!(errs[1].field, "cpf");
    }

    #[test]
    fn test_patch_validate() {
        let messages = Catalog::default();

        assert!(ClientPatch::default().validate(&messages).is_empty());

        let patch = ClientPatch {
            cpf: Some("not-a-tax-id".to_string()),
            ..Default::default()
        };
        let errs = patch.validate(&messages);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].field, "cpf");
    }
}
