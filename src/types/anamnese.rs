use serde::{Deserialize, Serialize};

use crate::messages::Catalog;
use crate::validate::FieldError;

/// Kind of occupational exam order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnamneseTipo {
    Admissional,
    Periodico,
    Demissional,
    RetornoAoTrabalho,
    MudancaDeFuncao,
}

impl AnamneseTipo {
    pub fn as_str(self) -> &'static str {
        match self {
            AnamneseTipo::Admissional => "admissional",
            AnamneseTipo::Periodico => "periodico",
            AnamneseTipo::Demissional => "demissional",
            AnamneseTipo::RetornoAoTrabalho => "retorno_ao_trabalho",
            AnamneseTipo::MudancaDeFuncao => "mudanca_de_funcao",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admissional" => Some(AnamneseTipo::Admissional),
            "periodico" => Some(AnamneseTipo::Periodico),
            "demissional" => Some(AnamneseTipo::Demissional),
            "retorno_ao_trabalho" => Some(AnamneseTipo::RetornoAoTrabalho),
            "mudanca_de_funcao" => Some(AnamneseTipo::MudancaDeFuncao),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnamneseStatus {
    Pendente,
    Concluida,
}

impl AnamneseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AnamneseStatus::Pendente => "pendente",
            AnamneseStatus::Concluida => "concluida",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pendente" => Some(AnamneseStatus::Pendente),
            "concluida" => Some(AnamneseStatus::Concluida),
            _ => None,
        }
    }
}

/// An exam order for a colaborador, with the exams to perform and their
/// prices snapshotted at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anamnese {
    pub id: u64,

    pub colaborador_id: u64,

    pub medico_id: u64,

    pub tipo: AnamneseTipo,

    pub status: AnamneseStatus,

    #[serde(default)]
    pub items: Vec<AnamneseItem>,

    pub organization_id: String,

    pub create_time: u64,

    pub update_time: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnamneseItem {
    pub id: u64,

    pub exame_id: u64,

    /// Price in centavos, resolved when the order was created: the
    /// client-specific price when one exists, the catalog price otherwise.
    pub valor: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnamnesePut {
    pub colaborador_id: u64,

    pub medico_id: u64,

    pub tipo: AnamneseTipo,

    /// Exam ids to order. Prices are resolved server-side.
    pub exames: Vec<u64>,

    #[serde(default)]
    pub organization_id: Option<String>,
}

impl AnamnesePut {
    pub fn validate(&self, messages: &Catalog) -> Vec<FieldError> {
        let mut errs = vec![];
        if self.exames.is_empty() {
            errs.push(FieldError::new(
                "exames",
                messages.get("anamnese.exames.required"),
            ));
        }
        errs
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnamnesePatch {
    pub medico_id: Option<u64>,

    pub status: Option<AnamneseStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tipo_roundtrip() {
        for tipo in [
            AnamneseTipo::Admissional,
            AnamneseTipo::Periodico,
            AnamneseTipo::Demissional,
            AnamneseTipo::RetornoAoTrabalho,
            AnamneseTipo::MudancaDeFuncao,
        ] {
            assert_eq!(AnamneseTipo::parse(tipo.as_str()), Some(tipo));
        }
        assert_eq!(AnamneseTipo::parse("ocasional"), None);
    }

    #[test]
    fn test_tipo_json_names() {
        let tipo: AnamneseTipo = serde_json::from_str("\"retorno_ao_trabalho\"").unwrap();
        assert_eq!(tipo, AnamneseTipo::RetornoAoTrabalho);
        assert!(serde_json::from_str::<AnamneseTipo>("\"outro\"").is_err());
    }
}
