use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Message catalog for user-facing texts, looked up by dotted key
/// (e.g. `"client.razao_social.required"`).
///
/// Unknown keys resolve to the key itself, so a missing or partial catalog
/// never breaks a response, it only degrades the wording.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        match self.entries.get(key) {
            Some(text) => text.as_str(),
            None => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        let mut entries = HashMap::new();
        entries.insert(
            "client.razao_social.required".to_string(),
            "Razão social é obrigatória".to_string(),
        );
        let catalog = Catalog::new(entries);

        assert_eq!(
            catalog.get("client.razao_social.required"),
            "Razão social é obrigatória"
        );

        // Unknown keys fall back to the key itself
        assert_eq!(catalog.get("client.cpf.invalid"), "client.cpf.invalid");
        assert_eq!(Catalog::default().get("anything"), "anything");
    }
}
