use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// Canonical organization data held by the external registry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegistryOrg {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry answered and does not know this organization.
    #[error("organization '{0}' not found in registry")]
    NotFound(String),

    /// The registry could not be reached or returned garbage.
    #[error("organization registry unavailable: {0}")]
    Unavailable(String),
}

pub trait OrganizationRegistry: Send + Sync {
    fn fetch(&self, id: &str) -> Result<RegistryOrg, RegistryError>;
}

/// Registry backed by a fixed table from the config file. Used in tests
/// and in closed deployments without a reachable identity provider.
pub struct StaticRegistry {
    orgs: HashMap<String, String>,
}

impl StaticRegistry {
    pub fn new(orgs: HashMap<String, String>) -> Self {
        Self { orgs }
    }
}

impl OrganizationRegistry for StaticRegistry {
    fn fetch(&self, id: &str) -> Result<RegistryOrg, RegistryError> {
        match self.orgs.get(id) {
            Some(name) => Ok(RegistryOrg {
                id: id.to_string(),
                name: name.clone(),
            }),
            None => Err(RegistryError::NotFound(id.to_string())),
        }
    }
}

/// Registry backed by the identity provider's HTTP API.
///
/// Handlers run synchronously on actix worker threads, so a blocking
/// client is the right tool here; the lookup happens at most once per
/// organization lifetime plus cold-start reads.
pub struct HttpRegistry {
    base_url: String,
    token: Option<String>,
}

impl HttpRegistry {
    pub fn new(base_url: String, token: Option<String>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { base_url, token }
    }
}

impl OrganizationRegistry for HttpRegistry {
    fn fetch(&self, id: &str) -> Result<RegistryOrg, RegistryError> {
        let url = format!("{}/orgs/{id}", self.base_url);
        let mut request = ureq::get(&url);
        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let mut resp = match request.call() {
            Ok(resp) => resp,
            Err(ureq::Error::StatusCode(404)) => {
                return Err(RegistryError::NotFound(id.to_string()));
            }
            Err(e) => return Err(RegistryError::Unavailable(format!("{e}"))),
        };

        let org: RegistryOrg = resp
            .body_mut()
            .read_json()
            .map_err(|e| RegistryError::Unavailable(format!("decode registry response: {e}")))?;
        if org.id != id {
            return Err(RegistryError::Unavailable(format!(
                "registry returned organization '{}' for '{id}'",
                org.id
            )));
        }
        Ok(org)
    }
}

pub enum UnionRegistry {
    Static(StaticRegistry),
    Http(HttpRegistry),
}

impl OrganizationRegistry for UnionRegistry {
    fn fetch(&self, id: &str) -> Result<RegistryOrg, RegistryError> {
        match self {
            UnionRegistry::Static(registry) => registry.fetch(id),
            UnionRegistry::Http(registry) => registry.fetch(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_registry() {
        let mut orgs = HashMap::new();
        orgs.insert("org_1".to_string(), "Clínica Vida".to_string());
        let registry = StaticRegistry::new(orgs);

        let org = registry.fetch("org_1").unwrap();
        assert_eq!(org.name, "Clínica Vida");

        let err = registry.fetch("org_2").unwrap_err();
        assert!(matches!(err, RegistryError::NotFound(_)));
    }
}
