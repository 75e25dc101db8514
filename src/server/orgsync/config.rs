use std::collections::HashMap;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RegistryConfig {
    #[serde(default = "RegistryConfig::default_provider")]
    pub provider: RegistryProvider,

    /// Organization table for the static provider: external id -> name.
    #[serde(default = "RegistryConfig::default_orgs")]
    pub orgs: HashMap<String, String>,

    /// Base URL of the identity provider's organization API, for the http
    /// provider.
    #[serde(default = "RegistryConfig::default_base_url")]
    pub base_url: String,

    /// Optional bearer token for the http provider.
    #[serde(default = "RegistryConfig::default_token")]
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub enum RegistryProvider {
    #[serde(rename = "static")]
    Static,
    #[serde(rename = "http")]
    Http,
}

impl CommonConfig for RegistryConfig {
    fn default() -> Self {
        Self {
            provider: Self::default_provider(),
            orgs: Self::default_orgs(),
            base_url: Self::default_base_url(),
            token: Self::default_token(),
        }
    }

    fn complete(&mut self, _ps: &PathSet) -> Result<()> {
        match self.provider {
            RegistryProvider::Static => {}
            RegistryProvider::Http => {
                self.base_url = expandenv("base_url", &self.base_url)?;
                if self.base_url.is_empty() {
                    bail!("base_url cannot be empty for http registry provider");
                }
                self.token = expandenv("token", &self.token)?;
            }
        }
        Ok(())
    }
}

impl RegistryConfig {
    fn default_provider() -> RegistryProvider {
        RegistryProvider::Static
    }

    fn default_orgs() -> HashMap<String, String> {
        HashMap::new()
    }

    fn default_base_url() -> String {
        String::new()
    }

    fn default_token() -> String {
        String::new()
    }
}
