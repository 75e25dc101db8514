use anyhow::Result;
use log::info;

use super::config::{RegistryConfig, RegistryProvider};
use super::registry::{HttpRegistry, StaticRegistry, UnionRegistry};

pub struct RegistryFactory;

impl RegistryFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn build_registry(&self, cfg: &RegistryConfig) -> Result<UnionRegistry> {
        match cfg.provider {
            RegistryProvider::Static => {
                info!(
                    "Using static organization registry with {} entries",
                    cfg.orgs.len()
                );
                Ok(UnionRegistry::Static(StaticRegistry::new(cfg.orgs.clone())))
            }
            RegistryProvider::Http => {
                info!("Using http organization registry: {}", cfg.base_url);
                let token = if cfg.token.is_empty() {
                    None
                } else {
                    Some(cfg.token.clone())
                };
                Ok(UnionRegistry::Http(HttpRegistry::new(
                    cfg.base_url.clone(),
                    token,
                )))
            }
        }
    }
}
