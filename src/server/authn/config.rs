use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::{CommonConfig, PathSet};

use super::token::config::TokenConfig;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthnConfig {
    /// Trust identity headers from a fronting proxy. Dangerous, keep
    /// disabled unless the server is only reachable through a trusted
    /// gateway.
    #[serde(default = "AuthnConfig::default_allow_header_auth")]
    pub allow_header_auth: bool,

    #[serde(default = "TokenConfig::default")]
    pub token: TokenConfig,
}

impl CommonConfig for AuthnConfig {
    fn default() -> Self {
        Self {
            allow_header_auth: Self::default_allow_header_auth(),
            token: TokenConfig::default(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        self.token.complete(ps)?;
        Ok(())
    }
}

impl AuthnConfig {
    pub fn default_allow_header_auth() -> bool {
        false
    }
}
