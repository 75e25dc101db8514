use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TokenConfig {
    #[serde(default = "TokenConfig::default_provider")]
    pub provider: TokenProvider,

    /// Path to the identity provider's RSA public key (PEM). Only used by
    /// the jwt provider.
    #[serde(default = "TokenConfig::default_public_key_path")]
    pub public_key_path: String,

    /// Expected `iss` claim. Only used by the jwt provider.
    #[serde(default = "TokenConfig::default_issuer")]
    pub issuer: String,

    /// Static token table. Only used by the static provider.
    #[serde(default = "TokenConfig::default_static_tokens")]
    pub static_tokens: Vec<StaticToken>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub enum TokenProvider {
    #[serde(rename = "jwt")]
    Jwt,
    #[serde(rename = "static")]
    Static,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StaticToken {
    pub token: String,

    pub principal: String,

    #[serde(default)]
    pub role: Option<String>,

    #[serde(default)]
    pub org: Option<String>,
}

impl CommonConfig for TokenConfig {
    fn default() -> Self {
        Self {
            provider: Self::default_provider(),
            public_key_path: Self::default_public_key_path(),
            issuer: Self::default_issuer(),
            static_tokens: Self::default_static_tokens(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        match self.provider {
            TokenProvider::Jwt => {
                self.public_key_path = expandenv("public_key_path", &self.public_key_path)?;
                if self.public_key_path.is_empty() {
                    let path = ps.pki_path.join("idp.pub.pem");
                    self.public_key_path = format!("{}", path.display());
                }
                if self.issuer.is_empty() {
                    bail!("issuer cannot be empty for jwt token provider");
                }
            }
            TokenProvider::Static => {
                for entry in self.static_tokens.iter() {
                    if entry.token.is_empty() {
                        bail!("static token cannot be empty");
                    }
                    if entry.principal.is_empty() {
                        bail!("static token principal cannot be empty");
                    }
                }
            }
        }
        Ok(())
    }
}

impl TokenConfig {
    fn default_provider() -> TokenProvider {
        TokenProvider::Jwt
    }

    fn default_public_key_path() -> String {
        String::new()
    }

    fn default_issuer() -> String {
        String::from("https://idp.example.com")
    }

    fn default_static_tokens() -> Vec<StaticToken> {
        vec![]
    }
}
