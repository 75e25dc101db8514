pub mod config;
pub mod factory;
pub mod jwt;
pub mod simple;

use anyhow::Result;

/// Claims extracted from a verified token. Role and organization are taken
/// as-is from the identity provider; resolution to a canonical role happens
/// in the authenticator.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    pub subject: String,
    pub role: Option<String>,
    pub org: Option<String>,
}

pub trait TokenValidator {
    fn validate_token(&self, token: &str) -> Result<TokenClaims>;
}
