use std::fs;

use anyhow::{Context, Result};

use super::config::{TokenConfig, TokenProvider};
use super::jwt::JwtTokenValidator;
use super::simple::SimpleTokenValidator;
use super::{TokenClaims, TokenValidator};

pub enum UnionTokenValidator {
    Jwt(JwtTokenValidator),
    Simple(SimpleTokenValidator),
}

impl TokenValidator for UnionTokenValidator {
    fn validate_token(&self, token: &str) -> Result<TokenClaims> {
        match self {
            UnionTokenValidator::Jwt(validator) => validator.validate_token(token),
            UnionTokenValidator::Simple(validator) => validator.validate_token(token),
        }
    }
}

pub struct TokenFactory;

impl TokenFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn build_token_validator(&self, cfg: &TokenConfig) -> Result<UnionTokenValidator> {
        match cfg.provider {
            TokenProvider::Jwt => {
                let public_key = fs::read(&cfg.public_key_path).with_context(|| {
                    format!("read identity provider public key: {}", cfg.public_key_path)
                })?;
                let validator = JwtTokenValidator::new(&public_key, cfg.issuer.clone())?;
                Ok(UnionTokenValidator::Jwt(validator))
            }
            TokenProvider::Static => {
                let validator = SimpleTokenValidator::new(&cfg.static_tokens);
                Ok(UnionTokenValidator::Simple(validator))
            }
        }
    }
}
