use std::collections::HashMap;

use anyhow::{bail, Result};

use super::config::StaticToken;
use super::{TokenClaims, TokenValidator};

/// A validator backed by a static token table from the config file.
///
/// Meant for tests and closed environments without an identity provider;
/// each configured token maps to one fixed principal.
pub struct SimpleTokenValidator {
    tokens: HashMap<String, TokenClaims>,
}

impl SimpleTokenValidator {
    pub fn new(entries: &[StaticToken]) -> Self {
        let tokens = entries
            .iter()
            .map(|entry| {
                (
                    entry.token.clone(),
                    TokenClaims {
                        subject: entry.principal.clone(),
                        role: entry.role.clone(),
                        org: entry.org.clone(),
                    },
                )
            })
            .collect();
        Self { tokens }
    }
}

impl TokenValidator for SimpleTokenValidator {
    fn validate_token(&self, token: &str) -> Result<TokenClaims> {
        match self.tokens.get(token) {
            Some(claims) => Ok(claims.clone()),
            None => bail!("unknown static token"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_validator() {
        let entries = vec![StaticToken {
            token: "tok-admin".to_string(),
            principal: "user_1".to_string(),
            role: Some("admin".to_string()),
            org: Some("org_1".to_string()),
        }];
        let validator = SimpleTokenValidator::new(&entries);

        let claims = validator.validate_token("tok-admin").unwrap();
        assert_eq!(claims.subject, "user_1");
        assert_eq!(claims.role.as_deref(), Some("admin"));
        assert_eq!(claims.org.as_deref(), Some("org_1"));

        assert!(validator.validate_token("other").is_err());
    }
}
