use anyhow::Result;
use log::warn;

use super::bearer_token::BearerTokenAuthenticator;
use super::chain::ChainAuthenticator;
use super::config::AuthnConfig;
use super::header::HeaderAuthenticator;
use super::token::factory::{TokenFactory, UnionTokenValidator};
use super::union::UnionAuthenticator;

/// Factory for building authentication chains based on configuration.
///
/// The chain always starts with bearer-token authentication against the
/// identity provider; header authentication is appended only when
/// explicitly enabled.
pub struct AuthnFactory;

impl AuthnFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn build_authenticator(
        &self,
        cfg: &AuthnConfig,
        token_factory: &TokenFactory,
    ) -> Result<ChainAuthenticator<UnionTokenValidator>> {
        let mut authenticators = Vec::new();

        let validator = token_factory.build_token_validator(&cfg.token)?;
        let token_auth = BearerTokenAuthenticator::new(validator);
        authenticators.push(UnionAuthenticator::BearerToken(token_auth));

        if cfg.allow_header_auth {
            warn!("Header authentication is enabled, identity headers are trusted as-is. DO NOT expose this server directly");
            authenticators.push(UnionAuthenticator::Header(HeaderAuthenticator::new()));
        }

        let chain = ChainAuthenticator::new(authenticators);
        Ok(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CommonConfig;
    use crate::server::authn::config::AuthnConfig;
    use crate::server::authn::token::config::TokenProvider;

    fn get_chain_length(chain: &ChainAuthenticator<UnionTokenValidator>) -> usize {
        chain.authenticators.len()
    }

    fn is_header_enabled(chain: &ChainAuthenticator<UnionTokenValidator>) -> bool {
        chain
            .authenticators
            .iter()
            .any(|auth| matches!(auth, UnionAuthenticator::Header(_)))
    }

    #[test]
    fn test_factory() {
        let factory = AuthnFactory::new();
        let token_factory = TokenFactory::new();

        // Default config: bearer only, header authn stays off
        let mut cfg = AuthnConfig::default();
        cfg.token.provider = TokenProvider::Static;
        let chain = factory.build_authenticator(&cfg, &token_factory).unwrap();
        assert_eq!(get_chain_length(&chain), 1);
        assert!(!is_header_enabled(&chain));

        // Header authn must be opted into
        cfg.allow_header_auth = true;
        let chain = factory.build_authenticator(&cfg, &token_factory).unwrap();
        assert_eq!(get_chain_length(&chain), 2);
        assert!(is_header_enabled(&chain));
    }
}
