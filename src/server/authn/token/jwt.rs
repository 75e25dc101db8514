use anyhow::{bail, Result};
use chrono::Local;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use super::{TokenClaims, TokenValidator};

/// Claims represents public claim values (as specified in RFC 7519), plus
/// the private `role` and `org` claims the identity provider attaches.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    pub aud: Option<String>, // Optional. The intended recipient of the token
    pub exp: usize,          // Required. Token expiration time (timestamp)
    pub iat: usize,          // Optional. Time at which token was issued (timestamp)
    pub iss: String,         // Optional. Token issuer
    pub nbf: usize,          // Optional. Time before which token must not be accepted (timestamp)
    pub sub: String,         // Optional. Subject of the token (principal identifier)

    pub role: Option<String>, // Private. Role claim, resolved later
    pub org: Option<String>,  // Private. Active organization id
}

pub struct JwtTokenValidator {
    key: DecodingKey,
    issuer: String,
}

impl JwtTokenValidator {
    pub fn new(public_key: &[u8], issuer: String) -> Result<Self> {
        let key = match DecodingKey::from_rsa_pem(public_key) {
            Ok(key) => key,
            Err(e) => bail!("parse RSA public key for jwt token validation failed: {e}"),
        };
        Ok(Self { key, issuer })
    }
}

impl TokenValidator for JwtTokenValidator {
    fn validate_token(&self, token: &str) -> Result<TokenClaims> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]); // Validate issuer
        validation.set_required_spec_claims(&["exp", "iat", "iss", "nbf", "sub"]);

        // Verify token signature and decode
        let claims = match decode::<Claims>(token, &self.key, &validation) {
            Ok(data) => data.claims,
            Err(e) => bail!("validate jwt token failed: {e}"),
        };

        // Verify subject is not empty
        if claims.sub.is_empty() {
            bail!("validate jwt token failed: empty subject");
        }

        let now = Local::now().timestamp() as usize;
        if now >= claims.exp {
            bail!("validate jwt token failed: token expired");
        }

        if now < claims.nbf {
            bail!("validate jwt token failed: token not yet valid");
        }

        Ok(TokenClaims {
            subject: claims.sub,
            role: claims.role,
            org: claims.org,
        })
    }
}
