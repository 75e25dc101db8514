use actix_web::HttpRequest;
use anyhow::{bail, Result};

use crate::types::role::Role;

use super::token::TokenValidator;
use super::{Authenticator, AuthnResponse, Principal};

pub struct BearerTokenAuthenticator<T: TokenValidator> {
    validator: T,
}

impl<T: TokenValidator> BearerTokenAuthenticator<T> {
    pub fn new(validator: T) -> Self {
        Self { validator }
    }
}

impl<T: TokenValidator + Sync + Send> Authenticator for BearerTokenAuthenticator<T> {
    fn authenticate_request(
        &self,
        req: &HttpRequest,
        _user: Option<Principal>,
    ) -> Result<AuthnResponse> {
        let auth = match req.headers().get("Authorization") {
            Some(auth) => match auth.to_str() {
                Ok(auth) => auth.trim().to_string(),
                Err(_) => return Ok(AuthnResponse::Continue),
            },
            None => return Ok(AuthnResponse::Continue),
        };

        if auth.is_empty() {
            return Ok(AuthnResponse::Continue);
        }

        let mut iter = auth.split_whitespace();
        let bearer = match iter.next() {
            Some(bearer) => bearer,
            None => return Ok(AuthnResponse::Unauthenticated),
        };
        if bearer.to_lowercase() != "bearer" {
            return Ok(AuthnResponse::Unauthenticated);
        }

        let token = match iter.next() {
            Some(token) => token,
            None => return Ok(AuthnResponse::Unauthenticated),
        };
        if token.is_empty() {
            return Ok(AuthnResponse::Unauthenticated);
        }

        let claims = match self.validator.validate_token(token) {
            Ok(claims) => claims,
            Err(_) => return Ok(AuthnResponse::Unauthenticated),
        };
        if claims.subject.is_empty() {
            bail!("empty principal identifier in token");
        }

        // The role claim may be absent or unrecognized, resolution is total
        // and degrades to viewer.
        let role = Role::resolve(claims.role.as_deref());

        Ok(AuthnResponse::Ok(Principal {
            id: claims.subject,
            role,
            org: claims.org,
        }))
    }
}
