use actix_web::HttpRequest;
use anyhow::Result;

use super::bearer_token::BearerTokenAuthenticator;
use super::header::HeaderAuthenticator;
use super::token::TokenValidator;
use super::{Authenticator, AuthnResponse, Principal};

pub enum UnionAuthenticator<T: TokenValidator> {
    BearerToken(BearerTokenAuthenticator<T>),
    Header(HeaderAuthenticator),
}

impl<T: TokenValidator + Sync + Send> Authenticator for UnionAuthenticator<T> {
    fn authenticate_request(
        &self,
        req: &HttpRequest,
        user: Option<Principal>,
    ) -> Result<AuthnResponse> {
        match self {
            UnionAuthenticator::BearerToken(auth) => auth.authenticate_request(req, user),
            UnionAuthenticator::Header(auth) => auth.authenticate_request(req, user),
        }
    }
}
