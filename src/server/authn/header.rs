use actix_web::HttpRequest;
use anyhow::Result;

use crate::types::role::Role;

use super::{Authenticator, AuthnResponse, Principal};

const PRINCIPAL_HEADER: &str = "X-Ocupacional-Principal";
const ROLE_HEADER: &str = "X-Ocupacional-Role";
const ORG_HEADER: &str = "X-Ocupacional-Org";

/// Authenticator that trusts identity headers set by a fronting proxy.
///
/// Disabled by default; only enabled explicitly in config for deployments
/// where a trusted gateway terminates authentication, or for local
/// development. Never expose a server with this enabled directly.
pub struct HeaderAuthenticator;

impl HeaderAuthenticator {
    pub fn new() -> Self {
        Self
    }
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    let value = req.headers().get(name)?.to_str().ok()?.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

impl Authenticator for HeaderAuthenticator {
    fn authenticate_request(
        &self,
        req: &HttpRequest,
        user: Option<Principal>,
    ) -> Result<AuthnResponse> {
        if let Some(user) = user {
            return Ok(AuthnResponse::Ok(user));
        }

        let id = match header_value(req, PRINCIPAL_HEADER) {
            Some(id) => id,
            None => return Ok(AuthnResponse::Continue),
        };
        let role = Role::resolve(header_value(req, ROLE_HEADER).as_deref());
        let org = header_value(req, ORG_HEADER);

        Ok(AuthnResponse::Ok(Principal { id, role, org }))
    }
}
