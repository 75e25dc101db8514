mod bearer_token;
mod header;

pub mod chain;
pub mod config;
pub mod factory;
pub mod token;
pub mod union;

use actix_web::HttpRequest;
use anyhow::Result;

use crate::types::request::Query;
use crate::types::role::Role;

pub trait Authenticator: Send + Sync {
    fn authenticate_request(
        &self,
        req: &HttpRequest,
        user: Option<Principal>,
    ) -> Result<AuthnResponse>;
}

/// Possible responses from an authentication check.
#[derive(Debug, Clone)]
pub enum AuthnResponse {
    /// The request is authenticated as this principal
    Ok(Principal),
    /// Defers decision to next authenticator in chain
    Continue,
    /// The request carried credentials that did not verify
    Unauthenticated,
}

/// The authenticated actor making a request, as asserted by the external
/// identity provider: opaque principal id, resolved role and the active
/// organization (absent for principals without a tenant, which only
/// super_admin may be).
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub id: String,
    pub role: Role,
    pub org: Option<String>,
}

impl Principal {
    /// Organization scope applied to every data access: `None` means
    /// unscoped and is reserved for super_admin.
    pub fn org_scope(&self) -> Option<&str> {
        if self.role == Role::SuperAdmin {
            None
        } else {
            self.org.as_deref()
        }
    }

    /// Forces the list query to the principal's organization. The scope is
    /// never taken from the request payload.
    pub fn set_query_org(&self, query: &mut Query) {
        query.org = self.org_scope().map(String::from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_scope() {
        let admin = Principal {
            id: "u1".to_string(),
            role: Role::Admin,
            org: Some("org_1".to_string()),
        };
        assert_eq!(admin.org_scope(), Some("org_1"));

        let root = Principal {
            id: "u2".to_string(),
            role: Role::SuperAdmin,
            org: Some("org_1".to_string()),
        };
        assert_eq!(root.org_scope(), None);

        let mut query = Query {
            org: Some("org_2".to_string()),
            ..Default::default()
        };
        admin.set_query_org(&mut query);
        assert_eq!(query.org.as_deref(), Some("org_1"));

        root.set_query_org(&mut query);
        assert_eq!(query.org, None);
    }
}
