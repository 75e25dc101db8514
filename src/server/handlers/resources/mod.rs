mod anamneses;
mod clients;
mod colaboradores;
mod contas;
mod exames;
mod exames_cli;
mod medicos;
mod orgs;
mod union;

pub mod dispatch;

use crate::messages::Catalog;
use crate::server::ability::Ability;
use crate::server::authn::Principal;
use crate::server::response::Response;
use crate::types::request::Query;
use crate::types::role::Role;
use crate::validate::FieldError;

/// One handler per entity. Every method receives the authenticated
/// principal and the ability computed for this request; type-level checks
/// already happened upstream, handlers perform the row-level phase.
pub trait ResourceHandler: Send + Sync {
    fn put(&self, data: String, principal: &Principal, ability: &Ability) -> Response;
    fn patch(&self, id: String, data: String, principal: &Principal, ability: &Ability)
        -> Response;
    fn list(&self, query: Query, principal: &Principal, ability: &Ability) -> Response;
    fn get(&self, id: String, principal: &Principal, ability: &Ability) -> Response;
    fn delete(&self, id: String, principal: &Principal, ability: &Ability) -> Response;
}

#[macro_export]
macro_rules! expect_json {
    ($data:expr) => {
        match serde_json::from_str(&$data) {
            Ok(obj) => obj,
            Err(_) => {
                return $crate::server::response::Response::bad_request("Invalid json payload");
            }
        }
    };
}

pub(crate) fn parse_id(id: &str) -> Option<u64> {
    id.parse().ok()
}

/// Resolves the organization a new row belongs to. Regular principals
/// always write into their active organization; only super_admin may name
/// a target organization in the payload (it has no active one to fall
/// back on when operating cross-tenant).
pub(crate) fn target_org(
    principal: &Principal,
    payload_org: Option<&str>,
    messages: &Catalog,
) -> Result<String, Response> {
    if principal.role == Role::SuperAdmin {
        if let Some(org) = payload_org {
            return Ok(org.to_string());
        }
        if let Some(org) = principal.org.as_deref() {
            return Ok(org.to_string());
        }
        return Err(Response::invalid_input(vec![FieldError::new(
            "organizationId",
            messages.get("common.organization_id.required"),
        )]));
    }

    match principal.org.as_deref() {
        Some(org) => Ok(org.to_string()),
        None => Err(Response::no_active_organization()),
    }
}
