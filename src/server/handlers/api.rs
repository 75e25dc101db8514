use std::sync::Arc;

use actix_web::HttpRequest;
use log::error;

use crate::messages::Catalog;
use crate::server::ability::{build_ability, Action, Subject};
use crate::server::authn::chain::ChainAuthenticator;
use crate::server::authn::token::factory::UnionTokenValidator;
use crate::server::authn::{Authenticator, AuthnResponse, Principal};
use crate::server::db::Database;
use crate::server::orgsync::OrgSync;
use crate::server::response::{self, Response};
use crate::types::principal::{CaniResponse, WhoamiResponse};
use crate::types::request::{Query, ResourceRequest};
use crate::types::role::Role;

use super::resources::dispatch::Dispatcher;
use super::Handler;

pub struct ApiHandler {
    authn: ChainAuthenticator<UnionTokenValidator>,
    orgsync: Arc<OrgSync>,

    dispatcher: Dispatcher,
}

impl ApiHandler {
    pub fn new(
        authn: ChainAuthenticator<UnionTokenValidator>,
        orgsync: Arc<OrgSync>,
        db: Arc<Database>,
        messages: Arc<Catalog>,
    ) -> Self {
        Self {
            authn,
            orgsync,
            dispatcher: Dispatcher::new(db, messages),
        }
    }

    fn split_api_path(path: &str) -> Result<(String, Option<String>), &'static str> {
        // Remove trailing slash if present
        let path = path.trim_end_matches('/');

        // Split path into parts
        let parts: Vec<&str> = path.split('/').collect();

        match parts.as_slice() {
            [] => Err("empty path"),
            [""] => Err("empty resource"),
            [resource] => Ok((resource.to_string(), None)),
            [resource, id] => Ok((resource.to_string(), Some(id.to_string()))),
            _ => Err("invalid path format"),
        }
    }

    fn handle_whoami(&self, principal: Principal) -> Response {
        Response::json(WhoamiResponse {
            principal: principal.id,
            role: principal.role,
            organization_id: principal.org,
        })
    }

    fn handle_cani(&self, path: &str, principal: &Principal) -> Response {
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() != 2 {
            return Response::bad_request("Invalid path format");
        }

        let action = match Action::from_verb(parts[0]) {
            Some(action) => action,
            None => return Response::bad_request("Invalid action"),
        };
        let subject = match Subject::from_resource(parts[1]) {
            Some(subject) => subject,
            None => return Response::bad_request("Invalid resource"),
        };

        let ability = build_ability(principal.role, principal.org.as_deref());
        let allow = ability.can(action, subject);

        Response::json(CaniResponse { allow })
    }
}

impl Handler for ApiHandler {
    fn handle(&self, path: &str, req: HttpRequest, body: Option<Vec<u8>>) -> Response {
        let method = req.method().as_str().to_lowercase();
        let authn_resp = match self.authn.authenticate_request(&req, None) {
            Ok(resp) => resp,
            Err(e) => {
                error!("Authentication failed: {e:#}");
                return Response::error(response::AUTHN_ERROR);
            }
        };
        let principal = match authn_resp {
            AuthnResponse::Ok(principal) => principal,
            _ => return Response::unauthenticated("Invalid token"),
        };

        if let Some(rest) = path.strip_prefix("cani") {
            if method != "get" {
                return Response::method_not_allowed();
            }
            return self.handle_cani(rest.trim_matches('/'), &principal);
        }

        let (resource, id) = match Self::split_api_path(path) {
            Ok((resource, id)) => (resource, id),
            Err(msg) => return Response::bad_request(msg),
        };

        if resource == "whoami" {
            if id.is_some() {
                return Response::bad_request("whoami does not take an id");
            }
            if method != "get" {
                return Response::method_not_allowed();
            }
            return self.handle_whoami(principal);
        }

        let subject = match Subject::from_resource(&resource) {
            Some(subject) => subject,
            None => return Response::not_found(),
        };

        let body = match body {
            Some(data) => match String::from_utf8(data) {
                Ok(json) => Some(json),
                Err(_) => return Response::bad_request("Invalid JSON encoding"),
            },
            None => None,
        };

        let rsc_req = match method.as_str() {
            "put" => match body {
                Some(json) => ResourceRequest::Put(json),
                None => return Response::bad_request("Request body is empty or too large"),
            },
            "patch" => {
                let id = match id {
                    Some(id) => id,
                    None => return Response::bad_request("Resource id is required"),
                };
                match body {
                    Some(json) => ResourceRequest::Patch(id, json),
                    None => return Response::bad_request("Request body is empty or too large"),
                }
            }
            "get" => match id {
                Some(id) => ResourceRequest::Get(id),
                None => match body {
                    Some(json) => {
                        let query: Query = match serde_json::from_str(&json) {
                            Ok(query) => query,
                            Err(_) => return Response::bad_request("Invalid query json"),
                        };
                        ResourceRequest::List(query)
                    }
                    None => ResourceRequest::List(Query::default()),
                },
            },
            "delete" => {
                let id = match id {
                    Some(id) => id,
                    None => return Response::bad_request("Resource id is required"),
                };
                ResourceRequest::Delete(id)
            }
            _ => return Response::method_not_allowed(),
        };

        // Every operation runs within an active organization; only
        // super_admin operates without one.
        if principal.role != Role::SuperAdmin && principal.org.is_none() {
            return Response::no_active_organization();
        }

        let action = match Action::from_verb(rsc_req.verb()) {
            Some(action) => action,
            None => return Response::method_not_allowed(),
        };

        // Phase one: type-level check before touching any data. The ability
        // is rebuilt for every request, never cached.
        let ability = build_ability(principal.role, principal.org.as_deref());
        if !ability.can(action, subject) {
            return Response::forbidden();
        }

        // Lazily mirror the active organization before writing on its behalf
        if rsc_req.is_write() {
            if let Some(org) = principal.org.as_deref() {
                if let Err(e) = self.orgsync.ensure_exists(org) {
                    error!("Organization sync failed: {e:#}");
                    return Response::error(response::ORG_SYNC_ERROR);
                }
            }
        }

        self.dispatcher.dispatch(rsc_req, &resource, &principal, &ability)
    }
}
