use std::sync::Arc;

use log::error;

use crate::expect_json;
use crate::messages::Catalog;
use crate::server::ability::{Ability, Action, Subject, SubjectAttrs};
use crate::server::authn::Principal;
use crate::server::db::{Database, OrganizationRecord};
use crate::server::response::{self, Response};
use crate::types::org::{Organization, OrganizationPatch};
use crate::types::request::Query;
use crate::types::role::Role;

use super::ResourceHandler;

/// Organizations are mirrored from the identity provider by the sync and
/// never created or deleted through the API; only list/get/rename exist.
pub struct OrgsHandler {
    db: Arc<Database>,
    messages: Arc<Catalog>,
}

impl OrgsHandler {
    pub fn new(db: Arc<Database>, messages: Arc<Catalog>) -> Self {
        Self { db, messages }
    }
}

fn convert_org(record: OrganizationRecord) -> Organization {
    Organization {
        id: record.id,
        name: record.name,
        create_time: record.create_time,
        update_time: record.update_time,
    }
}

impl ResourceHandler for OrgsHandler {
    fn put(&self, _data: String, _principal: &Principal, _ability: &Ability) -> Response {
        Response::method_not_allowed()
    }

    fn patch(
        &self,
        id: String,
        data: String,
        _principal: &Principal,
        ability: &Ability,
    ) -> Response {
        let patch: OrganizationPatch = expect_json!(data);
        let errs = patch.validate(&self.messages);
        if !errs.is_empty() {
            return Response::invalid_input(errs);
        }
        let name = match patch.name {
            Some(name) => name,
            None => return Response::bad_request("Nothing to update"),
        };

        // The target id is known upfront, the constraint check needs no row
        let attrs = SubjectAttrs {
            organization_id: None,
            id: Some(&id),
        };
        if !ability.can_instance(Action::Update, Subject::Organization, &attrs) {
            return Response::not_found();
        }

        let result = self
            .db
            .with_transaction(|tx| tx.update_organization_name(&id, &name));
        match result {
            Ok(Some(record)) => Response::json(convert_org(record)),
            Ok(None) => Response::not_found(),
            Err(err) => {
                error!("Update organization database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }

    fn list(&self, _query: Query, principal: &Principal, _ability: &Ability) -> Response {
        // super_admin sees every organization; everyone else gets their own
        // organization as a single-element list.
        if principal.role == Role::SuperAdmin {
            let result = self.db.with_transaction(|tx| tx.list_organizations());
            return match result {
                Ok(records) => {
                    let orgs: Vec<_> = records.into_iter().map(convert_org).collect();
                    Response::json(orgs)
                }
                Err(err) => {
                    error!("List organizations database error: {err:#}");
                    Response::error(response::DATABASE_ERROR)
                }
            };
        }

        let org_id = match principal.org.as_deref() {
            Some(org_id) => org_id.to_string(),
            None => return Response::no_active_organization(),
        };
        match self.db.with_transaction(|tx| tx.get_organization(&org_id)) {
            Ok(Some(record)) => Response::json(vec![convert_org(record)]),
            Ok(None) => {
                // Not yet provisioned by the sync, nothing to show
                Response::json(Vec::<Organization>::new())
            }
            Err(err) => {
                error!("Get organization database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }

    fn get(&self, id: String, _principal: &Principal, ability: &Ability) -> Response {
        let attrs = SubjectAttrs {
            organization_id: None,
            id: Some(&id),
        };
        if !ability.can_instance(Action::Read, Subject::Organization, &attrs) {
            return Response::not_found();
        }

        match self.db.with_transaction(|tx| tx.get_organization(&id)) {
            Ok(Some(record)) => Response::json(convert_org(record)),
            Ok(None) => Response::not_found(),
            Err(err) => {
                error!("Get organization database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }

    fn delete(&self, _id: String, _principal: &Principal, _ability: &Ability) -> Response {
        Response::method_not_allowed()
    }
}
