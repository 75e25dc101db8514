use std::sync::Arc;

use log::error;

use crate::expect_json;
use crate::messages::Catalog;
use crate::server::ability::{Ability, Action, Subject, SubjectAttrs};
use crate::server::authn::Principal;
use crate::server::db::{ClientRecord, Database};
use crate::server::response::{self, Response};
use crate::types::client::{Client, ClientPatch, ClientPut};
use crate::types::request::Query;
use crate::types::response::PageResponse;

use super::{parse_id, target_org, ResourceHandler};

pub struct ClientsHandler {
    db: Arc<Database>,
    messages: Arc<Catalog>,
}

impl ClientsHandler {
    pub fn new(db: Arc<Database>, messages: Arc<Catalog>) -> Self {
        Self { db, messages }
    }
}

fn convert_client(record: ClientRecord) -> Client {
    Client {
        id: record.id,
        razao_social: record.razao_social,
        cpf: record.cpf,
        email: record.email,
        telefone: record.telefone,
        endereco: record.endereco,
        organization_id: record.organization_id,
        create_time: record.create_time,
        update_time: record.update_time,
    }
}

impl ResourceHandler for ClientsHandler {
    fn put(&self, data: String, principal: &Principal, _ability: &Ability) -> Response {
        let payload: ClientPut = expect_json!(data);
        let errs = payload.validate(&self.messages);
        if !errs.is_empty() {
            return Response::invalid_input(errs);
        }

        let org = match target_org(principal, payload.organization_id.as_deref(), &self.messages) {
            Ok(org) => org,
            Err(resp) => return resp,
        };

        let record = ClientRecord {
            id: 0,
            razao_social: payload.razao_social,
            cpf: payload.cpf,
            email: payload.email,
            telefone: payload.telefone,
            endereco: payload.endereco,
            organization_id: org,
            create_time: 0,
            update_time: 0,
        };

        match self.db.with_transaction(|tx| tx.create_client(record)) {
            Ok(record) => Response::json(convert_client(record)),
            Err(err) => {
                error!("Create client database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }

    fn patch(
        &self,
        id: String,
        data: String,
        principal: &Principal,
        ability: &Ability,
    ) -> Response {
        let id = match parse_id(&id) {
            Some(id) => id,
            None => return Response::bad_request("Invalid resource id"),
        };
        let patch: ClientPatch = expect_json!(data);
        let errs = patch.validate(&self.messages);
        if !errs.is_empty() {
            return Response::invalid_input(errs);
        }

        let scope = principal.org_scope();
        let result = self.db.with_transaction(|tx| {
            let mut record = match tx.get_client(id, scope)? {
                Some(record) => record,
                None => return Ok(None),
            };
            let attrs = SubjectAttrs {
                organization_id: Some(&record.organization_id),
                id: None,
            };
            if !ability.can_instance(Action::Update, Subject::Client, &attrs) {
                return Ok(None);
            }

            if let Some(razao_social) = patch.razao_social {
                record.razao_social = razao_social;
            }
            if let Some(cpf) = patch.cpf {
                record.cpf = cpf;
            }
            if let Some(email) = patch.email {
                record.email = Some(email);
            }
            if let Some(telefone) = patch.telefone {
                record.telefone = Some(telefone);
            }
            if let Some(endereco) = patch.endereco {
                record.endereco = Some(endereco);
            }

            tx.update_client(record, scope)
        });

        match result {
            Ok(Some(record)) => Response::json(convert_client(record)),
            Ok(None) => Response::not_found(),
            Err(err) => {
                error!("Update client database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }

    fn list(&self, query: Query, _principal: &Principal, _ability: &Ability) -> Response {
        let page = query.page();
        let result = self.db.with_transaction(|tx| {
            let items = tx.list_clients(&query)?;
            let total = tx.count_clients(&query)?;
            Ok((items, total))
        });

        match result {
            Ok((items, total)) => {
                let items: Vec<_> = items.into_iter().map(convert_client).collect();
                Response::json(PageResponse::new(items, total, page))
            }
            Err(err) => {
                error!("List clients database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }

    fn get(&self, id: String, principal: &Principal, ability: &Ability) -> Response {
        let id = match parse_id(&id) {
            Some(id) => id,
            None => return Response::bad_request("Invalid resource id"),
        };

        let scope = principal.org_scope();
        match self.db.with_transaction(|tx| tx.get_client(id, scope)) {
            Ok(Some(record)) => {
                let attrs = SubjectAttrs {
                    organization_id: Some(&record.organization_id),
                    id: None,
                };
                if !ability.can_instance(Action::Read, Subject::Client, &attrs) {
                    return Response::not_found();
                }
                Response::json(convert_client(record))
            }
            Ok(None) => Response::not_found(),
            Err(err) => {
                error!("Get client database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }

    fn delete(&self, id: String, principal: &Principal, ability: &Ability) -> Response {
        let id = match parse_id(&id) {
            Some(id) => id,
            None => return Response::bad_request("Invalid resource id"),
        };

        let scope = principal.org_scope();
        let result = self.db.with_transaction(|tx| {
            let record = match tx.get_client(id, scope)? {
                Some(record) => record,
                None => return Ok(false),
            };
            let attrs = SubjectAttrs {
                organization_id: Some(&record.organization_id),
                id: None,
            };
            if !ability.can_instance(Action::Delete, Subject::Client, &attrs) {
                return Ok(false);
            }
            tx.delete_client(id, scope)
        });

        match result {
            Ok(true) => Response::ok(),
            Ok(false) => Response::not_found(),
            Err(err) => {
                error!("Delete client database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }
}
