use std::sync::Arc;

use log::error;

use crate::expect_json;
use crate::messages::Catalog;
use crate::server::ability::{Ability, Action, Subject, SubjectAttrs};
use crate::server::authn::Principal;
use crate::server::db::{Database, MedicoRecord};
use crate::server::response::{self, Response};
use crate::types::medico::{Medico, MedicoPatch, MedicoPut};
use crate::types::request::Query;
use crate::types::response::PageResponse;

use super::{parse_id, target_org, ResourceHandler};

pub struct MedicosHandler {
    db: Arc<Database>,
    messages: Arc<Catalog>,
}

impl MedicosHandler {
    pub fn new(db: Arc<Database>, messages: Arc<Catalog>) -> Self {
        Self { db, messages }
    }
}

fn convert_medico(record: MedicoRecord) -> Medico {
    Medico {
        id: record.id,
        nome: record.nome,
        crm: record.crm,
        especialidade: record.especialidade,
        organization_id: record.organization_id,
        create_time: record.create_time,
        update_time: record.update_time,
    }
}

impl ResourceHandler for MedicosHandler {
    fn put(&self, data: String, principal: &Principal, _ability: &Ability) -> Response {
        let payload: MedicoPut = expect_json!(data);
        let errs = payload.validate(&self.messages);
        if !errs.is_empty() {
            return Response::invalid_input(errs);
        }

        let org = match target_org(principal, payload.organization_id.as_deref(), &self.messages) {
            Ok(org) => org,
            Err(resp) => return resp,
        };

        let record = MedicoRecord {
            id: 0,
            nome: payload.nome,
            crm: payload.crm,
            especialidade: payload.especialidade,
            organization_id: org,
            create_time: 0,
            update_time: 0,
        };

        match self.db.with_transaction(|tx| tx.create_medico(record)) {
            Ok(record) => Response::json(convert_medico(record)),
            Err(err) => {
                error!("Create medico database error: {err:#}");
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
        let patch: MedicoPatch = expect_json!(data);
        let errs = patch.validate(&self.messages);
        if !errs.is_empty() {
            return Response::invalid_input(errs);
        }

        let scope = principal.org_scope();
        let result = self.db.with_transaction(|tx| {
            let mut record = match tx.get_medico(id, scope)? {
                Some(record) => record,
                None => return Ok(None),
            };
            let attrs = SubjectAttrs {
                organization_id: Some(&record.organization_id),
                id: None,
            };
            if !ability.can_instance(Action::Update, Subject::Medico, &attrs) {
                return Ok(None);
            }

            if let Some(nome) = patch.nome {
                record.nome = nome;
            }
            if let Some(crm) = patch.crm {
                record.crm = crm;
            }
            if let Some(especialidade) = patch.especialidade {
                record.especialidade = Some(especialidade);
            }

            tx.update_medico(record, scope)
        });

        match result {
            Ok(Some(record)) => Response::json(convert_medico(record)),
            Ok(None) => Response::not_found(),
            Err(err) => {
                error!("Update medico database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }

    fn list(&self, query: Query, _principal: &Principal, _ability: &Ability) -> Response {
        let page = query.page();
        let result = self.db.with_transaction(|tx| {
            let items = tx.list_medicos(&query)?;
            let total = tx.count_medicos(&query)?;
            Ok((items, total))
        });

        match result {
            Ok((items, total)) => {
                let items: Vec<_> = items.into_iter().map(convert_medico).collect();
                Response::json(PageResponse::new(items, total, page))
            }
            Err(err) => {
                error!("List medicos database error: {err:#}");
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
        match self.db.with_transaction(|tx| tx.get_medico(id, scope)) {
            Ok(Some(record)) => {
                let attrs = SubjectAttrs {
                    organization_id: Some(&record.organization_id),
                    id: None,
                };
                if !ability.can_instance(Action::Read, Subject::Medico, &attrs) {
                    return Response::not_found();
                }
                Response::json(convert_medico(record))
            }
            Ok(None) => Response::not_found(),
            Err(err) => {
                error!("Get medico database error: {err:#}");
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
            let record = match tx.get_medico(id, scope)? {
                Some(record) => record,
                None => return Ok(false),
            };
            let attrs = SubjectAttrs {
                organization_id: Some(&record.organization_id),
                id: None,
            };
            if !ability.can_instance(Action::Delete, Subject::Medico, &attrs) {
                return Ok(false);
            }
            tx.delete_medico(id, scope)
        });

        match result {
            Ok(true) => Response::ok(),
            Ok(false) => Response::not_found(),
            Err(err) => {
                error!("Delete medico database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }
}
