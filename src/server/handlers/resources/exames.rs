use std::sync::Arc;

use log::error;

use crate::expect_json;
use crate::messages::Catalog;
use crate::server::ability::{Ability, Action, Subject, SubjectAttrs};
use crate::server::authn::Principal;
use crate::server::db::{Database, ExameRecord};
use crate::server::response::{self, Response};
use crate::types::exame::{Exame, ExamePatch, ExamePut};
use crate::types::request::Query;
use crate::types::response::PageResponse;

use super::{parse_id, target_org, ResourceHandler};

pub struct ExamesHandler {
    db: Arc<Database>,
    messages: Arc<Catalog>,
}

impl ExamesHandler {
    pub fn new(db: Arc<Database>, messages: Arc<Catalog>) -> Self {
        Self { db, messages }
    }
}

fn convert_exame(record: ExameRecord) -> Exame {
    Exame {
        id: record.id,
        nome: record.nome,
        valor: record.valor,
        organization_id: record.organization_id,
        create_time: record.create_time,
        update_time: record.update_time,
    }
}

impl ResourceHandler for ExamesHandler {
    fn put(&self, data: String, principal: &Principal, _ability: &Ability) -> Response {
        let payload: ExamePut = expect_json!(data);
        let errs = payload.validate(&self.messages);
        if !errs.is_empty() {
            return Response::invalid_input(errs);
        }

        let org = match target_org(principal, payload.organization_id.as_deref(), &self.messages) {
            Ok(org) => org,
            Err(resp) => return resp,
        };

        let record = ExameRecord {
            id: 0,
            nome: payload.nome,
            valor: payload.valor,
            organization_id: org,
            create_time: 0,
            update_time: 0,
        };

        match self.db.with_transaction(|tx| tx.create_exame(record)) {
            Ok(record) => Response::json(convert_exame(record)),
            Err(err) => {
                error!("Create exame database error: {err:#}");
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
        let patch: ExamePatch = expect_json!(data);
        let errs = patch.validate(&self.messages);
        if !errs.is_empty() {
            return Response::invalid_input(errs);
        }

        let scope = principal.org_scope();
        let result = self.db.with_transaction(|tx| {
            let mut record = match tx.get_exame(id, scope)? {
                Some(record) => record,
                None => return Ok(None),
            };
            let attrs = SubjectAttrs {
                organization_id: Some(&record.organization_id),
                id: None,
            };
            if !ability.can_instance(Action::Update, Subject::Exame, &attrs) {
                return Ok(None);
            }

            if let Some(nome) = patch.nome {
                record.nome = nome;
            }
            if let Some(valor) = patch.valor {
                record.valor = valor;
            }

            tx.update_exame(record, scope)
        });

        match result {
            Ok(Some(record)) => Response::json(convert_exame(record)),
            Ok(None) => Response::not_found(),
            Err(err) => {
                error!("Update exame database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }

    fn list(&self, query: Query, _principal: &Principal, _ability: &Ability) -> Response {
        let page = query.page();
        let result = self.db.with_transaction(|tx| {
            let items = tx.list_exames(&query)?;
            let total = tx.count_exames(&query)?;
            Ok((items, total))
        });

        match result {
            Ok((items, total)) => {
                let items: Vec<_> = items.into_iter().map(convert_exame).collect();
                Response::json(PageResponse::new(items, total, page))
            }
            Err(err) => {
                error!("List exames database error: {err:#}");
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
        match self.db.with_transaction(|tx| tx.get_exame(id, scope)) {
            Ok(Some(record)) => {
                let attrs = SubjectAttrs {
                    organization_id: Some(&record.organization_id),
                    id: None,
                };
                if !ability.can_instance(Action::Read, Subject::Exame, &attrs) {
                    return Response::not_found();
                }
                Response::json(convert_exame(record))
            }
            Ok(None) => Response::not_found(),
            Err(err) => {
                error!("Get exame database error: {err:#}");
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
            let record = match tx.get_exame(id, scope)? {
                Some(record) => record,
                None => return Ok(false),
            };
            let attrs = SubjectAttrs {
                organization_id: Some(&record.organization_id),
                id: None,
            };
            if !ability.can_instance(Action::Delete, Subject::Exame, &attrs) {
                return Ok(false);
            }
            tx.delete_exame(id, scope)
        });

        match result {
            Ok(true) => Response::ok(),
            Ok(false) => Response::not_found(),
            Err(err) => {
                error!("Delete exame database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }
}
