use std::sync::Arc;

use log::error;

use crate::expect_json;
use crate::messages::Catalog;
use crate::server::ability::{Ability, Action, Subject, SubjectAttrs};
use crate::server::authn::Principal;
use crate::server::db::{ContaRecord, Database};
use crate::server::response::{self, Response};
use crate::types::conta::{ContaAPagar, ContaPatch, ContaPut};
use crate::types::request::Query;
use crate::types::response::PageResponse;

use super::{parse_id, target_org, ResourceHandler};

pub struct ContasHandler {
    db: Arc<Database>,
    messages: Arc<Catalog>,
}

impl ContasHandler {
    pub fn new(db: Arc<Database>, messages: Arc<Catalog>) -> Self {
        Self { db, messages }
    }
}

fn convert_conta(record: ContaRecord) -> ContaAPagar {
    ContaAPagar {
        id: record.id,
        descricao: record.descricao,
        valor: record.valor,
        vencimento: record.vencimento,
        pago: record.pago,
        organization_id: record.organization_id,
        create_time: record.create_time,
        update_time: record.update_time,
    }
}

impl ResourceHandler for ContasHandler {
    fn put(&self, data: String, principal: &Principal, _ability: &Ability) -> Response {
        let payload: ContaPut = expect_json!(data);
        let errs = payload.validate(&self.messages);
        if !errs.is_empty() {
            return Response::invalid_input(errs);
        }

        let org = match target_org(principal, payload.organization_id.as_deref(), &self.messages) {
            Ok(org) => org,
            Err(resp) => return resp,
        };

        let record = ContaRecord {
            id: 0,
            descricao: payload.descricao,
            valor: payload.valor,
            vencimento: payload.vencimento,
            pago: payload.pago,
            organization_id: org,
            create_time: 0,
            update_time: 0,
        };

        match self.db.with_transaction(|tx| tx.create_conta(record)) {
            Ok(record) => Response::json(convert_conta(record)),
            Err(err) => {
                error!("Create conta database error: {err:#}");
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
        let patch: ContaPatch = expect_json!(data);
        let errs = patch.validate(&self.messages);
        if !errs.is_empty() {
            return Response::invalid_input(errs);
        }

        let scope = principal.org_scope();
        let result = self.db.with_transaction(|tx| {
            let mut record = match tx.get_conta(id, scope)? {
                Some(record) => record,
                None => return Ok(None),
            };
            let attrs = SubjectAttrs {
                organization_id: Some(&record.organization_id),
                id: None,
            };
            if !ability.can_instance(Action::Update, Subject::ContasAPagar, &attrs) {
                return Ok(None);
            }

            if let Some(descricao) = patch.descricao {
                record.descricao = descricao;
            }
            if let Some(valor) = patch.valor {
                record.valor = valor;
            }
            if let Some(vencimento) = patch.vencimento {
                record.vencimento = vencimento;
            }
            if let Some(pago) = patch.pago {
                record.pago = pago;
            }

            tx.update_conta(record, scope)
        });

        match result {
            Ok(Some(record)) => Response::json(convert_conta(record)),
            Ok(None) => Response::not_found(),
            Err(err) => {
                error!("Update conta database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }

    fn list(&self, query: Query, _principal: &Principal, _ability: &Ability) -> Response {
        let page = query.page();
        let result = self.db.with_transaction(|tx| {
            let items = tx.list_contas(&query)?;
            let total = tx.count_contas(&query)?;
            Ok((items, total))
        });

        match result {
            Ok((items, total)) => {
                let items: Vec<_> = items.into_iter().map(convert_conta).collect();
                Response::json(PageResponse::new(items, total, page))
            }
            Err(err) => {
                error!("List contas database error: {err:#}");
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
        match self.db.with_transaction(|tx| tx.get_conta(id, scope)) {
            Ok(Some(record)) => {
                let attrs = SubjectAttrs {
                    organization_id: Some(&record.organization_id),
                    id: None,
                };
                if !ability.can_instance(Action::Read, Subject::ContasAPagar, &attrs) {
                    return Response::not_found();
                }
                Response::json(convert_conta(record))
            }
            Ok(None) => Response::not_found(),
            Err(err) => {
                error!("Get conta database error: {err:#}");
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
            let record = match tx.get_conta(id, scope)? {
                Some(record) => record,
                None => return Ok(false),
            };
            let attrs = SubjectAttrs {
                organization_id: Some(&record.organization_id),
                id: None,
            };
            if !ability.can_instance(Action::Delete, Subject::ContasAPagar, &attrs) {
                return Ok(false);
            }
            tx.delete_conta(id, scope)
        });

        match result {
            Ok(true) => Response::ok(),
            Ok(false) => Response::not_found(),
            Err(err) => {
                error!("Delete conta database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }
}
