use std::sync::Arc;

use anyhow::bail;
use log::error;

use crate::expect_json;
use crate::messages::Catalog;
use crate::server::ability::{Ability, Action, Subject, SubjectAttrs};
use crate::server::authn::Principal;
use crate::server::db::{ColaboradorRecord, Database};
use crate::server::response::{self, Response};
use crate::types::colaborador::{Colaborador, ColaboradorPatch, ColaboradorPut};
use crate::types::request::Query;
use crate::types::response::PageResponse;
use crate::validate::FieldError;

use super::{parse_id, target_org, ResourceHandler};

pub struct ColaboradoresHandler {
    db: Arc<Database>,
    messages: Arc<Catalog>,
}

impl ColaboradoresHandler {
    pub fn new(db: Arc<Database>, messages: Arc<Catalog>) -> Self {
        Self { db, messages }
    }
}

fn convert_colaborador(record: ColaboradorRecord) -> Colaborador {
    Colaborador {
        id: record.id,
        nome: record.nome,
        cpf: record.cpf,
        data_nascimento: record.data_nascimento,
        funcao: record.funcao,
        client_id: record.client_id,
        organization_id: record.organization_id,
        create_time: record.create_time,
        update_time: record.update_time,
    }
}

impl ResourceHandler for ColaboradoresHandler {
    fn put(&self, data: String, principal: &Principal, _ability: &Ability) -> Response {
        let payload: ColaboradorPut = expect_json!(data);
        let errs = payload.validate(&self.messages);
        if !errs.is_empty() {
            return Response::invalid_input(errs);
        }

        let org = match target_org(principal, payload.organization_id.as_deref(), &self.messages) {
            Ok(org) => org,
            Err(resp) => return resp,
        };

        // The employer must exist within the same organization
        let mut invalid = None;
        let result = self.db.with_transaction(|tx| {
            if tx.get_client(payload.client_id, Some(&org))?.is_none() {
                invalid = Some(FieldError::new(
                    "clientId",
                    self.messages.get("colaborador.client.not_found"),
                ));
                bail!("client not found");
            }

            tx.create_colaborador(ColaboradorRecord {
                id: 0,
                nome: payload.nome,
                cpf: payload.cpf,
                data_nascimento: payload.data_nascimento,
                funcao: payload.funcao,
                client_id: payload.client_id,
                organization_id: org.clone(),
                create_time: 0,
                update_time: 0,
            })
        });

        if let Some(err) = invalid {
            return Response::invalid_input(vec![err]);
        }

        match result {
            Ok(record) => Response::json(convert_colaborador(record)),
            Err(err) => {
                error!("Create colaborador database error: {err:#}");
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
        let patch: ColaboradorPatch = expect_json!(data);
        let errs = patch.validate(&self.messages);
        if !errs.is_empty() {
            return Response::invalid_input(errs);
        }

        let scope = principal.org_scope();
        let mut invalid = None;
        let result = self.db.with_transaction(|tx| {
            let mut record = match tx.get_colaborador(id, scope)? {
                Some(record) => record,
                None => return Ok(None),
            };
            let attrs = SubjectAttrs {
                organization_id: Some(&record.organization_id),
                id: None,
            };
            if !ability.can_instance(Action::Update, Subject::Colaborador, &attrs) {
                return Ok(None);
            }

            if let Some(client_id) = patch.client_id {
                // A reassigned employer must live in the row's organization
                if tx
                    .get_client(client_id, Some(&record.organization_id))?
                    .is_none()
                {
                    invalid = Some(FieldError::new(
                        "clientId",
                        self.messages.get("colaborador.client.not_found"),
                    ));
                    bail!("client not found");
                }
                record.client_id = client_id;
            }
            if let Some(nome) = patch.nome {
                record.nome = nome;
            }
            if let Some(cpf) = patch.cpf {
                record.cpf = cpf;
            }
            if let Some(data_nascimento) = patch.data_nascimento {
                record.data_nascimento = data_nascimento;
            }
            if let Some(funcao) = patch.funcao {
                record.funcao = funcao;
            }

            tx.update_colaborador(record, scope)
        });

        if let Some(err) = invalid {
            return Response::invalid_input(vec![err]);
        }

        match result {
            Ok(Some(record)) => Response::json(convert_colaborador(record)),
            Ok(None) => Response::not_found(),
            Err(err) => {
                error!("Update colaborador database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }

    fn list(&self, query: Query, _principal: &Principal, _ability: &Ability) -> Response {
        let page = query.page();
        let result = self.db.with_transaction(|tx| {
            let items = tx.list_colaboradores(&query)?;
            let total = tx.count_colaboradores(&query)?;
            Ok((items, total))
        });

        match result {
            Ok((items, total)) => {
                let items: Vec<_> = items.into_iter().map(convert_colaborador).collect();
                Response::json(PageResponse::new(items, total, page))
            }
            Err(err) => {
                error!("List colaboradores database error: {err:#}");
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
        match self.db.with_transaction(|tx| tx.get_colaborador(id, scope)) {
            Ok(Some(record)) => {
                let attrs = SubjectAttrs {
                    organization_id: Some(&record.organization_id),
                    id: None,
                };
                if !ability.can_instance(Action::Read, Subject::Colaborador, &attrs) {
                    return Response::not_found();
                }
                Response::json(convert_colaborador(record))
            }
            Ok(None) => Response::not_found(),
            Err(err) => {
                error!("Get colaborador database error: {err:#}");
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
            let record = match tx.get_colaborador(id, scope)? {
                Some(record) => record,
                None => return Ok(false),
            };
            let attrs = SubjectAttrs {
                organization_id: Some(&record.organization_id),
                id: None,
            };
            if !ability.can_instance(Action::Delete, Subject::Colaborador, &attrs) {
                return Ok(false);
            }
            tx.delete_colaborador(id, scope)
        });

        match result {
            Ok(true) => Response::ok(),
            Ok(false) => Response::not_found(),
            Err(err) => {
                error!("Delete colaborador database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }
}
