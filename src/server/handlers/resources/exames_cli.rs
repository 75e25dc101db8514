use std::sync::Arc;

use anyhow::bail;
use log::error;

use crate::expect_json;
use crate::messages::Catalog;
use crate::server::ability::{Ability, Action, Subject, SubjectAttrs};
use crate::server::authn::Principal;
use crate::server::db::{Database, ExameCliRecord};
use crate::server::response::{self, Response};
use crate::types::exame_cli::{ExameCli, ExameCliPatch, ExameCliPut};
use crate::types::request::Query;
use crate::types::response::PageResponse;
use crate::validate::FieldError;

use super::{parse_id, target_org, ResourceHandler};

pub struct ExamesCliHandler {
    db: Arc<Database>,
    messages: Arc<Catalog>,
}

impl ExamesCliHandler {
    pub fn new(db: Arc<Database>, messages: Arc<Catalog>) -> Self {
        Self { db, messages }
    }
}

fn convert_exame_cli(record: ExameCliRecord) -> ExameCli {
    ExameCli {
        id: record.id,
        client_id: record.client_id,
        exame_id: record.exame_id,
        valor: record.valor,
        organization_id: record.organization_id,
        create_time: record.create_time,
        update_time: record.update_time,
    }
}

enum PutFailure {
    Invalid(FieldError),
    Duplicate,
}

impl ResourceHandler for ExamesCliHandler {
    fn put(&self, data: String, principal: &Principal, _ability: &Ability) -> Response {
        let payload: ExameCliPut = expect_json!(data);
        let errs = payload.validate(&self.messages);
        if !errs.is_empty() {
            return Response::invalid_input(errs);
        }

        let org = match target_org(principal, payload.organization_id.as_deref(), &self.messages) {
            Ok(org) => org,
            Err(resp) => return resp,
        };

        let mut failure = None;
        let result = self.db.with_transaction(|tx| {
            if tx.get_client(payload.client_id, Some(&org))?.is_none() {
                failure = Some(PutFailure::Invalid(FieldError::new(
                    "clientId",
                    self.messages.get("exame_cli.client.not_found"),
                )));
                bail!("client not found");
            }
            if tx.get_exame(payload.exame_id, Some(&org))?.is_none() {
                failure = Some(PutFailure::Invalid(FieldError::new(
                    "exameId",
                    self.messages.get("exame_cli.exame.not_found"),
                )));
                bail!("exame not found");
            }

            // One override per (client, exame) pair
            if tx
                .get_exame_cli_by_pair(payload.client_id, payload.exame_id, Some(&org))?
                .is_some()
            {
                failure = Some(PutFailure::Duplicate);
                bail!("price already exists");
            }

            tx.create_exame_cli(ExameCliRecord {
                id: 0,
                client_id: payload.client_id,
                exame_id: payload.exame_id,
                valor: payload.valor,
                organization_id: org.clone(),
                create_time: 0,
                update_time: 0,
            })
        });

        match failure {
            Some(PutFailure::Invalid(err)) => return Response::invalid_input(vec![err]),
            Some(PutFailure::Duplicate) => {
                return Response::conflict("Price already defined for this client and exam");
            }
            None => {}
        }

        match result {
            Ok(record) => Response::json(convert_exame_cli(record)),
            Err(err) => {
                error!("Create exame_cli database error: {err:#}");
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
        let patch: ExameCliPatch = expect_json!(data);
        let errs = patch.validate(&self.messages);
        if !errs.is_empty() {
            return Response::invalid_input(errs);
        }

        let scope = principal.org_scope();
        let result = self.db.with_transaction(|tx| {
            let mut record = match tx.get_exame_cli(id, scope)? {
                Some(record) => record,
                None => return Ok(None),
            };
            let attrs = SubjectAttrs {
                organization_id: Some(&record.organization_id),
                id: None,
            };
            if !ability.can_instance(Action::Update, Subject::ExameCli, &attrs) {
                return Ok(None);
            }

            if let Some(valor) = patch.valor {
                record.valor = valor;
            }

            tx.update_exame_cli(record, scope)
        });

        match result {
            Ok(Some(record)) => Response::json(convert_exame_cli(record)),
            Ok(None) => Response::not_found(),
            Err(err) => {
                error!("Update exame_cli database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }

    fn list(&self, query: Query, _principal: &Principal, _ability: &Ability) -> Response {
        let page = query.page();
        let result = self.db.with_transaction(|tx| {
            let items = tx.list_exames_cli(&query)?;
            let total = tx.count_exames_cli(&query)?;
            Ok((items, total))
        });

        match result {
            Ok((items, total)) => {
                let items: Vec<_> = items.into_iter().map(convert_exame_cli).collect();
                Response::json(PageResponse::new(items, total, page))
            }
            Err(err) => {
                error!("List exames_cli database error: {err:#}");
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
        match self.db.with_transaction(|tx| tx.get_exame_cli(id, scope)) {
            Ok(Some(record)) => {
                let attrs = SubjectAttrs {
                    organization_id: Some(&record.organization_id),
                    id: None,
                };
                if !ability.can_instance(Action::Read, Subject::ExameCli, &attrs) {
                    return Response::not_found();
                }
                Response::json(convert_exame_cli(record))
            }
            Ok(None) => Response::not_found(),
            Err(err) => {
                error!("Get exame_cli database error: {err:#}");
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
            let record = match tx.get_exame_cli(id, scope)? {
                Some(record) => record,
                None => return Ok(false),
            };
            let attrs = SubjectAttrs {
                organization_id: Some(&record.organization_id),
                id: None,
            };
            if !ability.can_instance(Action::Delete, Subject::ExameCli, &attrs) {
                return Ok(false);
            }
            tx.delete_exame_cli(id, scope)
        });

        match result {
            Ok(true) => Response::ok(),
            Ok(false) => Response::not_found(),
            Err(err) => {
                error!("Delete exame_cli database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }
}
