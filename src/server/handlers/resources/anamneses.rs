use std::sync::Arc;

use anyhow::bail;
use log::error;

use crate::expect_json;
use crate::messages::Catalog;
use crate::server::ability::{Ability, Action, Subject, SubjectAttrs};
use crate::server::authn::Principal;
use crate::server::db::{AnamneseItemRecord, AnamneseRecord, Database};
use crate::server::response::{self, Response};
use crate::types::anamnese::{Anamnese, AnamneseItem, AnamnesePatch, AnamnesePut, AnamneseStatus};
use crate::types::request::Query;
use crate::types::response::PageResponse;
use crate::validate::FieldError;

use super::{parse_id, target_org, ResourceHandler};

pub struct AnamnesesHandler {
    db: Arc<Database>,
    messages: Arc<Catalog>,
}

impl AnamnesesHandler {
    pub fn new(db: Arc<Database>, messages: Arc<Catalog>) -> Self {
        Self { db, messages }
    }
}

fn convert_anamnese(record: AnamneseRecord, items: Vec<AnamneseItemRecord>) -> Option<Anamnese> {
    // tipo/status come from our own writes, unknown values mean a corrupt row
    let tipo = crate::types::anamnese::AnamneseTipo::parse(&record.tipo)?;
    let status = AnamneseStatus::parse(&record.status)?;
    Some(Anamnese {
        id: record.id,
        colaborador_id: record.colaborador_id,
        medico_id: record.medico_id,
        tipo,
        status,
        items: items
            .into_iter()
            .map(|item| AnamneseItem {
                id: item.id,
                exame_id: item.exame_id,
                valor: item.valor,
            })
            .collect(),
        organization_id: record.organization_id,
        create_time: record.create_time,
        update_time: record.update_time,
    })
}

fn convert_or_error(record: AnamneseRecord, items: Vec<AnamneseItemRecord>) -> Response {
    match convert_anamnese(record, items) {
        Some(anamnese) => Response::json(anamnese),
        None => {
            error!("Anamnese row has an unknown tipo or status");
            Response::error(response::DATABASE_ERROR)
        }
    }
}

impl ResourceHandler for AnamnesesHandler {
    fn put(&self, data: String, principal: &Principal, _ability: &Ability) -> Response {
        let payload: AnamnesePut = expect_json!(data);
        let errs = payload.validate(&self.messages);
        if !errs.is_empty() {
            return Response::invalid_input(errs);
        }

        let org = match target_org(principal, payload.organization_id.as_deref(), &self.messages) {
            Ok(org) => org,
            Err(resp) => return resp,
        };

        let mut invalid = None;
        let result = self.db.with_transaction(|tx| {
            // Referenced rows must exist within the same organization
            let colaborador = match tx.get_colaborador(payload.colaborador_id, Some(&org))? {
                Some(colaborador) => colaborador,
                None => {
                    invalid = Some(FieldError::new(
                        "colaboradorId",
                        self.messages.get("anamnese.colaborador.not_found"),
                    ));
                    bail!("colaborador not found");
                }
            };
            if tx.get_medico(payload.medico_id, Some(&org))?.is_none() {
                invalid = Some(FieldError::new(
                    "medicoId",
                    self.messages.get("anamnese.medico.not_found"),
                ));
                bail!("medico not found");
            }

            let anamnese = tx.create_anamnese(AnamneseRecord {
                id: 0,
                colaborador_id: payload.colaborador_id,
                medico_id: payload.medico_id,
                tipo: payload.tipo.as_str().to_string(),
                status: AnamneseStatus::Pendente.as_str().to_string(),
                organization_id: org.clone(),
                create_time: 0,
                update_time: 0,
            })?;

            // Snapshot prices at order time: the client-specific price when
            // one exists, the catalog price otherwise.
            let mut items = Vec::with_capacity(payload.exames.len());
            for exame_id in payload.exames.iter() {
                let exame = match tx.get_exame(*exame_id, Some(&org))? {
                    Some(exame) => exame,
                    None => {
                        invalid = Some(FieldError::new(
                            "exames",
                            self.messages.get("anamnese.exame.not_found"),
                        ));
                        bail!("exame not found");
                    }
                };
                let valor = match tx.get_exame_cli_by_pair(
                    colaborador.client_id,
                    exame.id,
                    Some(&org),
                )? {
                    Some(exame_cli) => exame_cli.valor,
                    None => exame.valor,
                };
                let item = tx.create_anamnese_item(AnamneseItemRecord {
                    id: 0,
                    anamnese_id: anamnese.id,
                    exame_id: exame.id,
                    valor,
                    organization_id: org.clone(),
                })?;
                items.push(item);
            }

            Ok((anamnese, items))
        });

        if let Some(err) = invalid {
            return Response::invalid_input(vec![err]);
        }

        match result {
            Ok((anamnese, items)) => convert_or_error(anamnese, items),
            Err(err) => {
                error!("Create anamnese database error: {err:#}");
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
        let patch: AnamnesePatch = expect_json!(data);

        let scope = principal.org_scope();
        let mut invalid = None;
        let result = self.db.with_transaction(|tx| {
            let mut record = match tx.get_anamnese(id, scope)? {
                Some(record) => record,
                None => return Ok(None),
            };
            let attrs = SubjectAttrs {
                organization_id: Some(&record.organization_id),
                id: None,
            };
            if !ability.can_instance(Action::Update, Subject::Anamnese, &attrs) {
                return Ok(None);
            }

            if let Some(medico_id) = patch.medico_id {
                if tx
                    .get_medico(medico_id, Some(&record.organization_id))?
                    .is_none()
                {
                    invalid = Some(FieldError::new(
                        "medicoId",
                        self.messages.get("anamnese.medico.not_found"),
                    ));
                    bail!("medico not found");
                }
                record.medico_id = medico_id;
            }
            if let Some(status) = patch.status {
                record.status = status.as_str().to_string();
            }

            let updated = match tx.update_anamnese(record, scope)? {
                Some(updated) => updated,
                None => return Ok(None),
            };
            let items = tx.list_anamnese_items(updated.id)?;
            Ok(Some((updated, items)))
        });

        if let Some(err) = invalid {
            return Response::invalid_input(vec![err]);
        }

        match result {
            Ok(Some((record, items))) => convert_or_error(record, items),
            Ok(None) => Response::not_found(),
            Err(err) => {
                error!("Update anamnese database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }

    fn list(&self, query: Query, _principal: &Principal, _ability: &Ability) -> Response {
        let page = query.page();
        let result = self.db.with_transaction(|tx| {
            let records = tx.list_anamneses(&query)?;
            let total = tx.count_anamneses(&query)?;

            let mut full = Vec::with_capacity(records.len());
            for record in records {
                let items = tx.list_anamnese_items(record.id)?;
                full.push((record, items));
            }
            Ok((full, total))
        });

        match result {
            Ok((full, total)) => {
                let items: Vec<_> = full
                    .into_iter()
                    .filter_map(|(record, items)| convert_anamnese(record, items))
                    .collect();
                Response::json(PageResponse::new(items, total, page))
            }
            Err(err) => {
                error!("List anamneses database error: {err:#}");
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
        let result = self.db.with_transaction(|tx| {
            let record = match tx.get_anamnese(id, scope)? {
                Some(record) => record,
                None => return Ok(None),
            };
            let items = tx.list_anamnese_items(record.id)?;
            Ok(Some((record, items)))
        });

        match result {
            Ok(Some((record, items))) => {
                let attrs = SubjectAttrs {
                    organization_id: Some(&record.organization_id),
                    id: None,
                };
                if !ability.can_instance(Action::Read, Subject::Anamnese, &attrs) {
                    return Response::not_found();
                }
                convert_or_error(record, items)
            }
            Ok(None) => Response::not_found(),
            Err(err) => {
                error!("Get anamnese database error: {err:#}");
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
            let record = match tx.get_anamnese(id, scope)? {
                Some(record) => record,
                None => return Ok(false),
            };
            let attrs = SubjectAttrs {
                organization_id: Some(&record.organization_id),
                id: None,
            };
            if !ability.can_instance(Action::Delete, Subject::Anamnese, &attrs) {
                return Ok(false);
            }
            tx.delete_anamnese(id, scope)
        });

        match result {
            Ok(true) => Response::ok(),
            Ok(false) => Response::not_found(),
            Err(err) => {
                error!("Delete anamnese database error: {err:#}");
                Response::error(response::DATABASE_ERROR)
            }
        }
    }
}
