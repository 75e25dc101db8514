use std::collections::HashMap;
use std::sync::Arc;

use crate::messages::Catalog;
use crate::server::ability::Ability;
use crate::server::authn::Principal;
use crate::server::db::Database;
use crate::server::response::Response;
use crate::types::request::ResourceRequest;

use super::anamneses::AnamnesesHandler;
use super::clients::ClientsHandler;
use super::colaboradores::ColaboradoresHandler;
use super::contas::ContasHandler;
use super::exames::ExamesHandler;
use super::exames_cli::ExamesCliHandler;
use super::medicos::MedicosHandler;
use super::orgs::OrgsHandler;
use super::union::UnionResourceHandler;
use super::ResourceHandler;

pub struct Dispatcher {
    handlers: HashMap<&'static str, Arc<UnionResourceHandler>>,
}

impl Dispatcher {
    pub fn new(db: Arc<Database>, messages: Arc<Catalog>) -> Self {
        let mut handlers = HashMap::new();

        // clients
        let handler = ClientsHandler::new(db.clone(), messages.clone());
        let handler = Arc::new(UnionResourceHandler::Clients(handler));
        handlers.insert("clients", handler);

        // exames
        let handler = ExamesHandler::new(db.clone(), messages.clone());
        let handler = Arc::new(UnionResourceHandler::Exames(handler));
        handlers.insert("exames", handler);

        // medicos
        let handler = MedicosHandler::new(db.clone(), messages.clone());
        let handler = Arc::new(UnionResourceHandler::Medicos(handler));
        handlers.insert("medicos", handler);

        // colaboradores
        let handler = ColaboradoresHandler::new(db.clone(), messages.clone());
        let handler = Arc::new(UnionResourceHandler::Colaboradores(handler));
        handlers.insert("colaboradores", handler);

        // exames-cli
        let handler = ExamesCliHandler::new(db.clone(), messages.clone());
        let handler = Arc::new(UnionResourceHandler::ExamesCli(handler));
        handlers.insert("exames-cli", handler);

        // anamneses
        let handler = AnamnesesHandler::new(db.clone(), messages.clone());
        let handler = Arc::new(UnionResourceHandler::Anamneses(handler));
        handlers.insert("anamneses", handler);

        // contas
        let handler = ContasHandler::new(db.clone(), messages.clone());
        let handler = Arc::new(UnionResourceHandler::Contas(handler));
        handlers.insert("contas", handler);

        // orgs
        let handler = OrgsHandler::new(db, messages);
        let handler = Arc::new(UnionResourceHandler::Orgs(handler));
        handlers.insert("orgs", handler);

        Self { handlers }
    }

    pub fn dispatch(
        &self,
        rsc_req: ResourceRequest,
        resource: &str,
        principal: &Principal,
        ability: &Ability,
    ) -> Response {
        let handler = match self.handlers.get(resource) {
            Some(handler) => handler,
            None => return Response::not_found(),
        };

        match rsc_req {
            ResourceRequest::Put(data) => handler.put(data, principal, ability),
            ResourceRequest::Patch(id, data) => handler.patch(id, data, principal, ability),
            ResourceRequest::List(mut query) => {
                principal.set_query_org(&mut query);
                handler.list(query, principal, ability)
            }
            ResourceRequest::Get(id) => handler.get(id, principal, ability),
            ResourceRequest::Delete(id) => handler.delete(id, principal, ability),
        }
    }
}
