use crate::server::ability::Ability;
use crate::server::authn::Principal;
use crate::server::response::Response;
use crate::types::request::Query;

use super::anamneses::AnamnesesHandler;
use super::clients::ClientsHandler;
use super::colaboradores::ColaboradoresHandler;
use super::contas::ContasHandler;
use super::exames::ExamesHandler;
use super::exames_cli::ExamesCliHandler;
use super::medicos::MedicosHandler;
use super::orgs::OrgsHandler;
use super::ResourceHandler;

pub enum UnionResourceHandler {
    Anamneses(AnamnesesHandler),
    Clients(ClientsHandler),
    Colaboradores(ColaboradoresHandler),
    Contas(ContasHandler),
    Exames(ExamesHandler),
    ExamesCli(ExamesCliHandler),
    Medicos(MedicosHandler),
    Orgs(OrgsHandler),
}

impl ResourceHandler for UnionResourceHandler {
    fn put(&self, data: String, principal: &Principal, ability: &Ability) -> Response {
        match self {
            UnionResourceHandler::Anamneses(handler) => handler.put(data, principal, ability),
            UnionResourceHandler::Clients(handler) => handler.put(data, principal, ability),
            UnionResourceHandler::Colaboradores(handler) => handler.put(data, principal, ability),
            UnionResourceHandler::Contas(handler) => handler.put(data, principal, ability),
            UnionResourceHandler::Exames(handler) => handler.put(data, principal, ability),
            UnionResourceHandler::ExamesCli(handler) => handler.put(data, principal, ability),
            UnionResourceHandler::Medicos(handler) => handler.put(data, principal, ability),
            UnionResourceHandler::Orgs(handler) => handler.put(data, principal, ability),
        }
    }

    fn patch(
        &self,
        id: String,
        data: String,
        principal: &Principal,
        ability: &Ability,
    ) -> Response {
        match self {
            UnionResourceHandler::Anamneses(handler) => handler.patch(id, data, principal, ability),
            UnionResourceHandler::Clients(handler) => handler.patch(id, data, principal, ability),
            UnionResourceHandler::Colaboradores(handler) => {
                handler.patch(id, data, principal, ability)
            }
            UnionResourceHandler::Contas(handler) => handler.patch(id, data, principal, ability),
            UnionResourceHandler::Exames(handler) => handler.patch(id, data, principal, ability),
            UnionResourceHandler::ExamesCli(handler) => handler.patch(id, data, principal, ability),
            UnionResourceHandler::Medicos(handler) => handler.patch(id, data, principal, ability),
            UnionResourceHandler::Orgs(handler) => handler.patch(id, data, principal, ability),
        }
    }

    fn list(&self, query: Query, principal: &Principal, ability: &Ability) -> Response {
        match self {
            UnionResourceHandler::Anamneses(handler) => handler.list(query, principal, ability),
            UnionResourceHandler::Clients(handler) => handler.list(query, principal, ability),
            UnionResourceHandler::Colaboradores(handler) => handler.list(query, principal, ability),
            UnionResourceHandler::Contas(handler) => handler.list(query, principal, ability),
            UnionResourceHandler::Exames(handler) => handler.list(query, principal, ability),
            UnionResourceHandler::ExamesCli(handler) => handler.list(query, principal, ability),
            UnionResourceHandler::Medicos(handler) => handler.list(query, principal, ability),
            UnionResourceHandler::Orgs(handler) => handler.list(query, principal, ability),
        }
    }

    fn get(&self, id: String, principal: &Principal, ability: &Ability) -> Response {
        match self {
            UnionResourceHandler::Anamneses(handler) => handler.get(id, principal, ability),
            UnionResourceHandler::Clients(handler) => handler.get(id, principal, ability),
            UnionResourceHandler::Colaboradores(handler) => handler.get(id, principal, ability),
            UnionResourceHandler::Contas(handler) => handler.get(id, principal, ability),
            UnionResourceHandler::Exames(handler) => handler.get(id, principal, ability),
            UnionResourceHandler::ExamesCli(handler) => handler.get(id, principal, ability),
            UnionResourceHandler::Medicos(handler) => handler.get(id, principal, ability),
            UnionResourceHandler::Orgs(handler) => handler.get(id, principal, ability),
        }
    }

    fn delete(&self, id: String, principal: &Principal, ability: &Ability) -> Response {
        match self {
            UnionResourceHandler::Anamneses(handler) => handler.delete(id, principal, ability),
            UnionResourceHandler::Clients(handler) => handler.delete(id, principal, ability),
            UnionResourceHandler::Colaboradores(handler) => handler.delete(id, principal, ability),
            UnionResourceHandler::Contas(handler) => handler.delete(id, principal, ability),
            UnionResourceHandler::Exames(handler) => handler.delete(id, principal, ability),
            UnionResourceHandler::ExamesCli(handler) => handler.delete(id, principal, ability),
            UnionResourceHandler::Medicos(handler) => handler.delete(id, principal, ability),
            UnionResourceHandler::Orgs(handler) => handler.delete(id, principal, ability),
        }
    }
}
