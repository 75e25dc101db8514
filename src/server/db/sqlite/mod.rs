mod anamnese;
mod client;
mod colaborador;
mod conta;
mod exame;
mod exame_cli;
mod medico;
mod org;

pub mod config;
pub mod factory;

use std::path::Path;

use anyhow::Result;
use rusqlite::Connection as RawConnection;
use rusqlite::Transaction as RawTransaction;

use crate::types::request::Query;

use super::{
    AnamneseItemRecord, AnamneseRecord, ClientRecord, ColaboradorRecord, Connection, ContaRecord,
    ExameCliRecord, ExameRecord, MedicoRecord, OrganizationRecord, Transaction,
};

/// SQLite-based database implementation. This is the simplest database type,
/// perfect for single-node deployments. Supports both file-based and in-memory
/// database types.
pub struct Sqlite {
    conn: RawConnection,
}

/// SQLite transaction for executing database operations
pub struct SqliteTransaction<'a> {
    tx: RawTransaction<'a>,
}

impl Sqlite {
    /// Opens a SQLite database file. Creates one if it doesn't exist.
    /// Also initializes all required database tables.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = RawConnection::open(path)?;
        Self::init_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Creates a new in-memory database. Database content will be lost when
    /// the program exits. This method is recommended for testing only.
    pub fn memory() -> Result<Self> {
        let conn = RawConnection::open_in_memory()?;
        Self::init_tables(&conn)?;
        Ok(Self { conn })
    }

    fn init_tables(db: &RawConnection) -> Result<()> {
        org::create_organization_tables(db)?;
        client::create_client_tables(db)?;
        exame::create_exame_tables(db)?;
        medico::create_medico_tables(db)?;
        colaborador::create_colaborador_tables(db)?;
        exame_cli::create_exame_cli_tables(db)?;
        anamnese::create_anamnese_tables(db)?;
        conta::create_conta_tables(db)?;
        Ok(())
    }
}

impl<'a> Connection<'a, SqliteTransaction<'a>> for Sqlite {
    fn transaction(&'a mut self) -> Result<SqliteTransaction<'a>> {
        let tx = self.conn.transaction()?;
        Ok(SqliteTransaction { tx })
    }
}

impl Transaction for SqliteTransaction<'_> {
    fn insert_organization_if_absent(&self, org: &OrganizationRecord) -> Result<bool> {
        org::insert_organization_if_absent(&self.tx, org)
    }

    fn is_organization_exists(&self, id: &str) -> Result<bool> {
        org::is_organization_exists(&self.tx, id)
    }

    fn get_organization(&self, id: &str) -> Result<Option<OrganizationRecord>> {
        org::get_organization(&self.tx, id)
    }

    fn list_organizations(&self) -> Result<Vec<OrganizationRecord>> {
        org::list_organizations(&self.tx)
    }

    fn update_organization_name(
        &self,
        id: &str,
        name: &str,
    ) -> Result<Option<OrganizationRecord>> {
        org::update_organization_name(&self.tx, id, name)
    }

    fn create_client(&self, client: ClientRecord) -> Result<ClientRecord> {
        client::create_client(&self.tx, client)
    }

    fn get_client(&self, id: u64, org: Option<&str>) -> Result<Option<ClientRecord>> {
        client::get_client(&self.tx, id, org)
    }

    fn list_clients(&self, query: &Query) -> Result<Vec<ClientRecord>> {
        client::list_clients(&self.tx, query)
    }

    fn count_clients(&self, query: &Query) -> Result<u64> {
        client::count_clients(&self.tx, query)
    }

    fn update_client(
        &self,
        client: ClientRecord,
        org: Option<&str>,
    ) -> Result<Option<ClientRecord>> {
        client::update_client(&self.tx, client, org)
    }

    fn delete_client(&self, id: u64, org: Option<&str>) -> Result<bool> {
        client::delete_client(&self.tx, id, org)
    }

    fn create_exame(&self, exame: ExameRecord) -> Result<ExameRecord> {
        exame::create_exame(&self.tx, exame)
    }

    fn get_exame(&self, id: u64, org: Option<&str>) -> Result<Option<ExameRecord>> {
        exame::get_exame(&self.tx, id, org)
    }

    fn list_exames(&self, query: &Query) -> Result<Vec<ExameRecord>> {
        exame::list_exames(&self.tx, query)
    }

    fn count_exames(&self, query: &Query) -> Result<u64> {
        exame::count_exames(&self.tx, query)
    }

    fn update_exame(&self, exame: ExameRecord, org: Option<&str>) -> Result<Option<ExameRecord>> {
        exame::update_exame(&self.tx, exame, org)
    }

    fn delete_exame(&self, id: u64, org: Option<&str>) -> Result<bool> {
        exame::delete_exame(&self.tx, id, org)
    }

    fn create_medico(&self, medico: MedicoRecord) -> Result<MedicoRecord> {
        medico::create_medico(&self.tx, medico)
    }

    fn get_medico(&self, id: u64, org: Option<&str>) -> Result<Option<MedicoRecord>> {
        medico::get_medico(&self.tx, id, org)
    }

    fn list_medicos(&self, query: &Query) -> Result<Vec<MedicoRecord>> {
        medico::list_medicos(&self.tx, query)
    }

    fn count_medicos(&self, query: &Query) -> Result<u64> {
        medico::count_medicos(&self.tx, query)
    }

    fn update_medico(
        &self,
        medico: MedicoRecord,
        org: Option<&str>,
    ) -> Result<Option<MedicoRecord>> {
        medico::update_medico(&self.tx, medico, org)
    }

    fn delete_medico(&self, id: u64, org: Option<&str>) -> Result<bool> {
        medico::delete_medico(&self.tx, id, org)
    }

    fn create_colaborador(&self, colaborador: ColaboradorRecord) -> Result<ColaboradorRecord> {
        colaborador::create_colaborador(&self.tx, colaborador)
    }

    fn get_colaborador(&self, id: u64, org: Option<&str>) -> Result<Option<ColaboradorRecord>> {
        colaborador::get_colaborador(&self.tx, id, org)
    }

    fn list_colaboradores(&self, query: &Query) -> Result<Vec<ColaboradorRecord>> {
        colaborador::list_colaboradores(&self.tx, query)
    }

    fn count_colaboradores(&self, query: &Query) -> Result<u64> {
        colaborador::count_colaboradores(&self.tx, query)
    }

    fn update_colaborador(
        &self,
        colaborador: ColaboradorRecord,
        org: Option<&str>,
    ) -> Result<Option<ColaboradorRecord>> {
        colaborador::update_colaborador(&self.tx, colaborador, org)
    }

    fn delete_colaborador(&self, id: u64, org: Option<&str>) -> Result<bool> {
        colaborador::delete_colaborador(&self.tx, id, org)
    }

    fn create_exame_cli(&self, exame_cli: ExameCliRecord) -> Result<ExameCliRecord> {
        exame_cli::create_exame_cli(&self.tx, exame_cli)
    }

    fn get_exame_cli(&self, id: u64, org: Option<&str>) -> Result<Option<ExameCliRecord>> {
        exame_cli::get_exame_cli(&self.tx, id, org)
    }

    fn get_exame_cli_by_pair(
        &self,
        client_id: u64,
        exame_id: u64,
        org: Option<&str>,
    ) -> Result<Option<ExameCliRecord>> {
        exame_cli::get_exame_cli_by_pair(&self.tx, client_id, exame_id, org)
    }

    fn list_exames_cli(&self, query: &Query) -> Result<Vec<ExameCliRecord>> {
        exame_cli::list_exames_cli(&self.tx, query)
    }

    fn count_exames_cli(&self, query: &Query) -> Result<u64> {
        exame_cli::count_exames_cli(&self.tx, query)
    }

    fn update_exame_cli(
        &self,
        exame_cli: ExameCliRecord,
        org: Option<&str>,
    ) -> Result<Option<ExameCliRecord>> {
        exame_cli::update_exame_cli(&self.tx, exame_cli, org)
    }

    fn delete_exame_cli(&self, id: u64, org: Option<&str>) -> Result<bool> {
        exame_cli::delete_exame_cli(&self.tx, id, org)
    }

    fn create_anamnese(&self, anamnese: AnamneseRecord) -> Result<AnamneseRecord> {
        anamnese::create_anamnese(&self.tx, anamnese)
    }

    fn get_anamnese(&self, id: u64, org: Option<&str>) -> Result<Option<AnamneseRecord>> {
        anamnese::get_anamnese(&self.tx, id, org)
    }

    fn list_anamneses(&self, query: &Query) -> Result<Vec<AnamneseRecord>> {
        anamnese::list_anamneses(&self.tx, query)
    }

    fn count_anamneses(&self, query: &Query) -> Result<u64> {
        anamnese::count_anamneses(&self.tx, query)
    }

    fn update_anamnese(
        &self,
        anamnese: AnamneseRecord,
        org: Option<&str>,
    ) -> Result<Option<AnamneseRecord>> {
        anamnese::update_anamnese(&self.tx, anamnese, org)
    }

    fn delete_anamnese(&self, id: u64, org: Option<&str>) -> Result<bool> {
        anamnese::delete_anamnese(&self.tx, id, org)
    }

    fn create_anamnese_item(&self, item: AnamneseItemRecord) -> Result<AnamneseItemRecord> {
        anamnese::create_anamnese_item(&self.tx, item)
    }

    fn list_anamnese_items(&self, anamnese_id: u64) -> Result<Vec<AnamneseItemRecord>> {
        anamnese::list_anamnese_items(&self.tx, anamnese_id)
    }

    fn create_conta(&self, conta: ContaRecord) -> Result<ContaRecord> {
        conta::create_conta(&self.tx, conta)
    }

    fn get_conta(&self, id: u64, org: Option<&str>) -> Result<Option<ContaRecord>> {
        conta::get_conta(&self.tx, id, org)
    }

    fn list_contas(&self, query: &Query) -> Result<Vec<ContaRecord>> {
        conta::list_contas(&self.tx, query)
    }

    fn count_contas(&self, query: &Query) -> Result<u64> {
        conta::count_contas(&self.tx, query)
    }

    fn update_conta(&self, conta: ContaRecord, org: Option<&str>) -> Result<Option<ContaRecord>> {
        conta::update_conta(&self.tx, conta, org)
    }

    fn delete_conta(&self, id: u64, org: Option<&str>) -> Result<bool> {
        conta::delete_conta(&self.tx, id, org)
    }

    fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }

    fn rollback(self) -> Result<()> {
        self.tx.rollback()?;
        Ok(())
    }
}
