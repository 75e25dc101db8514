pub mod sqlite;

#[cfg(test)]
mod tests;

pub mod config;
pub mod factory;

use std::cell::RefCell;
use std::sync::Mutex;

use anyhow::{bail, Result};
use sqlite::{Sqlite, SqliteTransaction};

use crate::types::request::Query;

/// Database connection trait that can create transactions
pub trait Connection<'a, T>
where
    T: Transaction + 'a,
{
    /// Creates a new transaction from the connection
    fn transaction(&'a mut self) -> Result<T>;
}

/// Database transaction trait that defines all database operations.
///
/// Every read and write on a domain row takes an `org` scope: `Some(id)`
/// restricts the statement to that organization, `None` is unscoped and
/// reserved for super_admin callers.
pub trait Transaction {
    // Organization operations
    /// Inserts an organization unless one with the same id already exists.
    /// Returns whether a row was actually inserted.
    fn insert_organization_if_absent(&self, org: &OrganizationRecord) -> Result<bool>;
    /// Checks if an organization exists
    fn is_organization_exists(&self, id: &str) -> Result<bool>;
    /// Retrieves an organization by id
    fn get_organization(&self, id: &str) -> Result<Option<OrganizationRecord>>;
    /// Lists all organizations, ordered by name
    fn list_organizations(&self) -> Result<Vec<OrganizationRecord>>;
    /// Renames an organization
    fn update_organization_name(&self, id: &str, name: &str)
        -> Result<Option<OrganizationRecord>>;

    // Client operations
    fn create_client(&self, client: ClientRecord) -> Result<ClientRecord>;
    fn get_client(&self, id: u64, org: Option<&str>) -> Result<Option<ClientRecord>>;
    fn list_clients(&self, query: &Query) -> Result<Vec<ClientRecord>>;
    fn count_clients(&self, query: &Query) -> Result<u64>;
    fn update_client(&self, client: ClientRecord, org: Option<&str>)
        -> Result<Option<ClientRecord>>;
    fn delete_client(&self, id: u64, org: Option<&str>) -> Result<bool>;

    // Exame operations
    fn create_exame(&self, exame: ExameRecord) -> Result<ExameRecord>;
    fn get_exame(&self, id: u64, org: Option<&str>) -> Result<Option<ExameRecord>>;
    fn list_exames(&self, query: &Query) -> Result<Vec<ExameRecord>>;
    fn count_exames(&self, query: &Query) -> Result<u64>;
    fn update_exame(&self, exame: ExameRecord, org: Option<&str>) -> Result<Option<ExameRecord>>;
    fn delete_exame(&self, id: u64, org: Option<&str>) -> Result<bool>;

    // Medico operations
    fn create_medico(&self, medico: MedicoRecord) -> Result<MedicoRecord>;
    fn get_medico(&self, id: u64, org: Option<&str>) -> Result<Option<MedicoRecord>>;
    fn list_medicos(&self, query: &Query) -> Result<Vec<MedicoRecord>>;
    fn count_medicos(&self, query: &Query) -> Result<u64>;
    fn update_medico(&self, medico: MedicoRecord, org: Option<&str>)
        -> Result<Option<MedicoRecord>>;
    fn delete_medico(&self, id: u64, org: Option<&str>) -> Result<bool>;

    // Colaborador operations
    fn create_colaborador(&self, colaborador: ColaboradorRecord) -> Result<ColaboradorRecord>;
    fn get_colaborador(&self, id: u64, org: Option<&str>) -> Result<Option<ColaboradorRecord>>;
    fn list_colaboradores(&self, query: &Query) -> Result<Vec<ColaboradorRecord>>;
    fn count_colaboradores(&self, query: &Query) -> Result<u64>;
    fn update_colaborador(
        &self,
        colaborador: ColaboradorRecord,
        org: Option<&str>,
    ) -> Result<Option<ColaboradorRecord>>;
    fn delete_colaborador(&self, id: u64, org: Option<&str>) -> Result<bool>;

    // ExameCli operations
    fn create_exame_cli(&self, exame_cli: ExameCliRecord) -> Result<ExameCliRecord>;
    fn get_exame_cli(&self, id: u64, org: Option<&str>) -> Result<Option<ExameCliRecord>>;
    /// Retrieves the price override for a (client, exame) pair
    fn get_exame_cli_by_pair(
        &self,
        client_id: u64,
        exame_id: u64,
        org: Option<&str>,
    ) -> Result<Option<ExameCliRecord>>;
    fn list_exames_cli(&self, query: &Query) -> Result<Vec<ExameCliRecord>>;
    fn count_exames_cli(&self, query: &Query) -> Result<u64>;
    fn update_exame_cli(
        &self,
        exame_cli: ExameCliRecord,
        org: Option<&str>,
    ) -> Result<Option<ExameCliRecord>>;
    fn delete_exame_cli(&self, id: u64, org: Option<&str>) -> Result<bool>;

    // Anamnese operations
    fn create_anamnese(&self, anamnese: AnamneseRecord) -> Result<AnamneseRecord>;
    fn get_anamnese(&self, id: u64, org: Option<&str>) -> Result<Option<AnamneseRecord>>;
    fn list_anamneses(&self, query: &Query) -> Result<Vec<AnamneseRecord>>;
    fn count_anamneses(&self, query: &Query) -> Result<u64>;
    fn update_anamnese(
        &self,
        anamnese: AnamneseRecord,
        org: Option<&str>,
    ) -> Result<Option<AnamneseRecord>>;
    /// Deletes an anamnese and its items
    fn delete_anamnese(&self, id: u64, org: Option<&str>) -> Result<bool>;
    fn create_anamnese_item(&self, item: AnamneseItemRecord) -> Result<AnamneseItemRecord>;
    fn list_anamnese_items(&self, anamnese_id: u64) -> Result<Vec<AnamneseItemRecord>>;

    // ContasAPagar operations
    fn create_conta(&self, conta: ContaRecord) -> Result<ContaRecord>;
    fn get_conta(&self, id: u64, org: Option<&str>) -> Result<Option<ContaRecord>>;
    fn list_contas(&self, query: &Query) -> Result<Vec<ContaRecord>>;
    fn count_contas(&self, query: &Query) -> Result<u64>;
    fn update_conta(&self, conta: ContaRecord, org: Option<&str>) -> Result<Option<ContaRecord>>;
    fn delete_conta(&self, id: u64, org: Option<&str>) -> Result<bool>;

    /// Commits the transaction
    fn commit(self) -> Result<()>;
    /// Rolls back the transaction
    fn rollback(self) -> Result<()>;
}

/// Record structure for organizations. The id is issued by the external
/// identity provider and mirrored as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationRecord {
    pub id: String,
    pub name: String,
    pub create_time: u64,
    pub update_time: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientRecord {
    pub id: u64,
    pub razao_social: String,
    pub cpf: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub endereco: Option<String>,
    pub organization_id: String,
    pub create_time: u64,
    pub update_time: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExameRecord {
    pub id: u64,
    pub nome: String,
    /// Catalog price in centavos
    pub valor: u64,
    pub organization_id: String,
    pub create_time: u64,
    pub update_time: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MedicoRecord {
    pub id: u64,
    pub nome: String,
    pub crm: String,
    pub especialidade: Option<String>,
    pub organization_id: String,
    pub create_time: u64,
    pub update_time: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColaboradorRecord {
    pub id: u64,
    pub nome: String,
    pub cpf: String,
    pub data_nascimento: String,
    pub funcao: String,
    pub client_id: u64,
    pub organization_id: String,
    pub create_time: u64,
    pub update_time: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExameCliRecord {
    pub id: u64,
    pub client_id: u64,
    pub exame_id: u64,
    /// Override price in centavos for this client
    pub valor: u64,
    pub organization_id: String,
    pub create_time: u64,
    pub update_time: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnamneseRecord {
    pub id: u64,
    pub colaborador_id: u64,
    pub medico_id: u64,
    pub tipo: String,
    pub status: String,
    pub organization_id: String,
    pub create_time: u64,
    pub update_time: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnamneseItemRecord {
    pub id: u64,
    pub anamnese_id: u64,
    pub exame_id: u64,
    /// Price in centavos snapshotted when the order was created
    pub valor: u64,
    pub organization_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContaRecord {
    pub id: u64,
    pub descricao: String,
    pub valor: u64,
    pub vencimento: String,
    pub pago: bool,
    pub organization_id: String,
    pub create_time: u64,
    pub update_time: u64,
}

/// Main database structure supporting multiple backend implementations
pub struct Database {
    ctx: Mutex<DatabaseContext>,
}

/// Enum representing different supported database connections
pub enum UnionConnection {
    /// SQLite database connection
    Sqlite(Sqlite),
}

enum UnionTransaction<'a> {
    Sqlite(SqliteTransaction<'a>),
}

struct DatabaseContext {
    conn: RefCell<UnionConnection>,
}

impl Database {
    pub fn new(conn: UnionConnection) -> Self {
        Self {
            ctx: Mutex::new(DatabaseContext {
                conn: RefCell::new(conn),
            }),
        }
    }

    /// Creates an in-memory database for tests.
    #[cfg(test)]
    pub fn new_test() -> Self {
        let sqlite = Sqlite::memory().expect("open in-memory sqlite");
        Self::new(UnionConnection::Sqlite(sqlite))
    }

    /// Executes a function within a transaction context.
    ///
    /// If the function `f` succeeds, the transaction is committed; if it
    /// fails, the transaction is rolled back. Errors from commit/rollback
    /// themselves are returned as-is.
    pub fn with_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn Transaction) -> Result<T>,
    {
        let ctx = match self.ctx.lock() {
            Ok(ctx) => ctx,
            Err(e) => bail!("failed to lock database: {e:#}"),
        };
        let mut conn = ctx.conn.borrow_mut();
        let tx = conn.transaction()?;

        let result = f(&tx);

        if result.is_ok() {
            tx.commit()
        } else {
            tx.rollback()
        }?;

        result
    }
}

impl<'a> Connection<'a, UnionTransaction<'a>> for UnionConnection {
    fn transaction(&'a mut self) -> Result<UnionTransaction<'a>> {
        match self {
            UnionConnection::Sqlite(sqlite) => sqlite.transaction().map(UnionTransaction::Sqlite),
        }
    }
}

impl Transaction for UnionTransaction<'_> {
    fn insert_organization_if_absent(&self, org: &OrganizationRecord) -> Result<bool> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.insert_organization_if_absent(org),
        }
    }

    fn is_organization_exists(&self, id: &str) -> Result<bool> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.is_organization_exists(id),
        }
    }

    fn get_organization(&self, id: &str) -> Result<Option<OrganizationRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_organization(id),
        }
    }

    fn list_organizations(&self) -> Result<Vec<OrganizationRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.list_organizations(),
        }
    }

    fn update_organization_name(
        &self,
        id: &str,
        name: &str,
    ) -> Result<Option<OrganizationRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.update_organization_name(id, name),
        }
    }

    fn create_client(&self, client: ClientRecord) -> Result<ClientRecord> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_client(client),
        }
    }

    fn get_client(&self, id: u64, org: Option<&str>) -> Result<Option<ClientRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_client(id, org),
        }
    }

    fn list_clients(&self, query: &Query) -> Result<Vec<ClientRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.list_clients(query),
        }
    }

    fn count_clients(&self, query: &Query) -> Result<u64> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.count_clients(query),
        }
    }

    fn update_client(
        &self,
        client: ClientRecord,
        org: Option<&str>,
    ) -> Result<Option<ClientRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.update_client(client, org),
        }
    }

    fn delete_client(&self, id: u64, org: Option<&str>) -> Result<bool> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.delete_client(id, org),
        }
    }

    fn create_exame(&self, exame: ExameRecord) -> Result<ExameRecord> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_exame(exame),
        }
    }

    fn get_exame(&self, id: u64, org: Option<&str>) -> Result<Option<ExameRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_exame(id, org),
        }
    }

    fn list_exames(&self, query: &Query) -> Result<Vec<ExameRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.list_exames(query),
        }
    }

    fn count_exames(&self, query: &Query) -> Result<u64> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.count_exames(query),
        }
    }

    fn update_exame(&self, exame: ExameRecord, org: Option<&str>) -> Result<Option<ExameRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.update_exame(exame, org),
        }
    }

    fn delete_exame(&self, id: u64, org: Option<&str>) -> Result<bool> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.delete_exame(id, org),
        }
    }

    fn create_medico(&self, medico: MedicoRecord) -> Result<MedicoRecord> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_medico(medico),
        }
    }

    fn get_medico(&self, id: u64, org: Option<&str>) -> Result<Option<MedicoRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_medico(id, org),
        }
    }

    fn list_medicos(&self, query: &Query) -> Result<Vec<MedicoRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.list_medicos(query),
        }
    }

    fn count_medicos(&self, query: &Query) -> Result<u64> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.count_medicos(query),
        }
    }

    fn update_medico(
        &self,
        medico: MedicoRecord,
        org: Option<&str>,
    ) -> Result<Option<MedicoRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.update_medico(medico, org),
        }
    }

    fn delete_medico(&self, id: u64, org: Option<&str>) -> Result<bool> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.delete_medico(id, org),
        }
    }

    fn create_colaborador(&self, colaborador: ColaboradorRecord) -> Result<ColaboradorRecord> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_colaborador(colaborador),
        }
    }

    fn get_colaborador(&self, id: u64, org: Option<&str>) -> Result<Option<ColaboradorRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_colaborador(id, org),
        }
    }

    fn list_colaboradores(&self, query: &Query) -> Result<Vec<ColaboradorRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.list_colaboradores(query),
        }
    }

    fn count_colaboradores(&self, query: &Query) -> Result<u64> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.count_colaboradores(query),
        }
    }

    fn update_colaborador(
        &self,
        colaborador: ColaboradorRecord,
        org: Option<&str>,
    ) -> Result<Option<ColaboradorRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.update_colaborador(colaborador, org),
        }
    }

    fn delete_colaborador(&self, id: u64, org: Option<&str>) -> Result<bool> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.delete_colaborador(id, org),
        }
    }

    fn create_exame_cli(&self, exame_cli: ExameCliRecord) -> Result<ExameCliRecord> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_exame_cli(exame_cli),
        }
    }

    fn get_exame_cli(&self, id: u64, org: Option<&str>) -> Result<Option<ExameCliRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_exame_cli(id, org),
        }
    }

    fn get_exame_cli_by_pair(
        &self,
        client_id: u64,
        exame_id: u64,
        org: Option<&str>,
    ) -> Result<Option<ExameCliRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_exame_cli_by_pair(client_id, exame_id, org),
        }
    }

    fn list_exames_cli(&self, query: &Query) -> Result<Vec<ExameCliRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.list_exames_cli(query),
        }
    }

    fn count_exames_cli(&self, query: &Query) -> Result<u64> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.count_exames_cli(query),
        }
    }

    fn update_exame_cli(
        &self,
        exame_cli: ExameCliRecord,
        org: Option<&str>,
    ) -> Result<Option<ExameCliRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.update_exame_cli(exame_cli, org),
        }
    }

    fn delete_exame_cli(&self, id: u64, org: Option<&str>) -> Result<bool> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.delete_exame_cli(id, org),
        }
    }

    fn create_anamnese(&self, anamnese: AnamneseRecord) -> Result<AnamneseRecord> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_anamnese(anamnese),
        }
    }

    fn get_anamnese(&self, id: u64, org: Option<&str>) -> Result<Option<AnamneseRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_anamnese(id, org),
        }
    }

    fn list_anamneses(&self, query: &Query) -> Result<Vec<AnamneseRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.list_anamneses(query),
        }
    }

    fn count_anamneses(&self, query: &Query) -> Result<u64> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.count_anamneses(query),
        }
    }

    fn update_anamnese(
        &self,
        anamnese: AnamneseRecord,
        org: Option<&str>,
    ) -> Result<Option<AnamneseRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.update_anamnese(anamnese, org),
        }
    }

    fn delete_anamnese(&self, id: u64, org: Option<&str>) -> Result<bool> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.delete_anamnese(id, org),
        }
    }

    fn create_anamnese_item(&self, item: AnamneseItemRecord) -> Result<AnamneseItemRecord> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_anamnese_item(item),
        }
    }

    fn list_anamnese_items(&self, anamnese_id: u64) -> Result<Vec<AnamneseItemRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.list_anamnese_items(anamnese_id),
        }
    }

    fn create_conta(&self, conta: ContaRecord) -> Result<ContaRecord> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.create_conta(conta),
        }
    }

    fn get_conta(&self, id: u64, org: Option<&str>) -> Result<Option<ContaRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.get_conta(id, org),
        }
    }

    fn list_contas(&self, query: &Query) -> Result<Vec<ContaRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.list_contas(query),
        }
    }

    fn count_contas(&self, query: &Query) -> Result<u64> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.count_contas(query),
        }
    }

    fn update_conta(&self, conta: ContaRecord, org: Option<&str>) -> Result<Option<ContaRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.update_conta(conta, org),
        }
    }

    fn delete_conta(&self, id: u64, org: Option<&str>) -> Result<bool> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.delete_conta(id, org),
        }
    }

    fn commit(self) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.commit(),
        }
    }

    fn rollback(self) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.rollback(),
        }
    }
}
