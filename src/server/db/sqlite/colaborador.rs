use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};

use crate::server::db::ColaboradorRecord;
use crate::time::current_timestamp;
use crate::types::request::Query;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS colaborador (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nome TEXT NOT NULL,
    cpf TEXT NOT NULL,
    data_nascimento TEXT NOT NULL,
    funcao TEXT NOT NULL,
    client_id INTEGER NOT NULL,
    organization_id TEXT NOT NULL,
    create_time INTEGER NOT NULL,
    update_time INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_colaborador_org ON colaborador(organization_id);
CREATE INDEX IF NOT EXISTS idx_colaborador_nome ON colaborador(nome);
CREATE INDEX IF NOT EXISTS idx_colaborador_client ON colaborador(client_id);
"#;

pub const SORT_COLUMNS: &[&str] = &["nome", "cpf", "funcao", "create_time", "update_time"];

const FIELDS: &str =
    "id, nome, cpf, data_nascimento, funcao, client_id, organization_id, create_time, update_time";

pub fn create_colaborador_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

fn row_to_colaborador(row: &Row) -> rusqlite::Result<ColaboradorRecord> {
    Ok(ColaboradorRecord {
        id: row.get(0)?,
        nome: row.get(1)?,
        cpf: row.get(2)?,
        data_nascimento: row.get(3)?,
        funcao: row.get(4)?,
        client_id: row.get(5)?,
        organization_id: row.get(6)?,
        create_time: row.get(7)?,
        update_time: row.get(8)?,
    })
}

pub fn create_colaborador(
    tx: &Transaction,
    mut colaborador: ColaboradorRecord,
) -> Result<ColaboradorRecord> {
    let now = current_timestamp();
    tx.execute(
        "INSERT INTO colaborador (nome, cpf, data_nascimento, funcao, client_id, organization_id, create_time, update_time) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            colaborador.nome,
            colaborador.cpf,
            colaborador.data_nascimento,
            colaborador.funcao,
            colaborador.client_id,
            colaborador.organization_id,
            now,
            now
        ],
    )?;
    colaborador.id = tx.last_insert_rowid() as u64;
    colaborador.create_time = now;
    colaborador.update_time = now;
    Ok(colaborador)
}

pub fn get_colaborador(
    tx: &Transaction,
    id: u64,
    org: Option<&str>,
) -> Result<Option<ColaboradorRecord>> {
    let mut sql = format!("SELECT {FIELDS} FROM colaborador WHERE id = ?");
    let params = if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        vec![Value::Integer(id as i64), Value::Text(String::from(org))]
    } else {
        vec![Value::Integer(id as i64)]
    };

    let mut stmt = tx.prepare(&sql)?;
    let colaborador = stmt
        .query_row(params_from_iter(params), row_to_colaborador)
        .optional()?;
    Ok(colaborador)
}

pub fn list_colaboradores(tx: &Transaction, query: &Query) -> Result<Vec<ColaboradorRecord>> {
    let where_clause = query.generate_where("nome");
    let order_clause = query.generate_order(SORT_COLUMNS, "id");
    let limit_clause = query.generate_limit();
    let params = query.params();

    let sql =
        format!("SELECT {FIELDS} FROM colaborador {where_clause}{order_clause}{limit_clause}");
    let mut stmt = tx.prepare(&sql)?;
    let colaboradores = stmt
        .query_map(params_from_iter(params.iter()), row_to_colaborador)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(colaboradores)
}

pub fn count_colaboradores(tx: &Transaction, query: &Query) -> Result<u64> {
    let where_clause = query.generate_where("nome");
    let params = query.where_params();

    let sql = format!("SELECT COUNT(*) FROM colaborador {where_clause}");
    let mut stmt = tx.prepare(&sql)?;
    let count: i64 = stmt.query_row(params_from_iter(params), |row| row.get(0))?;
    Ok(count as u64)
}

pub fn update_colaborador(
    tx: &Transaction,
    mut colaborador: ColaboradorRecord,
    org: Option<&str>,
) -> Result<Option<ColaboradorRecord>> {
    let now = current_timestamp();
    let mut sql = String::from(
        "UPDATE colaborador SET nome = ?, cpf = ?, data_nascimento = ?, funcao = ?, client_id = ?, update_time = ? WHERE id = ?",
    );
    let mut params = vec![
        Value::Text(colaborador.nome.clone()),
        Value::Text(colaborador.cpf.clone()),
        Value::Text(colaborador.data_nascimento.clone()),
        Value::Text(colaborador.funcao.clone()),
        Value::Integer(colaborador.client_id as i64),
        Value::Integer(now as i64),
        Value::Integer(colaborador.id as i64),
    ];
    if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        params.push(Value::Text(String::from(org)));
    }

    let count = tx.execute(&sql, params_from_iter(params))?;
    if count == 0 {
        return Ok(None);
    }
    colaborador.update_time = now;
    Ok(Some(colaborador))
}

pub fn delete_colaborador(tx: &Transaction, id: u64, org: Option<&str>) -> Result<bool> {
    let mut sql = String::from("DELETE FROM colaborador WHERE id = ?");
    let params = if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        vec![Value::Integer(id as i64), Value::Text(String::from(org))]
    } else {
        vec![Value::Integer(id as i64)]
    };

    let count = tx.execute(&sql, params_from_iter(params))?;
    Ok(count > 0)
}
