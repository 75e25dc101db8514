use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};

use crate::server::db::MedicoRecord;
use crate::time::current_timestamp;
use crate::types::request::Query;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS medico (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nome TEXT NOT NULL,
    crm TEXT NOT NULL,
    especialidade TEXT,
    organization_id TEXT NOT NULL,
    create_time INTEGER NOT NULL,
    update_time INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_medico_org ON medico(organization_id);
CREATE INDEX IF NOT EXISTS idx_medico_nome ON medico(nome);
"#;

pub const SORT_COLUMNS: &[&str] = &["nome", "crm", "create_time", "update_time"];

const FIELDS: &str = "id, nome, crm, especialidade, organization_id, create_time, update_time";

pub fn create_medico_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

fn row_to_medico(row: &Row) -> rusqlite::Result<MedicoRecord> {
    Ok(MedicoRecord {
        id: row.get(0)?,
        nome: row.get(1)?,
        crm: row.get(2)?,
        especialidade: row.get(3)?,
        organization_id: row.get(4)?,
        create_time: row.get(5)?,
        update_time: row.get(6)?,
    })
}

pub fn create_medico(tx: &Transaction, mut medico: MedicoRecord) -> Result<MedicoRecord> {
    let now = current_timestamp();
    tx.execute(
        "INSERT INTO medico (nome, crm, especialidade, organization_id, create_time, update_time) VALUES (?, ?, ?, ?, ?, ?)",
        params![
            medico.nome,
            medico.crm,
            medico.especialidade,
            medico.organization_id,
            now,
            now
        ],
    )?;
    medico.id = tx.last_insert_rowid() as u64;
    medico.create_time = now;
    medico.update_time = now;
    Ok(medico)
}

pub fn get_medico(tx: &Transaction, id: u64, org: Option<&str>) -> Result<Option<MedicoRecord>> {
    let mut sql = format!("SELECT {FIELDS} FROM medico WHERE id = ?");
    let params = if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        vec![Value::Integer(id as i64), Value::Text(String::from(org))]
    } else {
        vec![Value::Integer(id as i64)]
    };

    let mut stmt = tx.prepare(&sql)?;
    let medico = stmt
        .query_row(params_from_iter(params), row_to_medico)
        .optional()?;
    Ok(medico)
}

pub fn list_medicos(tx: &Transaction, query: &Query) -> Result<Vec<MedicoRecord>> {
    let where_clause = query.generate_where("nome");
    let order_clause = query.generate_order(SORT_COLUMNS, "id");
    let limit_clause = query.generate_limit();
    let params = query.params();

    let sql = format!("SELECT {FIELDS} FROM medico {where_clause}{order_clause}{limit_clause}");
    let mut stmt = tx.prepare(&sql)?;
    let medicos = stmt
        .query_map(params_from_iter(params.iter()), row_to_medico)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(medicos)
}

pub fn count_medicos(tx: &Transaction, query: &Query) -> Result<u64> {
    let where_clause = query.generate_where("nome");
    let params = query.where_params();

    let sql = format!("SELECT COUNT(*) FROM medico {where_clause}");
    let mut stmt = tx.prepare(&sql)?;
    let count: i64 = stmt.query_row(params_from_iter(params), |row| row.get(0))?;
    Ok(count as u64)
}

pub fn update_medico(
    tx: &Transaction,
    mut medico: MedicoRecord,
    org: Option<&str>,
) -> Result<Option<MedicoRecord>> {
    let now = current_timestamp();
    let mut sql = String::from(
        "UPDATE medico SET nome = ?, crm = ?, especialidade = ?, update_time = ? WHERE id = ?",
    );
    let mut params = vec![
        Value::Text(medico.nome.clone()),
        Value::Text(medico.crm.clone()),
        Value::from(medico.especialidade.clone()),
        Value::Integer(now as i64),
        Value::Integer(medico.id as i64),
    ];
    if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        params.push(Value::Text(String::from(org)));
    }

    let count = tx.execute(&sql, params_from_iter(params))?;
    if count == 0 {
        return Ok(None);
    }
    medico.update_time = now;
    Ok(Some(medico))
}

pub fn delete_medico(tx: &Transaction, id: u64, org: Option<&str>) -> Result<bool> {
    let mut sql = String::from("DELETE FROM medico WHERE id = ?");
    let params = if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        vec![Value::Integer(id as i64), Value::Text(String::from(org))]
    } else {
        vec![Value::Integer(id as i64)]
    };

    let count = tx.execute(&sql, params_from_iter(params))?;
    Ok(count > 0)
}
