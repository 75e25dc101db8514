use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};

use crate::server::db::ExameRecord;
use crate::time::current_timestamp;
use crate::types::request::Query;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS exame (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nome TEXT NOT NULL,
    valor INTEGER NOT NULL,
    organization_id TEXT NOT NULL,
    create_time INTEGER NOT NULL,
    update_time INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_exame_org ON exame(organization_id);
CREATE INDEX IF NOT EXISTS idx_exame_nome ON exame(nome);
"#;

pub const SORT_COLUMNS: &[&str] = &["nome", "valor", "create_time", "update_time"];

const FIELDS: &str = "id, nome, valor, organization_id, create_time, update_time";

pub fn create_exame_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

fn row_to_exame(row: &Row) -> rusqlite::Result<ExameRecord> {
    Ok(ExameRecord {
        id: row.get(0)?,
        nome: row.get(1)?,
        valor: row.get(2)?,
        organization_id: row.get(3)?,
        create_time: row.get(4)?,
        update_time: row.get(5)?,
    })
}

pub fn create_exame(tx: &Transaction, mut exame: ExameRecord) -> Result<ExameRecord> {
    let now = current_timestamp();
    tx.execute(
        "INSERT INTO exame (nome, valor, organization_id, create_time, update_time) VALUES (?, ?, ?, ?, ?)",
        params![exame.nome, exame.valor, exame.organization_id, now, now],
    )?;
    exame.id = tx.last_insert_rowid() as u64;
    exame.create_time = now;
    exame.update_time = now;
    Ok(exame)
}

pub fn get_exame(tx: &Transaction, id: u64, org: Option<&str>) -> Result<Option<ExameRecord>> {
    let mut sql = format!("SELECT {FIELDS} FROM exame WHERE id = ?");
    let params = if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        vec![Value::Integer(id as i64), Value::Text(String::from(org))]
    } else {
        vec![Value::Integer(id as i64)]
    };

    let mut stmt = tx.prepare(&sql)?;
    let exame = stmt
        .query_row(params_from_iter(params), row_to_exame)
        .optional()?;
    Ok(exame)
}

pub fn list_exames(tx: &Transaction, query: &Query) -> Result<Vec<ExameRecord>> {
    let where_clause = query.generate_where("nome");
    let order_clause = query.generate_order(SORT_COLUMNS, "id");
    let limit_clause = query.generate_limit();
    let params = query.params();

    let sql = format!("SELECT {FIELDS} FROM exame {where_clause}{order_clause}{limit_clause}");
    let mut stmt = tx.prepare(&sql)?;
    let exames = stmt
        .query_map(params_from_iter(params.iter()), row_to_exame)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(exames)
}

pub fn count_exames(tx: &Transaction, query: &Query) -> Result<u64> {
    let where_clause = query.generate_where("nome");
    let params = query.where_params();

    let sql = format!("SELECT COUNT(*) FROM exame {where_clause}");
    let mut stmt = tx.prepare(&sql)?;
    let count: i64 = stmt.query_row(params_from_iter(params), |row| row.get(0))?;
    Ok(count as u64)
}

pub fn update_exame(
    tx: &Transaction,
    mut exame: ExameRecord,
    org: Option<&str>,
) -> Result<Option<ExameRecord>> {
    let now = current_timestamp();
    let mut sql = String::from("UPDATE exame SET nome = ?, valor = ?, update_time = ? WHERE id = ?");
    let mut params = vec![
        Value::Text(exame.nome.clone()),
        Value::Integer(exame.valor as i64),
        Value::Integer(now as i64),
        Value::Integer(exame.id as i64),
    ];
    if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        params.push(Value::Text(String::from(org)));
    }

    let count = tx.execute(&sql, params_from_iter(params))?;
    if count == 0 {
        return Ok(None);
    }
    exame.update_time = now;
    Ok(Some(exame))
}

pub fn delete_exame(tx: &Transaction, id: u64, org: Option<&str>) -> Result<bool> {
    let mut sql = String::from("DELETE FROM exame WHERE id = ?");
    let params = if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        vec![Value::Integer(id as i64), Value::Text(String::from(org))]
    } else {
        vec![Value::Integer(id as i64)]
    };

    let count = tx.execute(&sql, params_from_iter(params))?;
    Ok(count > 0)
}
