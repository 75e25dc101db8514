use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};

use crate::server::db::ExameCliRecord;
use crate::time::current_timestamp;
use crate::types::request::Query;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS exame_cli (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    client_id INTEGER NOT NULL,
    exame_id INTEGER NOT NULL,
    valor INTEGER NOT NULL,
    organization_id TEXT NOT NULL,
    create_time INTEGER NOT NULL,
    update_time INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_exame_cli_org ON exame_cli(organization_id);
CREATE UNIQUE INDEX IF NOT EXISTS idx_exame_cli_pair ON exame_cli(client_id, exame_id, organization_id);
"#;

pub const SORT_COLUMNS: &[&str] = &["valor", "create_time", "update_time"];

const FIELDS: &str = "id, client_id, exame_id, valor, organization_id, create_time, update_time";

pub fn create_exame_cli_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

fn row_to_exame_cli(row: &Row) -> rusqlite::Result<ExameCliRecord> {
    Ok(ExameCliRecord {
        id: row.get(0)?,
        client_id: row.get(1)?,
        exame_id: row.get(2)?,
        valor: row.get(3)?,
        organization_id: row.get(4)?,
        create_time: row.get(5)?,
        update_time: row.get(6)?,
    })
}

pub fn create_exame_cli(
    tx: &Transaction,
    mut exame_cli: ExameCliRecord,
) -> Result<ExameCliRecord> {
    let now = current_timestamp();
    tx.execute(
        "INSERT INTO exame_cli (client_id, exame_id, valor, organization_id, create_time, update_time) VALUES (?, ?, ?, ?, ?, ?)",
        params![
            exame_cli.client_id,
            exame_cli.exame_id,
            exame_cli.valor,
            exame_cli.organization_id,
            now,
            now
        ],
    )?;
    exame_cli.id = tx.last_insert_rowid() as u64;
    exame_cli.create_time = now;
    exame_cli.update_time = now;
    Ok(exame_cli)
}

pub fn get_exame_cli(
    tx: &Transaction,
    id: u64,
    org: Option<&str>,
) -> Result<Option<ExameCliRecord>> {
    let mut sql = format!("SELECT {FIELDS} FROM exame_cli WHERE id = ?");
    let params = if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        vec![Value::Integer(id as i64), Value::Text(String::from(org))]
    } else {
        vec![Value::Integer(id as i64)]
    };

    let mut stmt = tx.prepare(&sql)?;
    let exame_cli = stmt
        .query_row(params_from_iter(params), row_to_exame_cli)
        .optional()?;
    Ok(exame_cli)
}

pub fn get_exame_cli_by_pair(
    tx: &Transaction,
    client_id: u64,
    exame_id: u64,
    org: Option<&str>,
) -> Result<Option<ExameCliRecord>> {
    let mut sql = format!("SELECT {FIELDS} FROM exame_cli WHERE client_id = ? AND exame_id = ?");
    let params = if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        vec![
            Value::Integer(client_id as i64),
            Value::Integer(exame_id as i64),
            Value::Text(String::from(org)),
        ]
    } else {
        vec![
            Value::Integer(client_id as i64),
            Value::Integer(exame_id as i64),
        ]
    };

    let mut stmt = tx.prepare(&sql)?;
    let exame_cli = stmt
        .query_row(params_from_iter(params), row_to_exame_cli)
        .optional()?;
    Ok(exame_cli)
}

pub fn list_exames_cli(tx: &Transaction, query: &Query) -> Result<Vec<ExameCliRecord>> {
    // Price rows have no free-text display field, only the organization
    // filter applies.
    let mut query = query.clone();
    query.search = None;

    let where_clause = query.generate_where("valor");
    let order_clause = query.generate_order(SORT_COLUMNS, "id");
    let limit_clause = query.generate_limit();
    let params = query.params();

    let sql = format!("SELECT {FIELDS} FROM exame_cli {where_clause}{order_clause}{limit_clause}");
    let mut stmt = tx.prepare(&sql)?;
    let exames_cli = stmt
        .query_map(params_from_iter(params.iter()), row_to_exame_cli)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(exames_cli)
}

pub fn count_exames_cli(tx: &Transaction, query: &Query) -> Result<u64> {
    let mut query = query.clone();
    query.search = None;

    let where_clause = query.generate_where("valor");
    let params = query.where_params();

    let sql = format!("SELECT COUNT(*) FROM exame_cli {where_clause}");
    let mut stmt = tx.prepare(&sql)?;
    let count: i64 = stmt.query_row(params_from_iter(params), |row| row.get(0))?;
    Ok(count as u64)
}

pub fn update_exame_cli(
    tx: &Transaction,
    mut exame_cli: ExameCliRecord,
    org: Option<&str>,
) -> Result<Option<ExameCliRecord>> {
    let now = current_timestamp();
    let mut sql = String::from("UPDATE exame_cli SET valor = ?, update_time = ? WHERE id = ?");
    let mut params = vec![
        Value::Integer(exame_cli.valor as i64),
        Value::Integer(now as i64),
        Value::Integer(exame_cli.id as i64),
    ];
    if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        params.push(Value::Text(String::from(org)));
    }

    let count = tx.execute(&sql, params_from_iter(params))?;
    if count == 0 {
        return Ok(None);
    }
    exame_cli.update_time = now;
    Ok(Some(exame_cli))
}

pub fn delete_exame_cli(tx: &Transaction, id: u64, org: Option<&str>) -> Result<bool> {
    let mut sql = String::from("DELETE FROM exame_cli WHERE id = ?");
    let params = if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        vec![Value::Integer(id as i64), Value::Text(String::from(org))]
    } else {
        vec![Value::Integer(id as i64)]
    };

    let count = tx.execute(&sql, params_from_iter(params))?;
    Ok(count > 0)
}
