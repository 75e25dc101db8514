use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};

use crate::server::db::ClientRecord;
use crate::time::current_timestamp;
use crate::types::request::Query;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS client (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    razao_social TEXT NOT NULL,
    cpf TEXT NOT NULL,
    email TEXT,
    telefone TEXT,
    endereco TEXT,
    organization_id TEXT NOT NULL,
    create_time INTEGER NOT NULL,
    update_time INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_client_org ON client(organization_id);
CREATE INDEX IF NOT EXISTS idx_client_razao_social ON client(razao_social);
"#;

pub const SORT_COLUMNS: &[&str] = &["razao_social", "cpf", "create_time", "update_time"];

const FIELDS: &str = "id, razao_social, cpf, email, telefone, endereco, organization_id, create_time, update_time";

pub fn create_client_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

fn row_to_client(row: &Row) -> rusqlite::Result<ClientRecord> {
    Ok(ClientRecord {
        id: row.get(0)?,
        razao_social: row.get(1)?,
        cpf: row.get(2)?,
        email: row.get(3)?,
        telefone: row.get(4)?,
        endereco: row.get(5)?,
        organization_id: row.get(6)?,
        create_time: row.get(7)?,
        update_time: row.get(8)?,
    })
}

pub fn create_client(tx: &Transaction, mut client: ClientRecord) -> Result<ClientRecord> {
    let now = current_timestamp();
    tx.execute(
        "INSERT INTO client (razao_social, cpf, email, telefone, endereco, organization_id, create_time, update_time) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            client.razao_social,
            client.cpf,
            client.email,
            client.telefone,
            client.endereco,
            client.organization_id,
            now,
            now
        ],
    )?;
    client.id = tx.last_insert_rowid() as u64;
    client.create_time = now;
    client.update_time = now;
    Ok(client)
}

pub fn get_client(tx: &Transaction, id: u64, org: Option<&str>) -> Result<Option<ClientRecord>> {
    let mut sql = format!("SELECT {FIELDS} FROM client WHERE id = ?");
    let params = if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        vec![Value::Integer(id as i64), Value::Text(String::from(org))]
    } else {
        vec![Value::Integer(id as i64)]
    };

    let mut stmt = tx.prepare(&sql)?;
    let client = stmt
        .query_row(params_from_iter(params), row_to_client)
        .optional()?;
    Ok(client)
}

pub fn list_clients(tx: &Transaction, query: &Query) -> Result<Vec<ClientRecord>> {
    let where_clause = query.generate_where("razao_social");
    let order_clause = query.generate_order(SORT_COLUMNS, "id");
    let limit_clause = query.generate_limit();
    let params = query.params();

    let sql = format!("SELECT {FIELDS} FROM client {where_clause}{order_clause}{limit_clause}");
    let mut stmt = tx.prepare(&sql)?;
    let clients = stmt
        .query_map(params_from_iter(params.iter()), row_to_client)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(clients)
}

pub fn count_clients(tx: &Transaction, query: &Query) -> Result<u64> {
    let where_clause = query.generate_where("razao_social");
    let params = query.where_params();

    let sql = format!("SELECT COUNT(*) FROM client {where_clause}");
    let mut stmt = tx.prepare(&sql)?;
    let count: i64 = stmt.query_row(params_from_iter(params), |row| row.get(0))?;
    Ok(count as u64)
}

pub fn update_client(
    tx: &Transaction,
    mut client: ClientRecord,
    org: Option<&str>,
) -> Result<Option<ClientRecord>> {
    let now = current_timestamp();
    let mut sql = String::from(
        "UPDATE client SET razao_social = ?, cpf = ?, email = ?, telefone = ?, endereco = ?, update_time = ? WHERE id = ?",
    );
    let mut params = vec![
        Value::Text(client.razao_social.clone()),
        Value::Text(client.cpf.clone()),
        Value::from(client.email.clone()),
        Value::from(client.telefone.clone()),
        Value::from(client.endereco.clone()),
        Value::Integer(now as i64),
        Value::Integer(client.id as i64),
    ];
    if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        params.push(Value::Text(String::from(org)));
    }

    let count = tx.execute(&sql, params_from_iter(params))?;
    if count == 0 {
        return Ok(None);
    }
    client.update_time = now;
    Ok(Some(client))
}

pub fn delete_client(tx: &Transaction, id: u64, org: Option<&str>) -> Result<bool> {
    let mut sql = String::from("DELETE FROM client WHERE id = ?");
    let params = if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        vec![Value::Integer(id as i64), Value::Text(String::from(org))]
    } else {
        vec![Value::Integer(id as i64)]
    };

    let count = tx.execute(&sql, params_from_iter(params))?;
    Ok(count > 0)
}
