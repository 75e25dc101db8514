use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};

use crate::server::db::{AnamneseItemRecord, AnamneseRecord};
use crate::time::current_timestamp;
use crate::types::request::Query;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS anamnese (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    colaborador_id INTEGER NOT NULL,
    medico_id INTEGER NOT NULL,
    tipo TEXT NOT NULL,
    status TEXT NOT NULL,
    organization_id TEXT NOT NULL,
    create_time INTEGER NOT NULL,
    update_time INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_anamnese_org ON anamnese(organization_id);
CREATE INDEX IF NOT EXISTS idx_anamnese_colaborador ON anamnese(colaborador_id);

CREATE TABLE IF NOT EXISTS anamnese_item (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    anamnese_id INTEGER NOT NULL,
    exame_id INTEGER NOT NULL,
    valor INTEGER NOT NULL,
    organization_id TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_anamnese_item_anamnese ON anamnese_item(anamnese_id);
"#;

pub const SORT_COLUMNS: &[&str] = &["tipo", "status", "create_time", "update_time"];

const FIELDS: &str =
    "id, colaborador_id, medico_id, tipo, status, organization_id, create_time, update_time";

pub fn create_anamnese_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

fn row_to_anamnese(row: &Row) -> rusqlite::Result<AnamneseRecord> {
    Ok(AnamneseRecord {
        id: row.get(0)?,
        colaborador_id: row.get(1)?,
        medico_id: row.get(2)?,
        tipo: row.get(3)?,
        status: row.get(4)?,
        organization_id: row.get(5)?,
        create_time: row.get(6)?,
        update_time: row.get(7)?,
    })
}

fn row_to_item(row: &Row) -> rusqlite::Result<AnamneseItemRecord> {
    Ok(AnamneseItemRecord {
        id: row.get(0)?,
        anamnese_id: row.get(1)?,
        exame_id: row.get(2)?,
        valor: row.get(3)?,
        organization_id: row.get(4)?,
    })
}

pub fn create_anamnese(tx: &Transaction, mut anamnese: AnamneseRecord) -> Result<AnamneseRecord> {
    let now = current_timestamp();
    tx.execute(
        "INSERT INTO anamnese (colaborador_id, medico_id, tipo, status, organization_id, create_time, update_time) VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            anamnese.colaborador_id,
            anamnese.medico_id,
            anamnese.tipo,
            anamnese.status,
            anamnese.organization_id,
            now,
            now
        ],
    )?;
    anamnese.id = tx.last_insert_rowid() as u64;
    anamnese.create_time = now;
    anamnese.update_time = now;
    Ok(anamnese)
}

pub fn get_anamnese(
    tx: &Transaction,
    id: u64,
    org: Option<&str>,
) -> Result<Option<AnamneseRecord>> {
    let mut sql = format!("SELECT {FIELDS} FROM anamnese WHERE id = ?");
    let params = if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        vec![Value::Integer(id as i64), Value::Text(String::from(org))]
    } else {
        vec![Value::Integer(id as i64)]
    };

    let mut stmt = tx.prepare(&sql)?;
    let anamnese = stmt
        .query_row(params_from_iter(params), row_to_anamnese)
        .optional()?;
    Ok(anamnese)
}

pub fn list_anamneses(tx: &Transaction, query: &Query) -> Result<Vec<AnamneseRecord>> {
    let where_clause = query.generate_where("tipo");
    let order_clause = query.generate_order(SORT_COLUMNS, "id");
    let limit_clause = query.generate_limit();
    let params = query.params();

    let sql = format!("SELECT {FIELDS} FROM anamnese {where_clause}{order_clause}{limit_clause}");
    let mut stmt = tx.prepare(&sql)?;
    let anamneses = stmt
        .query_map(params_from_iter(params.iter()), row_to_anamnese)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(anamneses)
}

pub fn count_anamneses(tx: &Transaction, query: &Query) -> Result<u64> {
    let where_clause = query.generate_where("tipo");
    let params = query.where_params();

    let sql = format!("SELECT COUNT(*) FROM anamnese {where_clause}");
    let mut stmt = tx.prepare(&sql)?;
    let count: i64 = stmt.query_row(params_from_iter(params), |row| row.get(0))?;
    Ok(count as u64)
}

pub fn update_anamnese(
    tx: &Transaction,
    mut anamnese: AnamneseRecord,
    org: Option<&str>,
) -> Result<Option<AnamneseRecord>> {
    let now = current_timestamp();
    let mut sql =
        String::from("UPDATE anamnese SET medico_id = ?, status = ?, update_time = ? WHERE id = ?");
    let mut params = vec![
        Value::Integer(anamnese.medico_id as i64),
        Value::Text(anamnese.status.clone()),
        Value::Integer(now as i64),
        Value::Integer(anamnese.id as i64),
    ];
    if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        params.push(Value::Text(String::from(org)));
    }

    let count = tx.execute(&sql, params_from_iter(params))?;
    if count == 0 {
        return Ok(None);
    }
    anamnese.update_time = now;
    Ok(Some(anamnese))
}

pub fn delete_anamnese(tx: &Transaction, id: u64, org: Option<&str>) -> Result<bool> {
    let mut sql = String::from("DELETE FROM anamnese WHERE id = ?");
    let params = if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        vec![Value::Integer(id as i64), Value::Text(String::from(org))]
    } else {
        vec![Value::Integer(id as i64)]
    };

    let count = tx.execute(&sql, params_from_iter(params))?;
    if count == 0 {
        return Ok(false);
    }

    // Items never outlive their order
    tx.execute(
        "DELETE FROM anamnese_item WHERE anamnese_id = ?",
        params![id],
    )?;
    Ok(true)
}

pub fn create_anamnese_item(
    tx: &Transaction,
    mut item: AnamneseItemRecord,
) -> Result<AnamneseItemRecord> {
    tx.execute(
        "INSERT INTO anamnese_item (anamnese_id, exame_id, valor, organization_id) VALUES (?, ?, ?, ?)",
        params![item.anamnese_id, item.exame_id, item.valor, item.organization_id],
    )?;
    item.id = tx.last_insert_rowid() as u64;
    Ok(item)
}

pub fn list_anamnese_items(
    tx: &Transaction,
    anamnese_id: u64,
) -> Result<Vec<AnamneseItemRecord>> {
    let mut stmt = tx.prepare(
        "SELECT id, anamnese_id, exame_id, valor, organization_id FROM anamnese_item WHERE anamnese_id = ? ORDER BY id ASC",
    )?;
    let items = stmt
        .query_map(params![anamnese_id], row_to_item)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(items)
}
