use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use crate::server::db::OrganizationRecord;
use crate::time::current_timestamp;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS organization (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    create_time INTEGER NOT NULL,
    update_time INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_organization_name ON organization(name);
"#;

pub fn create_organization_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

fn row_to_organization(row: &Row) -> rusqlite::Result<OrganizationRecord> {
    Ok(OrganizationRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        create_time: row.get(2)?,
        update_time: row.get(3)?,
    })
}

/// Conflict-tolerant insert: losing an insert race against another request
/// is indistinguishable from the row having existed all along.
pub fn insert_organization_if_absent(
    tx: &Transaction,
    org: &OrganizationRecord,
) -> Result<bool> {
    let now = current_timestamp();
    let count = tx.execute(
        "INSERT OR IGNORE INTO organization (id, name, create_time, update_time) VALUES (?, ?, ?, ?)",
        params![org.id, org.name, now, now],
    )?;
    Ok(count > 0)
}

pub fn is_organization_exists(tx: &Transaction, id: &str) -> Result<bool> {
    let mut stmt = tx.prepare("SELECT COUNT(*) FROM organization WHERE id = ?")?;
    let count: i64 = stmt.query_row(params![id], |row| row.get(0))?;
    Ok(count > 0)
}

pub fn get_organization(tx: &Transaction, id: &str) -> Result<Option<OrganizationRecord>> {
    let mut stmt = tx.prepare(
        "SELECT id, name, create_time, update_time FROM organization WHERE id = ?",
    )?;
    let org = stmt
        .query_row(params![id], row_to_organization)
        .optional()?;
    Ok(org)
}

pub fn list_organizations(tx: &Transaction) -> Result<Vec<OrganizationRecord>> {
    let mut stmt = tx.prepare(
        "SELECT id, name, create_time, update_time FROM organization ORDER BY name ASC",
    )?;
    let orgs = stmt
        .query_map([], row_to_organization)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(orgs)
}

pub fn update_organization_name(
    tx: &Transaction,
    id: &str,
    name: &str,
) -> Result<Option<OrganizationRecord>> {
    let now = current_timestamp();
    let count = tx.execute(
        "UPDATE organization SET name = ?, update_time = ? WHERE id = ?",
        params![name, now, id],
    )?;
    if count == 0 {
        return Ok(None);
    }
    get_organization(tx, id)
}
