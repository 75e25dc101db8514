use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};

use crate::server::db::ContaRecord;
use crate::time::current_timestamp;
use crate::types::request::Query;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS conta (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    descricao TEXT NOT NULL,
    valor INTEGER NOT NULL,
    vencimento TEXT NOT NULL,
    pago INTEGER NOT NULL,
    organization_id TEXT NOT NULL,
    create_time INTEGER NOT NULL,
    update_time INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_conta_org ON conta(organization_id);
CREATE INDEX IF NOT EXISTS idx_conta_vencimento ON conta(vencimento);
"#;

pub const SORT_COLUMNS: &[&str] = &[
    "descricao",
    "valor",
    "vencimento",
    "create_time",
    "update_time",
];

const FIELDS: &str =
    "id, descricao, valor, vencimento, pago, organization_id, create_time, update_time";

pub fn create_conta_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

fn row_to_conta(row: &Row) -> rusqlite::Result<ContaRecord> {
    let pago: i64 = row.get(4)?;
    Ok(ContaRecord {
        id: row.get(0)?,
        descricao: row.get(1)?,
        valor: row.get(2)?,
        vencimento: row.get(3)?,
        pago: pago != 0,
        organization_id: row.get(5)?,
        create_time: row.get(6)?,
        update_time: row.get(7)?,
    })
}

pub fn create_conta(tx: &Transaction, mut conta: ContaRecord) -> Result<ContaRecord> {
    let now = current_timestamp();
    tx.execute(
        "INSERT INTO conta (descricao, valor, vencimento, pago, organization_id, create_time, update_time) VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            conta.descricao,
            conta.valor,
            conta.vencimento,
            conta.pago as i64,
            conta.organization_id,
            now,
            now
        ],
    )?;
    conta.id = tx.last_insert_rowid() as u64;
    conta.create_time = now;
    conta.update_time = now;
    Ok(conta)
}

pub fn get_conta(tx: &Transaction, id: u64, org: Option<&str>) -> Result<Option<ContaRecord>> {
    let mut sql = format!("SELECT {FIELDS} FROM conta WHERE id = ?");
    let params = if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        vec![Value::Integer(id as i64), Value::Text(String::from(org))]
    } else {
        vec![Value::Integer(id as i64)]
    };

    let mut stmt = tx.prepare(&sql)?;
    let conta = stmt
        .query_row(params_from_iter(params), row_to_conta)
        .optional()?;
    Ok(conta)
}

pub fn list_contas(tx: &Transaction, query: &Query) -> Result<Vec<ContaRecord>> {
    let where_clause = query.generate_where("descricao");
    let order_clause = query.generate_order(SORT_COLUMNS, "id");
    let limit_clause = query.generate_limit();
    let params = query.params();

    let sql = format!("SELECT {FIELDS} FROM conta {where_clause}{order_clause}{limit_clause}");
    let mut stmt = tx.prepare(&sql)?;
    let contas = stmt
        .query_map(params_from_iter(params.iter()), row_to_conta)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(contas)
}

pub fn count_contas(tx: &Transaction, query: &Query) -> Result<u64> {
    let where_clause = query.generate_where("descricao");
    let params = query.where_params();

    let sql = format!("SELECT COUNT(*) FROM conta {where_clause}");
    let mut stmt = tx.prepare(&sql)?;
    let count: i64 = stmt.query_row(params_from_iter(params), |row| row.get(0))?;
    Ok(count as u64)
}

pub fn update_conta(
    tx: &Transaction,
    mut conta: ContaRecord,
    org: Option<&str>,
) -> Result<Option<ContaRecord>> {
    let now = current_timestamp();
    let mut sql = String::from(
        "UPDATE conta SET descricao = ?, valor = ?, vencimento = ?, pago = ?, update_time = ? WHERE id = ?",
    );
    let mut params = vec![
        Value::Text(conta.descricao.clone()),
        Value::Integer(conta.valor as i64),
        Value::Text(conta.vencimento.clone()),
        Value::Integer(conta.pago as i64),
        Value::Integer(now as i64),
        Value::Integer(conta.id as i64),
    ];
    if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        params.push(Value::Text(String::from(org)));
    }

    let count = tx.execute(&sql, params_from_iter(params))?;
    if count == 0 {
        return Ok(None);
    }
    conta.update_time = now;
    Ok(Some(conta))
}

pub fn delete_conta(tx: &Transaction, id: u64, org: Option<&str>) -> Result<bool> {
    let mut sql = String::from("DELETE FROM conta WHERE id = ?");
    let params = if let Some(org) = org {
        sql.push_str(" AND organization_id = ?");
        vec![Value::Integer(id as i64), Value::Text(String::from(org))]
    } else {
        vec![Value::Integer(id as i64)]
    };

    let count = tx.execute(&sql, params_from_iter(params))?;
    Ok(count > 0)
}
