//! SQLite persistence for the cleaned client and sales tables.
//!
//! Every public operation opens its own connection and drops it before
//! returning, on success and failure alike. Each table load runs in a single
//! transaction; there is no transaction spanning both tables.

use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{
    Connection, Transaction, params,
    types::{Type, Value as SqlValue},
};
use rust_decimal::Decimal;

use crate::{
    config::DatabaseConfig,
    data::DATE_FORMAT,
    error::StageError,
    normalize::AMOUNT_SCALE,
    transform::{ClientRecord, SaleRecord},
};

pub const CLIENTS_TABLE: &str = "clientes";
pub const SALES_TABLE: &str = "vendas";

pub const SCHEMA_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS clientes (
    id_cliente INTEGER PRIMARY KEY AUTOINCREMENT,
    nome VARCHAR(100),
    email VARCHAR(150),
    documento VARCHAR(50),
    tipo_pessoa VARCHAR(50),
    tipo_contato VARCHAR(50)
);

CREATE TABLE IF NOT EXISTS vendas (
    id_venda INTEGER PRIMARY KEY AUTOINCREMENT,
    id_cliente INTEGER REFERENCES clientes(id_cliente),
    id_cliente_orfao BOOLEAN,
    valor NUMERIC(10, 2),
    data_venda DATE
);
"#;

fn open_connection(db: &DatabaseConfig) -> rusqlite::Result<Connection> {
    let conn = Connection::open(&db.path)?;
    if db.enforce_foreign_keys {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    }
    Ok(conn)
}

/// Creates both tables when absent. Running it again is a no-op.
pub fn ensure_schema(db: &DatabaseConfig) -> Result<(), StageError> {
    open_connection(db)
        .and_then(|conn| conn.execute_batch(SCHEMA_DDL))
        .map_err(|source| StageError::Schema {
            database: db.path.clone(),
            source,
        })
}

/// Appends every client row; returns the number of rows inserted.
pub fn load_clients(db: &DatabaseConfig, records: &[ClientRecord]) -> Result<usize, StageError> {
    in_transaction(db, |tx| {
        let mut stmt = tx.prepare(
            "INSERT INTO clientes (id_cliente, nome, email, documento, tipo_pessoa, tipo_contato) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for record in records {
            stmt.execute(params![
                record.id,
                record.name,
                record.email,
                record.document,
                record.person_type,
                record.contact_type,
            ])?;
        }
        Ok(records.len())
    })
    .map_err(|source| StageError::Load {
        table: CLIENTS_TABLE,
        source,
    })
}

/// Appends every sale row; returns the number of rows inserted.
pub fn load_sales(db: &DatabaseConfig, records: &[SaleRecord]) -> Result<usize, StageError> {
    in_transaction(db, |tx| {
        let mut stmt = tx.prepare(
            "INSERT INTO vendas (id_venda, id_cliente, id_cliente_orfao, valor, data_venda) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for record in records {
            stmt.execute(params![
                record.id,
                record.client_id,
                record.client_is_orphan,
                record.amount.to_string(),
                record.sale_date.format(DATE_FORMAT).to_string(),
            ])?;
        }
        Ok(records.len())
    })
    .map_err(|source| StageError::Load {
        table: SALES_TABLE,
        source,
    })
}

fn in_transaction<F>(db: &DatabaseConfig, work: F) -> rusqlite::Result<usize>
where
    F: FnOnce(&Transaction<'_>) -> rusqlite::Result<usize>,
{
    let mut conn = open_connection(db)?;
    let tx = conn.transaction()?;
    let inserted = work(&tx)?;
    tx.commit()?;
    Ok(inserted)
}

pub fn fetch_clients(db: &DatabaseConfig) -> Result<Vec<ClientRecord>, StageError> {
    let select = |conn: Connection| -> rusqlite::Result<Vec<ClientRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id_cliente, nome, email, documento, tipo_pessoa, tipo_contato FROM clientes ORDER BY id_cliente",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ClientRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                document: row.get(3)?,
                person_type: row.get(4)?,
                contact_type: row.get(5)?,
            })
        })?;
        rows.collect()
    };
    open_connection(db)
        .and_then(select)
        .map_err(|source| StageError::Fetch {
            table: CLIENTS_TABLE,
            source,
        })
}

pub fn fetch_sales(db: &DatabaseConfig) -> Result<Vec<SaleRecord>, StageError> {
    let select = |conn: Connection| -> rusqlite::Result<Vec<SaleRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id_venda, id_cliente, id_cliente_orfao, valor, data_venda FROM vendas ORDER BY id_venda",
        )?;
        let rows = stmt.query_map([], |row| {
            let date: String = row.get(4)?;
            Ok(SaleRecord {
                id: row.get(0)?,
                client_id: row.get(1)?,
                client_is_orphan: row.get(2)?,
                amount: decode_amount(3, row.get(3)?)?,
                sale_date: NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|err| {
                    rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(err))
                })?,
            })
        })?;
        rows.collect()
    };
    open_connection(db)
        .and_then(select)
        .map_err(|source| StageError::Fetch {
            table: SALES_TABLE,
            source,
        })
}

/// NUMERIC affinity may hand the amount back as an integer, real, or text.
fn decode_amount(idx: usize, value: SqlValue) -> rusqlite::Result<Decimal> {
    let conversion = |ty: Type, err: rust_decimal::Error| {
        rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(err))
    };
    let mut amount = match value {
        SqlValue::Integer(i) => Decimal::from(i),
        SqlValue::Real(f) => Decimal::try_from(f)
            .map_err(|err| conversion(Type::Real, err))?
            .round_dp(AMOUNT_SCALE),
        SqlValue::Text(s) => Decimal::from_str(&s).map_err(|err| conversion(Type::Text, err))?,
        other => {
            return Err(rusqlite::Error::InvalidColumnType(
                idx,
                "valor".to_string(),
                other.data_type(),
            ));
        }
    };
    amount.rescale(AMOUNT_SCALE);
    Ok(amount)
}
