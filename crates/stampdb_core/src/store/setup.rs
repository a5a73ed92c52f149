//! Connection setup and schema lifecycle.

use crate::config::StoreConfig;
use crate::error::CoreResult;
use crate::schema::{create_table_sql, quoted, Encodings, COLUMNS, TABLE};
use rusqlite::Connection;
use std::collections::HashSet;
use tracing::{debug, info};

/// Applies the connection pragmas implied by the configuration.
///
/// Journal mode is left alone for in-memory and read-only connections,
/// where SQLite either ignores it or refuses the change.
pub(crate) fn configure(conn: &Connection, config: &StoreConfig, in_memory: bool) -> CoreResult<()> {
    conn.busy_timeout(config.busy_timeout)?;
    if config.read_only {
        return Ok(());
    }

    let mut pragmas = format!("PRAGMA synchronous = {};", config.synchronous());
    if !in_memory {
        pragmas.push_str(&format!(" PRAGMA journal_mode = {};", config.journal_mode.as_str()));
    }
    conn.execute_batch(&pragmas)?;
    debug!(%pragmas, "configured connection");
    Ok(())
}

/// `(name, declared type)` of every column the stamps table currently has.
/// Empty if the table does not exist.
fn table_info(conn: &Connection) -> CoreResult<Vec<(String, String)>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quoted(TABLE)))?;
    let columns = stmt
        .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(columns)
}

/// Names of the columns the stamps table currently has. Empty if the table
/// does not exist.
pub(crate) fn table_columns(conn: &Connection) -> CoreResult<HashSet<String>> {
    Ok(table_info(conn)?.into_iter().map(|(name, _)| name).collect())
}

/// Reads how each money column stores its values from the declared column
/// types. Must run after [`ensure_schema`] so added columns are seen.
pub(crate) fn decimal_encodings(conn: &Connection) -> CoreResult<Encodings> {
    let info = table_info(conn)?;
    let encodings = Encodings::from_declared(
        info.iter()
            .map(|(name, declared)| (name.as_str(), declared.as_str())),
    );
    if !encodings.all_units() {
        let columns: Vec<&str> = encodings.amount_columns().collect();
        info!(?columns, "money columns hold amounts, not units");
    }
    Ok(encodings)
}

/// Creates the stamps table if absent, then adds any registry column an
/// older table lacks. Safe to run on every open.
///
/// Columns are only ever added. Nothing is dropped or retyped.
pub(crate) fn ensure_schema(conn: &mut Connection) -> CoreResult<()> {
    let tx = conn.transaction()?;
    let existing = table_columns(&tx)?;

    tx.execute_batch(&create_table_sql())?;
    if existing.is_empty() {
        info!(table = TABLE, columns = COLUMNS.len(), "created table");
    } else {
        for column in COLUMNS.iter().filter(|c| !existing.contains(c.name)) {
            tx.execute_batch(&format!(
                "ALTER TABLE {} ADD COLUMN {}",
                quoted(TABLE),
                column.definition()
            ))?;
            info!(table = TABLE, column = column.name, "added missing column");
        }
    }

    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_table_once() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert!(table_columns(&conn).unwrap().is_empty());

        ensure_schema(&mut conn).unwrap();
        let columns = table_columns(&conn).unwrap();
        assert_eq!(columns.len(), COLUMNS.len() + 1);
        assert!(columns.contains("id"));

        ensure_schema(&mut conn).unwrap();
        assert_eq!(table_columns(&conn).unwrap(), columns);
    }

    #[test]
    fn adds_missing_columns() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE stamps (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                catalog_number TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT ''
            );
            INSERT INTO stamps (catalog_number) VALUES ('OLD1');",
        )
        .unwrap();

        ensure_schema(&mut conn).unwrap();

        let columns = table_columns(&conn).unwrap();
        for c in COLUMNS {
            assert!(columns.contains(c.name), "missing {}", c.name);
        }
        let qty: i64 = conn
            .query_row("SELECT quantity_mint FROM stamps", [], |r| r.get(0))
            .unwrap();
        assert_eq!(qty, 0);
    }

    #[test]
    fn encodings_follow_declared_types() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_schema(&mut conn).unwrap();
        assert!(decimal_encodings(&conn).unwrap().all_units());

        let mut legacy = Connection::open_in_memory().unwrap();
        legacy
            .execute_batch(
                "CREATE TABLE stamps (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    catalog_number TEXT NOT NULL,
                    catalog_value_mint TEXT,
                    catalog_value_used DECIMAL(10,2)
                );",
            )
            .unwrap();
        ensure_schema(&mut legacy).unwrap();
        let encodings = decimal_encodings(&legacy).unwrap();
        assert_eq!(
            encodings.amount_columns().collect::<Vec<_>>(),
            ["catalog_value_mint", "catalog_value_used"]
        );
        assert_eq!(
            encodings.decimal("purchase_price"),
            stampdb_codec::DecimalEncoding::Units
        );
    }

    #[test]
    fn configure_in_memory() {
        let conn = Connection::open_in_memory().unwrap();
        let config = StoreConfig::default().sync_on_commit(false);
        configure(&conn, &config, true).unwrap();
        let sync: i64 = conn
            .query_row("PRAGMA synchronous", [], |r| r.get(0))
            .unwrap();
        assert_eq!(sync, 1);
    }
}
