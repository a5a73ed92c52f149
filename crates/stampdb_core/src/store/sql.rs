//! SQL text and value conversion between rusqlite and the row codec.

use crate::error::CoreResult;
use crate::schema::{quoted, Encodings, COLUMNS, ID_COLUMN, TABLE};
use crate::stamp::{Stamp, StampId, StoredStamp};
use crate::RowCodec;
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, Params};
use stampdb_codec::{CodecError, CodecResult, Row, Value};

/// `INSERT` of every registry column, in registry order.
pub(crate) fn insert_sql() -> String {
    let names: Vec<String> = COLUMNS.iter().map(|c| quoted(c.name)).collect();
    let placeholders = vec!["?"; COLUMNS.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        quoted(TABLE),
        names.join(", ")
    )
}

/// `UPDATE` of every registry column; the id is the last parameter.
pub(crate) fn update_sql() -> String {
    let assignments: Vec<String> = COLUMNS
        .iter()
        .map(|c| format!("{} = ?", quoted(c.name)))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE {} = ?",
        quoted(TABLE),
        assignments.join(", "),
        quoted(ID_COLUMN)
    )
}

/// `SELECT *` with an optional filter, ordered by id.
pub(crate) fn select_sql(where_clause: &str) -> String {
    format!(
        "SELECT * FROM {}{where_clause} ORDER BY {} ASC",
        quoted(TABLE),
        quoted(ID_COLUMN)
    )
}

/// `SELECT *` of a single id.
pub(crate) fn select_one_sql() -> String {
    select_sql(&format!(" WHERE {} = ?", quoted(ID_COLUMN)))
}

pub(crate) fn delete_sql() -> String {
    format!(
        "DELETE FROM {} WHERE {} = ?",
        quoted(TABLE),
        quoted(ID_COLUMN)
    )
}

pub(crate) fn count_sql() -> String {
    format!("SELECT COUNT(*) FROM {}", quoted(TABLE))
}

pub(crate) fn exists_sql() -> String {
    format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?)",
        quoted(TABLE),
        quoted(ID_COLUMN)
    )
}

/// Converts a codec value into a bindable SQL value.
pub(crate) fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(n) => SqlValue::Integer(*n),
        Value::Real(r) => SqlValue::Real(*r),
        Value::Text(s) => SqlValue::Text(s.clone()),
    }
}

/// Converts a fetched SQL value into a codec value. Blobs never belong in
/// a stamp row.
pub(crate) fn from_sql(column: &str, value: SqlValue) -> CodecResult<Value> {
    match value {
        SqlValue::Null => Ok(Value::Null),
        SqlValue::Integer(n) => Ok(Value::Integer(n)),
        SqlValue::Real(r) => Ok(Value::Real(r)),
        SqlValue::Text(s) => Ok(Value::Text(s)),
        SqlValue::Blob(_) => Err(CodecError::type_mismatch(column, "text", "blob")),
    }
}

/// Registry-ordered parameters for a row.
pub(crate) fn row_params(row: &Row) -> Vec<SqlValue> {
    COLUMNS
        .iter()
        .map(|c| row.get(c.name).map_or(SqlValue::Null, to_sql))
        .collect()
}

/// Runs a `SELECT *` and decodes every row.
pub(crate) fn query_stamps<P: Params>(
    conn: &Connection,
    encodings: &Encodings,
    sql: &str,
    params: P,
) -> CoreResult<Vec<StoredStamp>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let raw = stmt
        .query_map(params, |row| {
            (0..names.len())
                .map(|i| row.get::<_, SqlValue>(i))
                .collect::<rusqlite::Result<Vec<_>>>()
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    raw.into_iter()
        .map(|values| decode(&names, values, encodings).map_err(Into::into))
        .collect()
}

/// Splits a fetched row into its id and the decoded stamp.
fn decode(
    names: &[String],
    values: Vec<SqlValue>,
    encodings: &Encodings,
) -> CodecResult<StoredStamp> {
    let mut id = None;
    let mut row = Row::new();
    for (name, value) in names.iter().zip(values) {
        let value = from_sql(name, value)?;
        if name == ID_COLUMN {
            id = Some(match value {
                Value::Integer(n) => n,
                other => return Err(CodecError::type_mismatch(ID_COLUMN, "integer", other.kind())),
            });
        } else {
            row.set(name.as_str(), value);
        }
    }

    let id = id.ok_or_else(|| CodecError::type_mismatch(ID_COLUMN, "integer", "null"))?;
    Ok(StoredStamp {
        id: StampId::new(id),
        stamp: Stamp::from_row_with(&row, encodings)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statements() {
        let insert = insert_sql();
        assert!(insert.starts_with("INSERT INTO \"stamps\" (\"catalog_number\", \"description\""));
        assert_eq!(insert.matches('?').count(), COLUMNS.len());

        let update = update_sql();
        assert!(update.ends_with("WHERE \"id\" = ?"));
        assert_eq!(update.matches('?').count(), COLUMNS.len() + 1);

        assert_eq!(
            select_sql(""),
            "SELECT * FROM \"stamps\" ORDER BY \"id\" ASC"
        );
        assert_eq!(
            select_one_sql(),
            "SELECT * FROM \"stamps\" WHERE \"id\" = ? ORDER BY \"id\" ASC"
        );
    }

    #[test]
    fn value_conversion() {
        assert_eq!(to_sql(&Value::Integer(5)), SqlValue::Integer(5));
        assert_eq!(to_sql(&Value::Null), SqlValue::Null);
        assert_eq!(
            from_sql("notes", SqlValue::Text("x".into())).unwrap(),
            Value::Text("x".into())
        );
        assert!(matches!(
            from_sql("notes", SqlValue::Blob(vec![1, 2])),
            Err(CodecError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn params_follow_registry_order() {
        let row = Stamp::new("C1", "first").to_row().unwrap();
        let params = row_params(&row);
        assert_eq!(params.len(), COLUMNS.len());
        assert_eq!(params[0], SqlValue::Text("C1".into()));
        assert_eq!(params[1], SqlValue::Text("first".into()));
    }

    #[test]
    fn decode_extracts_id() {
        let names = vec!["id".to_string(), "catalog_number".to_string()];
        let values = vec![SqlValue::Integer(7), SqlValue::Text("C7".into())];
        let stored = decode(&names, values, &Encodings::default()).unwrap();
        assert_eq!(stored.id, StampId::new(7));
        assert_eq!(stored.stamp.catalog_number, "C7");
    }
}
