//! Flat persistent row.

use crate::error::{CodecError, CodecResult};
use crate::fixed::{date_from_text, DecimalEncoding};
use crate::value::Value;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// A flat mapping of column name to primitive value.
///
/// Typed getters treat a missing column and a NULL column the same way:
/// both return `Ok(None)`, leaving the default to the caller. Only a value
/// that is present but cannot be interpreted is an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: BTreeMap<String, Value>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column, replacing any previous value.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(column.into(), value.into());
    }

    /// Builder form of [`Row::set`].
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Removes a column, returning its value.
    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.columns.remove(column)
    }

    /// Returns the raw value of a column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Returns true if the column is present (NULL counts as present).
    pub fn contains(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterates columns in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn present(&self, column: &str) -> Option<&Value> {
        self.columns.get(column).filter(|v| !v.is_null())
    }

    /// Reads a text column.
    pub fn text(&self, column: &str) -> CodecResult<Option<String>> {
        match self.present(column) {
            None => Ok(None),
            Some(Value::Text(s)) => Ok(Some(s.clone())),
            Some(other) => Err(CodecError::type_mismatch(column, "text", other.kind())),
        }
    }

    /// Reads an integer column.
    ///
    /// A real with no fractional part is accepted, since foreign writers
    /// sometimes store whole numbers that way.
    pub fn integer(&self, column: &str) -> CodecResult<Option<i64>> {
        match self.present(column) {
            None => Ok(None),
            Some(Value::Integer(n)) => Ok(Some(*n)),
            #[allow(clippy::cast_possible_truncation)]
            Some(Value::Real(r)) if r.fract() == 0.0 && r.abs() < 9.0e15 => Ok(Some(*r as i64)),
            Some(other) => Err(CodecError::type_mismatch(column, "integer", other.kind())),
        }
    }

    /// Reads a non-negative integer column that must fit in a `u32`.
    pub fn unsigned(&self, column: &str) -> CodecResult<Option<u32>> {
        match self.integer(column)? {
            None => Ok(None),
            Some(n) => u32::try_from(n).map(Some).map_err(|_| CodecError::OutOfRange {
                column: column.to_string(),
                value: n,
            }),
        }
    }

    /// Reads a boolean stored as an integer (zero is false).
    pub fn boolean(&self, column: &str) -> CodecResult<Option<bool>> {
        match self.present(column) {
            None => Ok(None),
            Some(Value::Integer(n)) => Ok(Some(*n != 0)),
            Some(other) => Err(CodecError::type_mismatch(column, "integer", other.kind())),
        }
    }

    /// Reads a decimal column of a unit-encoded table.
    ///
    /// Integers are fixed-scale units. Text is parsed exactly and reals are
    /// read through their shortest text form.
    pub fn decimal(&self, column: &str) -> CodecResult<Option<Decimal>> {
        self.decimal_as(column, DecimalEncoding::Units)
    }

    /// Reads a decimal column stored with `encoding`.
    pub fn decimal_as(&self, column: &str, encoding: DecimalEncoding) -> CodecResult<Option<Decimal>> {
        match self.present(column) {
            None => Ok(None),
            Some(value) => encoding.decode(column, value),
        }
    }

    /// Reads a `YYYY-MM-DD` date column.
    pub fn date(&self, column: &str) -> CodecResult<Option<NaiveDate>> {
        match self.present(column) {
            None => Ok(None),
            Some(Value::Text(s)) => date_from_text(column, s).map(Some),
            Some(other) => Err(CodecError::type_mismatch(column, "text", other.kind())),
        }
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}
