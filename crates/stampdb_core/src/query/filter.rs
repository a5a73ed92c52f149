//! Compilation of [`Criteria`] into a parameterized `WHERE` clause.

use super::criteria::{Criteria, Predicate, Scalar};
use crate::error::{CoreError, CoreResult};
use crate::schema::{self, ColumnDef, Encodings, FieldKind};
use crate::stamp::Condition;
use stampdb_codec::{
    date_from_text, date_to_text, decimal_to_units, units_to_decimal, CodecError, DecimalEncoding,
    Value, SCALE,
};
use std::cmp::Ordering;

/// Escape character used in `LIKE` patterns.
const LIKE_ESCAPE: char = '\\';

/// A compiled filter: SQL fragments joined with AND, plus bound values.
///
/// Column names only ever come from the registry. Every user-supplied value
/// ends up in `params`, never in the SQL text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Filter {
    /// Compiles criteria for a table the store created.
    pub fn compile(criteria: &Criteria) -> CoreResult<Self> {
        Self::compile_with(criteria, &Encodings::default())
    }

    /// Compiles criteria for a table whose decimal columns use `encodings`,
    /// validating every field and predicate.
    pub fn compile_with(criteria: &Criteria, encodings: &Encodings) -> CoreResult<Self> {
        let mut filter = Filter::default();
        for (field, predicate) in criteria.iter() {
            let column = schema::column(field).ok_or_else(|| {
                CoreError::invalid_criteria(format!("unknown field `{field}`"))
            })?;
            filter.push(column, predicate, encodings.decimal(column.name))?;
        }
        Ok(filter)
    }

    fn push(
        &mut self,
        column: &ColumnDef,
        predicate: &Predicate,
        encoding: DecimalEncoding,
    ) -> CoreResult<()> {
        let name = schema::quoted(column.name);
        let (lhs, rhs) = operands(column, encoding);
        match predicate {
            Predicate::Exact(scalar) => {
                let value = bind(column, scalar)?;
                self.clauses.push(format!("{lhs} = {rhs}"));
                self.params.push(stored(value, encoding));
            }
            Predicate::Contains(needle) => {
                if !column.kind.supports_contains() {
                    return Err(unsupported(column, predicate));
                }
                self.clauses
                    .push(format!("{name} LIKE ? ESCAPE '{LIKE_ESCAPE}'"));
                self.params
                    .push(Value::Text(format!("%{}%", escape_like(needle))));
            }
            Predicate::Range { min, max } => {
                if !column.kind.supports_range() {
                    return Err(unsupported(column, predicate));
                }
                let min = min.as_ref().map(|s| bind(column, s)).transpose()?;
                let max = max.as_ref().map(|s| bind(column, s)).transpose()?;
                match (&min, &max) {
                    (None, None) => {
                        return Err(CoreError::invalid_criteria(format!(
                            "range on `{}` has no bounds",
                            column.name
                        )))
                    }
                    (Some(lo), Some(hi)) if compare(lo, hi) == Some(Ordering::Greater) => {
                        return Err(CoreError::invalid_criteria(format!(
                            "range on `{}` has min {lo} greater than max {hi}",
                            column.name
                        )))
                    }
                    _ => {}
                }
                if let Some(lo) = min {
                    self.clauses.push(format!("{lhs} >= {rhs}"));
                    self.params.push(stored(lo, encoding));
                }
                if let Some(hi) = max {
                    self.clauses.push(format!("{lhs} <= {rhs}"));
                    self.params.push(stored(hi, encoding));
                }
            }
            Predicate::Is(flag) => {
                if column.kind != FieldKind::Boolean {
                    return Err(unsupported(column, predicate));
                }
                self.clauses.push(format!("{name} = ?"));
                self.params.push(Value::from(*flag));
            }
        }
        Ok(())
    }

    /// Returns true if the filter matches every row.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// The `WHERE ...` fragment, or an empty string.
    pub fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    /// Bound values in placeholder order.
    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

fn unsupported(column: &ColumnDef, predicate: &Predicate) -> CoreError {
    CoreError::invalid_criteria(format!(
        "{} predicate does not apply to {} field `{}`",
        predicate.kind(),
        column.kind,
        column.name
    ))
}

fn wrong_kind(column: &ColumnDef, scalar: &Scalar) -> CoreError {
    CoreError::invalid_criteria(format!(
        "value {scalar} does not fit {} field `{}`",
        column.kind, column.name
    ))
}

/// SQL for the column side and the placeholder side of a comparison.
///
/// Unit columns may still hold a real or text amount left by another
/// writer, which is scaled to units before comparing. Amount columns are
/// compared as numbers, never as text.
fn operands(column: &ColumnDef, encoding: DecimalEncoding) -> (String, &'static str) {
    let name = schema::quoted(column.name);
    match (column.kind, encoding) {
        (FieldKind::Decimal, DecimalEncoding::Units) => (
            format!(
                "CASE typeof({name}) WHEN 'integer' THEN {name} ELSE round({name} * {}) END",
                10i64.pow(SCALE)
            ),
            "?",
        ),
        (FieldKind::Decimal, DecimalEncoding::Text) => {
            (format!("CAST({name} AS REAL)"), "CAST(? AS REAL)")
        }
        _ => (name, "?"),
    }
}

/// Rewrites a bound decimal for its column. Bound decimals are units.
fn stored(value: Value, encoding: DecimalEncoding) -> Value {
    match (encoding, value) {
        (DecimalEncoding::Text, Value::Integer(units)) => {
            Value::Text(units_to_decimal(units).to_string())
        }
        (_, value) => value,
    }
}

/// Converts a scalar into its canonical bound form. Decimals become units,
/// so bounds of any decimal column order as integers.
fn bind(column: &ColumnDef, scalar: &Scalar) -> CoreResult<Value> {
    let value = match (column.kind, scalar) {
        (FieldKind::Text, Scalar::Text(s)) => Value::Text(s.clone()),
        (FieldKind::Integer, Scalar::Integer(n)) => Value::Integer(*n),
        (FieldKind::Unsigned, Scalar::Integer(n)) => Value::Integer(*n),
        (FieldKind::Decimal, Scalar::Decimal(d)) => {
            Value::Integer(decimal_to_units(column.name, *d).map_err(criteria_error)?)
        }
        (FieldKind::Decimal, Scalar::Integer(n)) => Value::Integer(
            decimal_to_units(column.name, (*n).into()).map_err(criteria_error)?,
        ),
        (FieldKind::Boolean, Scalar::Bool(b)) => Value::from(*b),
        (FieldKind::Date, Scalar::Date(d)) => Value::Text(date_to_text(*d)),
        (FieldKind::Date, Scalar::Text(s)) => {
            Value::Text(date_to_text(date_from_text(column.name, s).map_err(criteria_error)?))
        }
        (FieldKind::Condition, Scalar::Condition(c)) => Value::from(c.as_str()),
        (FieldKind::Condition, Scalar::Text(s)) => {
            let condition: Condition = s.parse().map_err(|_| wrong_kind(column, scalar))?;
            Value::from(condition.as_str())
        }
        _ => return Err(wrong_kind(column, scalar)),
    };
    Ok(value)
}

fn criteria_error(err: CodecError) -> CoreError {
    CoreError::invalid_criteria(err.to_string())
}

/// Orders two bound values of the same column.
///
/// Dates are `YYYY-MM-DD`, so text order is date order.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Some(x.cmp(y)),
        (Value::Text(x), Value::Text(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Escapes `LIKE` metacharacters so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}
