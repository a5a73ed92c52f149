//! Search criteria.

use crate::stamp::Condition;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

/// A literal value used in a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    /// Text.
    Text(String),
    /// Integer. Also accepted by decimal fields.
    Integer(i64),
    /// Exact decimal.
    Decimal(Decimal),
    /// Boolean.
    Bool(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Condition.
    Condition(Condition),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => write!(f, "{s:?}"),
            Scalar::Integer(n) => write!(f, "{n}"),
            Scalar::Decimal(d) => write!(f, "{d}"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Date(d) => write!(f, "{d}"),
            Scalar::Condition(c) => write!(f, "{c}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Integer(n)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Integer(i64::from(n))
    }
}

impl From<u32> for Scalar {
    fn from(n: u32) -> Self {
        Scalar::Integer(i64::from(n))
    }
}

impl From<Decimal> for Scalar {
    fn from(d: Decimal) -> Self {
        Scalar::Decimal(d)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(d: NaiveDate) -> Self {
        Scalar::Date(d)
    }
}

impl From<Condition> for Scalar {
    fn from(c: Condition) -> Self {
        Scalar::Condition(c)
    }
}

/// A constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Field equals the value.
    Exact(Scalar),
    /// Text field contains the substring (ASCII case-insensitive).
    Contains(String),
    /// Field lies within the inclusive bounds. `None` leaves a side open.
    Range {
        /// Lower bound.
        min: Option<Scalar>,
        /// Upper bound.
        max: Option<Scalar>,
    },
    /// Boolean field equals the flag.
    Is(bool),
}

impl Predicate {
    /// Short name of the predicate kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Predicate::Exact(_) => "exact",
            Predicate::Contains(_) => "contains",
            Predicate::Range { .. } => "range",
            Predicate::Is(_) => "is",
        }
    }
}

/// A set of per-field predicates combined with AND.
///
/// Each field carries at most one predicate; setting a field again replaces
/// the earlier predicate. Field names are checked when the criteria are
/// compiled, not when they are added.
///
/// ```
/// use stampdb_core::Criteria;
///
/// let criteria = Criteria::new()
///     .contains("country", "US")
///     .between("year", 1980, 2000)
///     .is("want_list", false);
/// assert_eq!(criteria.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    predicates: BTreeMap<String, Predicate>,
}

impl Criteria {
    /// Creates an empty criteria set, which matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the predicate for a field.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, predicate: Predicate) -> Self {
        self.insert(field, predicate);
        self
    }

    /// Sets the predicate for a field in place.
    pub fn insert(&mut self, field: impl Into<String>, predicate: Predicate) {
        self.predicates.insert(field.into(), predicate);
    }

    /// Field equals `value`.
    #[must_use]
    pub fn equals(self, field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.with(field, Predicate::Exact(value.into()))
    }

    /// Text field contains `needle`.
    #[must_use]
    pub fn contains(self, field: impl Into<String>, needle: impl Into<String>) -> Self {
        self.with(field, Predicate::Contains(needle.into()))
    }

    /// Field lies within `min..=max`.
    #[must_use]
    pub fn between(
        self,
        field: impl Into<String>,
        min: impl Into<Scalar>,
        max: impl Into<Scalar>,
    ) -> Self {
        self.with(
            field,
            Predicate::Range {
                min: Some(min.into()),
                max: Some(max.into()),
            },
        )
    }

    /// Field is at least `min`.
    #[must_use]
    pub fn at_least(self, field: impl Into<String>, min: impl Into<Scalar>) -> Self {
        self.with(
            field,
            Predicate::Range {
                min: Some(min.into()),
                max: None,
            },
        )
    }

    /// Field is at most `max`.
    #[must_use]
    pub fn at_most(self, field: impl Into<String>, max: impl Into<Scalar>) -> Self {
        self.with(
            field,
            Predicate::Range {
                min: None,
                max: Some(max.into()),
            },
        )
    }

    /// Boolean field equals `flag`.
    #[must_use]
    pub fn is(self, field: impl Into<String>, flag: bool) -> Self {
        self.with(field, Predicate::Is(flag))
    }

    /// Returns true if no field is constrained.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Number of constrained fields.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Constrained field names, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.predicates.keys().map(String::as_str)
    }

    /// Predicate for a field, if any.
    pub fn get(&self, field: &str) -> Option<&Predicate> {
        self.predicates.get(field)
    }

    /// Iterates `(field, predicate)` pairs sorted by field name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Predicate)> {
        self.predicates.iter().map(|(k, v)| (k.as_str(), v))
    }
}
