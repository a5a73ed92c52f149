//! Column registry.
//!
//! The single description of the `stamps` table. The DDL, the row codec's
//! column set and the query engine's field validation are all derived from
//! [`COLUMNS`], so a field cannot exist in one place and not the others.

use stampdb_codec::DecimalEncoding;
use std::collections::BTreeMap;
use std::fmt;

/// Name of the table holding stamps.
pub const TABLE: &str = "stamps";

/// Name of the store-assigned identifier column.
pub const ID_COLUMN: &str = "id";

/// What a column holds, as seen by the domain model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Signed integer.
    Integer,
    /// Non-negative integer.
    Unsigned,
    /// Exact decimal, stored at fixed scale.
    Decimal,
    /// Boolean flag, stored as 0/1.
    Boolean,
    /// Calendar date, stored as `YYYY-MM-DD`.
    Date,
    /// Condition label.
    Condition,
}

impl FieldKind {
    /// SQL column type.
    pub const fn sql_type(&self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::Date | FieldKind::Condition => "TEXT",
            FieldKind::Integer | FieldKind::Unsigned | FieldKind::Decimal | FieldKind::Boolean => {
                "INTEGER"
            }
        }
    }

    /// Returns true if substring matching applies.
    pub const fn supports_contains(&self) -> bool {
        matches!(self, FieldKind::Text)
    }

    /// Returns true if range matching applies.
    pub const fn supports_range(&self) -> bool {
        matches!(
            self,
            FieldKind::Integer | FieldKind::Unsigned | FieldKind::Decimal | FieldKind::Date
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "integer",
            FieldKind::Unsigned => "unsigned integer",
            FieldKind::Decimal => "decimal",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Condition => "condition",
        };
        f.write_str(name)
    }
}

/// One column of the `stamps` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column and field name.
    pub name: &'static str,
    /// Value kind.
    pub kind: FieldKind,
    /// SQL default literal for NOT NULL columns; `None` means nullable.
    pub not_null_default: Option<&'static str>,
}

impl ColumnDef {
    const fn required(name: &'static str, kind: FieldKind, default: &'static str) -> Self {
        Self {
            name,
            kind,
            not_null_default: Some(default),
        }
    }

    const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            not_null_default: None,
        }
    }

    /// Returns true if the column may hold NULL.
    pub const fn is_nullable(&self) -> bool {
        self.not_null_default.is_none()
    }

    /// Column definition as it appears in `CREATE TABLE` / `ADD COLUMN`.
    pub fn definition(&self) -> String {
        match self.not_null_default {
            Some(default) => format!(
                "{} {} NOT NULL DEFAULT {default}",
                quoted(self.name),
                self.kind.sql_type()
            ),
            None => format!("{} {}", quoted(self.name), self.kind.sql_type()),
        }
    }
}

/// Every stamp column, in table order. The identifier is not listed.
pub const COLUMNS: &[ColumnDef] = &[
    ColumnDef::required("catalog_number", FieldKind::Text, "''"),
    ColumnDef::required("description", FieldKind::Text, "''"),
    ColumnDef::optional("country", FieldKind::Text),
    ColumnDef::optional("year", FieldKind::Integer),
    ColumnDef::optional("denomination", FieldKind::Text),
    ColumnDef::optional("color", FieldKind::Text),
    ColumnDef::required("condition", FieldKind::Condition, "'unknown'"),
    ColumnDef::optional("grade", FieldKind::Text),
    ColumnDef::optional("gum_condition", FieldKind::Text),
    ColumnDef::optional("perforation", FieldKind::Text),
    ColumnDef::required("catalog_value_mint", FieldKind::Decimal, "0"),
    ColumnDef::required("catalog_value_used", FieldKind::Decimal, "0"),
    ColumnDef::required("purchase_price", FieldKind::Decimal, "0"),
    ColumnDef::required("current_market_value", FieldKind::Decimal, "0"),
    ColumnDef::required("quantity_mint", FieldKind::Unsigned, "0"),
    ColumnDef::required("quantity_used", FieldKind::Unsigned, "0"),
    ColumnDef::optional("location", FieldKind::Text),
    ColumnDef::optional("notes", FieldKind::Text),
    ColumnDef::optional("source", FieldKind::Text),
    ColumnDef::optional("image_path", FieldKind::Text),
    ColumnDef::optional("date_acquired", FieldKind::Date),
    ColumnDef::required("is_favorite", FieldKind::Boolean, "0"),
    ColumnDef::required("plate_block", FieldKind::Boolean, "0"),
    ColumnDef::required("first_day_cover", FieldKind::Boolean, "0"),
    ColumnDef::required("want_list", FieldKind::Boolean, "0"),
    ColumnDef::required("for_sale", FieldKind::Boolean, "0"),
];

/// Looks up a column by field name.
pub fn column(name: &str) -> Option<&'static ColumnDef> {
    COLUMNS.iter().find(|c| c.name == name)
}

/// How each decimal column of an open table stores its values.
///
/// Columns the store created hold fixed-scale units. A table created by
/// another program may declare money columns as text or numeric, and those
/// keep holding the amount itself. Anything not recorded here is
/// [`DecimalEncoding::Units`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encodings {
    decimals: BTreeMap<&'static str, DecimalEncoding>,
}

impl Encodings {
    /// Derives encodings from `(column, declared type)` pairs as reported by
    /// `PRAGMA table_info`. Columns that are not registry decimals are
    /// ignored.
    pub fn from_declared<'a, I>(columns: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        columns
            .into_iter()
            .fold(Self::default(), |acc, (name, declared)| {
                acc.with(name, DecimalEncoding::for_declared_type(declared))
            })
    }

    /// Sets the encoding of a decimal column. Other columns are ignored.
    pub fn with(mut self, name: &str, encoding: DecimalEncoding) -> Self {
        if let Some(def) = column(name).filter(|c| c.kind == FieldKind::Decimal) {
            if encoding == DecimalEncoding::Units {
                self.decimals.remove(def.name);
            } else {
                self.decimals.insert(def.name, encoding);
            }
        }
        self
    }

    /// Encoding of a decimal column.
    pub fn decimal(&self, column: &str) -> DecimalEncoding {
        self.decimals.get(column).copied().unwrap_or_default()
    }

    /// Decimal columns that do not hold units, in name order.
    pub fn amount_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decimals.keys().copied()
    }

    /// Returns true if every decimal column holds units.
    pub fn all_units(&self) -> bool {
        self.decimals.is_empty()
    }
}

/// Double-quotes an identifier taken from the registry.
pub(crate) fn quoted(name: &str) -> String {
    format!("\"{name}\"")
}

/// `CREATE TABLE IF NOT EXISTS` statement for the stamps table.
pub(crate) fn create_table_sql() -> String {
    let mut columns = vec![format!(
        "{} INTEGER PRIMARY KEY AUTOINCREMENT",
        quoted(ID_COLUMN)
    )];
    columns.extend(COLUMNS.iter().map(ColumnDef::definition));
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
        quoted(TABLE),
        columns.join(",\n    ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = COLUMNS.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), COLUMNS.len());
        assert!(!names.contains(ID_COLUMN));
    }

    #[test]
    fn lookup() {
        assert_eq!(column("year").map(|c| c.kind), Some(FieldKind::Integer));
        assert!(column("bogus_field").is_none());
        assert!(column("id").is_none());
    }

    #[test]
    fn definitions() {
        let country = column("country").unwrap();
        assert!(country.is_nullable());
        assert_eq!(country.definition(), "\"country\" TEXT");

        let qty = column("quantity_mint").unwrap();
        assert_eq!(qty.definition(), "\"quantity_mint\" INTEGER NOT NULL DEFAULT 0");
    }

    #[test]
    fn ddl_mentions_every_column() {
        let ddl = create_table_sql();
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS \"stamps\""));
        assert!(ddl.contains("\"id\" INTEGER PRIMARY KEY AUTOINCREMENT"));
        for c in COLUMNS {
            assert!(ddl.contains(&quoted(c.name)), "missing {}", c.name);
        }
    }

    #[test]
    fn encodings_from_declared_types() {
        let encodings = Encodings::from_declared([
            ("id", "INTEGER"),
            ("catalog_value_mint", "TEXT"),
            ("catalog_value_used", "DECIMAL(10,2)"),
            ("purchase_price", "INTEGER"),
            ("country", "TEXT"),
        ]);
        assert_eq!(encodings.decimal("catalog_value_mint"), DecimalEncoding::Text);
        assert_eq!(encodings.decimal("catalog_value_used"), DecimalEncoding::Text);
        assert_eq!(encodings.decimal("purchase_price"), DecimalEncoding::Units);
        assert_eq!(encodings.decimal("current_market_value"), DecimalEncoding::Units);
        assert_eq!(
            encodings.amount_columns().collect::<Vec<_>>(),
            ["catalog_value_mint", "catalog_value_used"]
        );
        assert!(Encodings::from_declared(COLUMNS.iter().map(|c| (c.name, c.kind.sql_type()))).all_units());
    }

    #[test]
    fn predicate_support() {
        assert!(FieldKind::Text.supports_contains());
        assert!(!FieldKind::Integer.supports_contains());
        assert!(FieldKind::Date.supports_range());
        assert!(!FieldKind::Boolean.supports_range());
    }
}
