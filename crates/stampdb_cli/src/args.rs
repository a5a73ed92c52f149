//! Argument groups shared by several commands, and their parsing into core
//! values.
//!
//! Everything typed on the command line is parsed here, before any call into
//! the store.

use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use stampdb_core::schema::{self, FieldKind};
use stampdb_core::{Condition, Criteria, Predicate, Scalar, Stamp};
use thiserror::Error;

/// Errors in command-line values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgError {
    /// A `field=value` argument without `=`.
    #[error("expected FIELD=VALUE, got {0:?}")]
    MissingEquals(String),

    /// A range without `..`.
    #[error("expected FIELD=LOW..HIGH, got {0:?}")]
    MissingRange(String),

    /// A value that does not parse as the field's kind.
    #[error("invalid {kind} value {value:?} for `{field}`")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Expected kind.
        kind: FieldKind,
        /// The offending text.
        value: String,
    },

    /// Not `true` or `false`.
    #[error("expected true or false for `{field}`, got {value:?}")]
    InvalidFlag {
        /// Field name.
        field: String,
        /// The offending text.
        value: String,
    },
}

/// Every field of a stamp, as flags. Used by `add` and `update`.
#[derive(Args, Debug, Clone)]
pub struct StampArgs {
    /// Catalog number (e.g. a Scott number)
    pub catalog_number: String,

    /// Free-text description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Issuing country
    #[arg(long)]
    pub country: Option<String>,

    /// Year of issue
    #[arg(long, allow_negative_numbers = true)]
    pub year: Option<i32>,

    /// Face value as printed
    #[arg(long)]
    pub denomination: Option<String>,

    /// Color
    #[arg(long)]
    pub color: Option<String>,

    /// mint, used or unknown
    #[arg(long, default_value = "unknown")]
    pub condition: Condition,

    /// Grade, e.g. "Very Fine"
    #[arg(long)]
    pub grade: Option<String>,

    /// Gum condition
    #[arg(long)]
    pub gum_condition: Option<String>,

    /// Perforation gauge
    #[arg(long)]
    pub perforation: Option<String>,

    /// Catalog value of one mint copy
    #[arg(long, default_value = "0")]
    pub value_mint: Decimal,

    /// Catalog value of one used copy
    #[arg(long, default_value = "0")]
    pub value_used: Decimal,

    /// Price paid
    #[arg(long, default_value = "0")]
    pub purchase_price: Decimal,

    /// Current market value
    #[arg(long, default_value = "0")]
    pub market_value: Decimal,

    /// Mint copies held
    #[arg(long, default_value_t = 0)]
    pub qty_mint: u32,

    /// Used copies held
    #[arg(long, default_value_t = 0)]
    pub qty_used: u32,

    /// Album and page
    #[arg(long)]
    pub location: Option<String>,

    /// Notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Dealer, auction, gift...
    #[arg(long)]
    pub source: Option<String>,

    /// Path to a scan
    #[arg(long)]
    pub image: Option<String>,

    /// Date acquired (YYYY-MM-DD)
    #[arg(long)]
    pub acquired: Option<NaiveDate>,

    /// Mark as favorite
    #[arg(long)]
    pub favorite: bool,

    /// Held as a plate block
    #[arg(long)]
    pub plate_block: bool,

    /// Held on a first day cover
    #[arg(long)]
    pub fdc: bool,

    /// On the want list
    #[arg(long)]
    pub want: bool,

    /// Offered for sale
    #[arg(long)]
    pub for_sale: bool,
}

impl StampArgs {
    /// Builds the stamp. Validation happens in the store.
    pub fn into_stamp(self) -> Stamp {
        Stamp {
            catalog_number: self.catalog_number,
            description: self.description,
            country: self.country,
            year: self.year,
            denomination: self.denomination,
            color: self.color,
            condition: self.condition,
            grade: self.grade,
            gum_condition: self.gum_condition,
            perforation: self.perforation,
            catalog_value_mint: self.value_mint,
            catalog_value_used: self.value_used,
            purchase_price: self.purchase_price,
            current_market_value: self.market_value,
            quantity_mint: self.qty_mint,
            quantity_used: self.qty_used,
            location: self.location,
            notes: self.notes,
            source: self.source,
            image_path: self.image,
            date_acquired: self.acquired,
            is_favorite: self.favorite,
            plate_block: self.plate_block,
            first_day_cover: self.fdc,
            want_list: self.want,
            for_sale: self.for_sale,
        }
    }
}

/// Search predicates. All given predicates must hold.
#[derive(Args, Debug, Clone, Default)]
pub struct CriteriaArgs {
    /// Text field contains VALUE (case-insensitive), as FIELD=VALUE
    #[arg(long = "contains", value_name = "FIELD=VALUE")]
    pub contains: Vec<String>,

    /// Field equals VALUE, as FIELD=VALUE
    #[arg(long = "eq", value_name = "FIELD=VALUE")]
    pub equals: Vec<String>,

    /// Field within inclusive bounds, as FIELD=LOW..HIGH (either end may be empty)
    #[arg(long = "between", value_name = "FIELD=LOW..HIGH")]
    pub between: Vec<String>,

    /// Boolean field, as FIELD=true|false
    #[arg(long = "is", value_name = "FIELD=BOOL")]
    pub is: Vec<String>,
}

impl CriteriaArgs {
    /// Parses every predicate.
    pub fn to_criteria(&self) -> Result<Criteria, ArgError> {
        let mut criteria = Criteria::new();
        for arg in &self.contains {
            let (field, value) = split_pair(arg)?;
            criteria.insert(field, Predicate::Contains(value.to_string()));
        }
        for arg in &self.equals {
            let (field, value) = split_pair(arg)?;
            criteria.insert(field, Predicate::Exact(parse_scalar(field, value)?));
        }
        for arg in &self.between {
            let (field, range) = split_pair(arg)?;
            let (lo, hi) = range
                .split_once("..")
                .ok_or_else(|| ArgError::MissingRange(arg.clone()))?;
            let min = optional_scalar(field, lo)?;
            let max = optional_scalar(field, hi)?;
            criteria.insert(field, Predicate::Range { min, max });
        }
        for arg in &self.is {
            let (field, value) = split_pair(arg)?;
            criteria.insert(field, Predicate::Is(parse_flag(field, value)?));
        }
        Ok(criteria)
    }
}

fn split_pair(arg: &str) -> Result<(&str, &str), ArgError> {
    arg.split_once('=')
        .map(|(field, value)| (field.trim(), value))
        .ok_or_else(|| ArgError::MissingEquals(arg.to_string()))
}

fn optional_scalar(field: &str, text: &str) -> Result<Option<Scalar>, ArgError> {
    if text.trim().is_empty() {
        Ok(None)
    } else {
        parse_scalar(field, text).map(Some)
    }
}

fn parse_flag(field: &str, value: &str) -> Result<bool, ArgError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ArgError::InvalidFlag {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Parses `text` as the kind of `field`. Unknown fields pass through as text
/// so the store reports them.
fn parse_scalar(field: &str, text: &str) -> Result<Scalar, ArgError> {
    let Some(column) = schema::column(field) else {
        return Ok(Scalar::Text(text.to_string()));
    };
    let trimmed = text.trim();
    let invalid = || ArgError::InvalidValue {
        field: field.to_string(),
        kind: column.kind,
        value: text.to_string(),
    };
    let scalar = match column.kind {
        FieldKind::Text => Scalar::Text(text.to_string()),
        FieldKind::Integer | FieldKind::Unsigned => {
            Scalar::Integer(trimmed.parse().map_err(|_| invalid())?)
        }
        FieldKind::Decimal => Scalar::Decimal(trimmed.parse().map_err(|_| invalid())?),
        FieldKind::Boolean => Scalar::Bool(parse_flag(field, trimmed)?),
        FieldKind::Date => Scalar::Date(trimmed.parse().map_err(|_| invalid())?),
        FieldKind::Condition => Scalar::Condition(trimmed.parse().map_err(|_| invalid())?),
    };
    Ok(scalar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn args(contains: &[&str], equals: &[&str], between: &[&str], is: &[&str]) -> CriteriaArgs {
        let own = |v: &[&str]| -> Vec<String> { v.iter().map(|s| s.to_string()).collect() };
        CriteriaArgs {
            contains: own(contains),
            equals: own(equals),
            between: own(between),
            is: own(is),
        }
    }

    #[test]
    fn parses_typed_predicates() {
        let criteria = args(
            &["country=US"],
            &["condition=Mint", "catalog_value_mint=1.25"],
            &["year=1980..2000"],
            &["for_sale=true"],
        )
        .to_criteria()
        .unwrap();

        assert_eq!(
            criteria.get("country"),
            Some(&Predicate::Contains("US".into()))
        );
        assert_eq!(
            criteria.get("condition"),
            Some(&Predicate::Exact(Scalar::Condition(Condition::Mint)))
        );
        assert_eq!(
            criteria.get("catalog_value_mint"),
            Some(&Predicate::Exact(Scalar::Decimal(dec!(1.25))))
        );
        assert_eq!(
            criteria.get("year"),
            Some(&Predicate::Range {
                min: Some(Scalar::Integer(1980)),
                max: Some(Scalar::Integer(2000)),
            })
        );
        assert_eq!(criteria.get("for_sale"), Some(&Predicate::Is(true)));
    }

    #[test]
    fn open_range_ends() {
        let criteria = args(&[], &[], &["date_acquired=2020-01-01.."], &[])
            .to_criteria()
            .unwrap();
        assert_eq!(
            criteria.get("date_acquired"),
            Some(&Predicate::Range {
                min: Some(Scalar::Date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())),
                max: None,
            })
        );
    }

    #[test]
    fn unknown_fields_pass_through() {
        let criteria = args(&[], &["bogus_field=x"], &[], &[]).to_criteria().unwrap();
        assert_eq!(
            criteria.get("bogus_field"),
            Some(&Predicate::Exact(Scalar::Text("x".into())))
        );
    }

    #[test]
    fn malformed_arguments() {
        assert_eq!(
            args(&["country"], &[], &[], &[]).to_criteria(),
            Err(ArgError::MissingEquals("country".into()))
        );
        assert_eq!(
            args(&[], &[], &["year=1990"], &[]).to_criteria(),
            Err(ArgError::MissingRange("year=1990".into()))
        );
        assert!(matches!(
            args(&[], &["year=nineteen"], &[], &[]).to_criteria(),
            Err(ArgError::InvalidValue { .. })
        ));
        assert!(matches!(
            args(&[], &[], &[], &["want_list=maybe"]).to_criteria(),
            Err(ArgError::InvalidFlag { .. })
        ));
    }

    #[test]
    fn values_keep_equals_signs() {
        let criteria = args(&["notes=a=b"], &[], &[], &[]).to_criteria().unwrap();
        assert_eq!(
            criteria.get("notes"),
            Some(&Predicate::Contains("a=b".into()))
        );
    }
}
