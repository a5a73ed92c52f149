//! Fixed-scale decimal and calendar date encodings.

use crate::error::{CodecError, CodecResult};
use crate::value::Value;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Number of fractional digits kept by the fixed-scale decimal encoding.
///
/// A stored integer `n` represents the decimal `n * 10^-SCALE`.
pub const SCALE: u32 = 4;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Encodes a decimal as an integer count of `10^-SCALE` units.
///
/// Fails if the value has more than [`SCALE`] significant fractional digits
/// (trailing zeros do not count) or does not fit in an `i64`.
pub fn decimal_to_units(column: &str, value: Decimal) -> CodecResult<i64> {
    let normalized = value.normalize();
    if normalized.scale() > SCALE {
        return Err(CodecError::TooManyFractionDigits {
            column: column.to_string(),
            value: normalized.to_string(),
            max: SCALE,
        });
    }

    let mut scaled = normalized;
    scaled.rescale(SCALE);
    if scaled.scale() != SCALE {
        return Err(CodecError::DecimalOverflow {
            column: column.to_string(),
        });
    }

    i64::try_from(scaled.mantissa()).map_err(|_| CodecError::DecimalOverflow {
        column: column.to_string(),
    })
}

/// Decodes an integer count of `10^-SCALE` units.
pub fn units_to_decimal(units: i64) -> Decimal {
    Decimal::new(units, SCALE).normalize()
}

/// Parses a decimal written as text, exactly.
pub fn decimal_from_text(column: &str, text: &str) -> CodecResult<Decimal> {
    Decimal::from_str_exact(text.trim()).map_err(|_| CodecError::InvalidDecimal {
        column: column.to_string(),
        text: text.to_string(),
    })
}

/// Recovers a decimal from a binary float left behind by a foreign writer.
///
/// The float is read through its shortest round-trip text form, so `15.5`
/// comes back as exactly `15.5` rather than `15.4999999999999...`.
pub fn decimal_from_real(column: &str, real: f64) -> CodecResult<Decimal> {
    if !real.is_finite() {
        return Err(CodecError::InvalidDecimal {
            column: column.to_string(),
            text: real.to_string(),
        });
    }
    decimal_from_text(column, &real.to_string())
}

/// How a decimal column holds its values.
///
/// Tables created by the store use [`DecimalEncoding::Units`]. Tables written
/// by other programs may declare money columns as text, real or numeric; those
/// hold the amount itself and use [`DecimalEncoding::Text`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DecimalEncoding {
    /// Integer count of `10^-SCALE` units.
    #[default]
    Units,
    /// The amount itself, written as exact decimal text.
    Text,
}

impl DecimalEncoding {
    /// Picks the encoding for a column from its declared SQL type.
    ///
    /// Follows SQLite's affinity rules: any declared type containing `INT`
    /// has integer affinity and holds units. Everything else would turn a
    /// unit count into a different amount, so it holds the amount.
    pub fn for_declared_type(declared: &str) -> Self {
        if declared.to_ascii_uppercase().contains("INT") {
            DecimalEncoding::Units
        } else {
            DecimalEncoding::Text
        }
    }

    /// Encodes a decimal for a column with this encoding.
    ///
    /// Both encodings reject values [`decimal_to_units`] rejects, so a value
    /// accepted by one column is accepted by every column.
    pub fn encode(self, column: &str, value: Decimal) -> CodecResult<Value> {
        let units = decimal_to_units(column, value)?;
        Ok(match self {
            DecimalEncoding::Units => Value::Integer(units),
            DecimalEncoding::Text => Value::Text(units_to_decimal(units).to_string()),
        })
    }

    /// Decodes a stored decimal.
    ///
    /// Only the meaning of an integer differs between encodings. Reals and
    /// text always hold the amount itself, whichever column they sit in.
    pub fn decode(self, column: &str, value: &Value) -> CodecResult<Option<Decimal>> {
        match (self, value) {
            (_, Value::Null) => Ok(None),
            (DecimalEncoding::Units, Value::Integer(units)) => Ok(Some(units_to_decimal(*units))),
            (DecimalEncoding::Text, Value::Integer(n)) => Ok(Some(Decimal::from(*n))),
            (_, Value::Real(r)) => decimal_from_real(column, *r).map(Some),
            (_, Value::Text(s)) => decimal_from_text(column, s).map(Some),
        }
    }
}

/// Formats a date as `YYYY-MM-DD`.
///
/// This form sorts lexicographically in date order.
pub fn date_to_text(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a `YYYY-MM-DD` date.
pub fn date_from_text(column: &str, text: &str) -> CodecResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).map_err(|_| CodecError::InvalidDate {
        column: column.to_string(),
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn units_roundtrip_keeps_value() {
        for value in [dec!(0), dec!(0.10), dec!(15.50), dec!(1234.5678), dec!(-3.25)] {
            let units = decimal_to_units("v", value).unwrap();
            assert_eq!(units_to_decimal(units), value);
        }
    }

    #[test]
    fn trailing_zeros_do_not_count_as_digits() {
        assert_eq!(decimal_to_units("v", dec!(1.230000)).unwrap(), 12_300);
    }

    #[test]
    fn too_many_digits_rejected() {
        let err = decimal_to_units("catalog_value_mint", dec!(0.00001)).unwrap_err();
        assert!(matches!(err, CodecError::TooManyFractionDigits { max: 4, .. }));
    }

    #[test]
    fn overflow_rejected() {
        let err = decimal_to_units("v", Decimal::MAX).unwrap_err();
        assert!(matches!(err, CodecError::DecimalOverflow { .. }));
    }

    #[test]
    fn text_is_parsed_exactly() {
        assert_eq!(decimal_from_text("v", " 0.10 ").unwrap(), dec!(0.10));
        assert!(decimal_from_text("v", "ten").is_err());
    }

    #[test]
    fn real_uses_shortest_form() {
        assert_eq!(decimal_from_real("v", 15.5).unwrap(), dec!(15.5));
        assert_eq!(decimal_from_real("v", 0.1).unwrap(), dec!(0.1));
        assert!(decimal_from_real("v", f64::NAN).is_err());
    }

    #[test]
    fn encoding_follows_declared_affinity() {
        assert_eq!(DecimalEncoding::for_declared_type("INTEGER"), DecimalEncoding::Units);
        assert_eq!(DecimalEncoding::for_declared_type("bigint"), DecimalEncoding::Units);
        assert_eq!(DecimalEncoding::for_declared_type("TEXT"), DecimalEncoding::Text);
        assert_eq!(DecimalEncoding::for_declared_type("DECIMAL(10,2)"), DecimalEncoding::Text);
        assert_eq!(DecimalEncoding::for_declared_type("REAL"), DecimalEncoding::Text);
        assert_eq!(DecimalEncoding::for_declared_type(""), DecimalEncoding::Text);
    }

    #[test]
    fn text_encoding_writes_the_amount() {
        let text = DecimalEncoding::Text;
        assert_eq!(text.encode("v", dec!(15.50)).unwrap(), Value::Text("15.5".into()));
        assert_eq!(text.encode("v", dec!(0)).unwrap(), Value::Text("0".into()));
        assert!(text.encode("v", dec!(0.00001)).is_err());
        assert_eq!(
            DecimalEncoding::Units.encode("v", dec!(15.50)).unwrap(),
            Value::Integer(155_000)
        );
    }

    #[test]
    fn integers_mean_units_only_in_unit_columns() {
        let stored = Value::Integer(155_000);
        assert_eq!(DecimalEncoding::Units.decode("v", &stored).unwrap(), Some(dec!(15.5)));
        assert_eq!(DecimalEncoding::Text.decode("v", &stored).unwrap(), Some(dec!(155000)));

        for encoding in [DecimalEncoding::Units, DecimalEncoding::Text] {
            assert_eq!(encoding.decode("v", &Value::Real(3.1)).unwrap(), Some(dec!(3.10)));
            assert_eq!(encoding.decode("v", &Value::from("3.10")).unwrap(), Some(dec!(3.10)));
            assert_eq!(encoding.decode("v", &Value::Null).unwrap(), None);
        }
    }

    #[test]
    fn dates() {
        let date = NaiveDate::from_ymd_opt(1994, 7, 4).unwrap();
        assert_eq!(date_to_text(date), "1994-07-04");
        assert_eq!(date_from_text("d", "1994-07-04").unwrap(), date);
        assert!(matches!(
            date_from_text("d", "04/07/1994"),
            Err(CodecError::InvalidDate { .. })
        ));
    }

    proptest! {
        #[test]
        fn any_four_digit_amount_survives(units in -1_000_000_000_000i64..1_000_000_000_000i64) {
            let value = Decimal::new(units, SCALE);
            prop_assert_eq!(decimal_to_units("v", value).unwrap(), units);
        }
    }
}
