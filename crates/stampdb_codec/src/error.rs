//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding a row.
///
/// A missing or NULL column is never an error; these variants describe
/// columns that hold something that cannot be interpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Column holds a value of the wrong kind.
    #[error("column `{column}`: expected {expected}, found {found}")]
    TypeMismatch {
        /// Column name.
        column: String,
        /// Kind the decoder expected.
        expected: &'static str,
        /// Kind actually stored.
        found: &'static str,
    },

    /// Integer does not fit the target field.
    #[error("column `{column}`: value {value} is out of range")]
    OutOfRange {
        /// Column name.
        column: String,
        /// The offending value.
        value: i64,
    },

    /// Text could not be parsed as an exact decimal.
    #[error("column `{column}`: invalid decimal {text:?}")]
    InvalidDecimal {
        /// Column name.
        column: String,
        /// The offending text.
        text: String,
    },

    /// Text could not be parsed as a calendar date.
    #[error("column `{column}`: invalid date {text:?}")]
    InvalidDate {
        /// Column name.
        column: String,
        /// The offending text.
        text: String,
    },

    /// Text is not one of the labels of an enumerated field.
    #[error("column `{column}`: unknown label {label:?}")]
    InvalidLabel {
        /// Column name.
        column: String,
        /// The offending label.
        label: String,
    },

    /// Decimal is too large for the fixed-scale representation.
    #[error("column `{column}`: decimal overflows the fixed-scale range")]
    DecimalOverflow {
        /// Column name.
        column: String,
    },

    /// Decimal has more fractional digits than the fixed scale keeps.
    #[error("column `{column}`: {value} has more than {max} fractional digits")]
    TooManyFractionDigits {
        /// Column name.
        column: String,
        /// The offending value, as text.
        value: String,
        /// Maximum number of fractional digits.
        max: u32,
    },
}

impl CodecError {
    /// Creates a type mismatch error.
    pub fn type_mismatch(
        column: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            column: column.into(),
            expected,
            found,
        }
    }

    /// Creates an invalid label error.
    pub fn invalid_label(column: impl Into<String>, label: impl Into<String>) -> Self {
        Self::InvalidLabel {
            column: column.into(),
            label: label.into(),
        }
    }

    /// Returns the column the error refers to.
    pub fn column(&self) -> &str {
        match self {
            Self::TypeMismatch { column, .. }
            | Self::OutOfRange { column, .. }
            | Self::InvalidDecimal { column, .. }
            | Self::InvalidDate { column, .. }
            | Self::InvalidLabel { column, .. }
            | Self::DecimalOverflow { column }
            | Self::TooManyFractionDigits { column, .. } => column,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_column() {
        let err = CodecError::type_mismatch("year", "integer", "text");
        assert_eq!(err.to_string(), "column `year`: expected integer, found text");
        assert_eq!(err.column(), "year");
    }

    #[test]
    fn invalid_label_message() {
        let err = CodecError::invalid_label("condition", "pristine");
        assert!(err.to_string().contains("pristine"));
    }
}
