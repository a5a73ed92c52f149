//! # StampDB Codec
//!
//! Storage-agnostic building blocks for flat persistent rows.
//!
//! This crate provides:
//! - [`Value`], the primitive a single column can hold (NULL, integer, real, text)
//! - [`Row`], a flat mapping of column name to [`Value`]
//! - Fixed-scale decimal encoding, so money never passes through binary floats
//! - ISO-8601 calendar date encoding
//!
//! ## Fixed-scale decimals
//!
//! Decimals are stored as integer multiples of `10^-SCALE`. This keeps the
//! stored form exact and lets the storage engine compare values numerically.
//!
//! ```
//! use stampdb_codec::{decimal_to_units, units_to_decimal};
//! use rust_decimal::Decimal;
//! use std::str::FromStr;
//!
//! let price = Decimal::from_str("15.50").unwrap();
//! let units = decimal_to_units("price", price).unwrap();
//! assert_eq!(units, 155_000);
//! assert_eq!(units_to_decimal(units), price);
//! ```
//!
//! Columns declared by other programs as text or numeric hold the amount
//! itself instead; [`DecimalEncoding`] tells the two apart.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod fixed;
mod row;
mod value;

pub use error::{CodecError, CodecResult};
pub use fixed::{
    date_from_text, date_to_text, decimal_from_real, decimal_from_text, decimal_to_units,
    units_to_decimal, DecimalEncoding, SCALE,
};
pub use row::Row;
pub use value::Value;
