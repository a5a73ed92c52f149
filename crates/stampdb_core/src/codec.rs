//! Row codec: the translation boundary between [`Stamp`] and a flat [`Row`].

use crate::schema::Encodings;
use crate::stamp::{Condition, Stamp};
use rust_decimal::Decimal;
use stampdb_codec::{date_to_text, CodecError, CodecResult, Row, Value};

/// Trait for types that can be stored as a flat row.
///
/// Implementors must guarantee `from_row(&to_row()?) == self` for every
/// valid value, and must decode a missing or NULL column to the field's
/// default rather than failing.
///
/// # Example
///
/// ```
/// use stampdb_core::{RowCodec, Stamp};
///
/// let stamp = Stamp::new("C3", "Columbus");
/// let row = stamp.to_row().unwrap();
/// assert_eq!(Stamp::from_row(&row).unwrap(), stamp);
/// ```
pub trait RowCodec: Sized {
    /// Encodes the value into a row of a table the store created.
    ///
    /// Fails only for values that break the storage representation, such as
    /// a decimal with more fractional digits than the fixed scale.
    fn to_row(&self) -> CodecResult<Row> {
        self.to_row_with(&Encodings::default())
    }

    /// Decodes a value from a row of a table the store created.
    fn from_row(row: &Row) -> CodecResult<Self> {
        Self::from_row_with(row, &Encodings::default())
    }

    /// Encodes the value for a table whose decimal columns use `encodings`.
    fn to_row_with(&self, encodings: &Encodings) -> CodecResult<Row>;

    /// Decodes a value from a table whose decimal columns use `encodings`.
    fn from_row_with(row: &Row, encodings: &Encodings) -> CodecResult<Self>;
}

impl RowCodec for Stamp {
    fn to_row_with(&self, encodings: &Encodings) -> CodecResult<Row> {
        let money = |column: &str, value: Decimal| encodings.decimal(column).encode(column, value);

        let mut row = Row::new();
        row.set("catalog_number", self.catalog_number.as_str());
        row.set("description", self.description.as_str());
        row.set("country", self.country.clone());
        row.set("year", self.year);
        row.set("denomination", self.denomination.clone());
        row.set("color", self.color.clone());
        row.set("condition", self.condition.as_str());
        row.set("grade", self.grade.clone());
        row.set("gum_condition", self.gum_condition.clone());
        row.set("perforation", self.perforation.clone());
        row.set("catalog_value_mint", money("catalog_value_mint", self.catalog_value_mint)?);
        row.set("catalog_value_used", money("catalog_value_used", self.catalog_value_used)?);
        row.set("purchase_price", money("purchase_price", self.purchase_price)?);
        row.set("current_market_value", money("current_market_value", self.current_market_value)?);
        row.set("quantity_mint", self.quantity_mint);
        row.set("quantity_used", self.quantity_used);
        row.set("location", self.location.clone());
        row.set("notes", self.notes.clone());
        row.set("source", self.source.clone());
        row.set("image_path", self.image_path.clone());
        row.set(
            "date_acquired",
            self.date_acquired.map_or(Value::Null, |d| Value::Text(date_to_text(d))),
        );
        row.set("is_favorite", self.is_favorite);
        row.set("plate_block", self.plate_block);
        row.set("first_day_cover", self.first_day_cover);
        row.set("want_list", self.want_list);
        row.set("for_sale", self.for_sale);
        Ok(row)
    }

    fn from_row_with(row: &Row, encodings: &Encodings) -> CodecResult<Self> {
        let money = |column: &str| -> CodecResult<Decimal> {
            Ok(row
                .decimal_as(column, encodings.decimal(column))?
                .unwrap_or_default())
        };

        let condition = match row.text("condition")? {
            None => Condition::default(),
            Some(label) => label
                .parse()
                .map_err(|_| CodecError::invalid_label("condition", label))?,
        };

        let year = match row.integer("year")? {
            None => None,
            Some(n) => Some(i32::try_from(n).map_err(|_| CodecError::OutOfRange {
                column: "year".to_string(),
                value: n,
            })?),
        };

        Ok(Stamp {
            catalog_number: row.text("catalog_number")?.unwrap_or_default(),
            description: row.text("description")?.unwrap_or_default(),
            country: row.text("country")?,
            year,
            denomination: row.text("denomination")?,
            color: row.text("color")?,
            condition,
            grade: row.text("grade")?,
            gum_condition: row.text("gum_condition")?,
            perforation: row.text("perforation")?,
            catalog_value_mint: money("catalog_value_mint")?,
            catalog_value_used: money("catalog_value_used")?,
            purchase_price: money("purchase_price")?,
            current_market_value: money("current_market_value")?,
            quantity_mint: row.unsigned("quantity_mint")?.unwrap_or_default(),
            quantity_used: row.unsigned("quantity_used")?.unwrap_or_default(),
            location: row.text("location")?,
            notes: row.text("notes")?,
            source: row.text("source")?,
            image_path: row.text("image_path")?,
            date_acquired: row.date("date_acquired")?,
            is_favorite: row.boolean("is_favorite")?.unwrap_or_default(),
            plate_block: row.boolean("plate_block")?.unwrap_or_default(),
            first_day_cover: row.boolean("first_day_cover")?.unwrap_or_default(),
            want_list: row.boolean("want_list")?.unwrap_or_default(),
            for_sale: row.boolean("for_sale")?.unwrap_or_default(),
        })
    }
}
