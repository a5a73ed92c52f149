//! The stamp record model.

mod condition;
mod id;

pub use condition::{Condition, UnknownCondition};
pub use id::StampId;

use crate::error::{CoreError, CoreResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stampdb_codec::{decimal_to_units, CodecError};

/// One collectible stamp.
///
/// A `Stamp` is a plain value. It has no identity of its own until the
/// store persists it and hands back a [`StampId`]; reads always rebuild a
/// fresh value from the stored row.
///
/// Every field except `catalog_number` has a default, so partially filled
/// stamps can be built with struct update syntax:
///
/// ```
/// use stampdb_core::{Condition, Stamp};
///
/// let stamp = Stamp {
///     country: Some("USA".into()),
///     condition: Condition::Mint,
///     quantity_mint: 2,
///     ..Stamp::new("2345", "Olympic rings")
/// };
/// assert_eq!(stamp.quantity_used, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stamp {
    /// Catalog number, e.g. a Scott number. Not unique.
    pub catalog_number: String,
    /// Free-text description.
    pub description: String,
    /// Issuing country.
    pub country: Option<String>,
    /// Year of issue. Stored as given.
    pub year: Option<i32>,
    /// Face value as printed.
    pub denomination: Option<String>,
    /// Color.
    pub color: Option<String>,
    /// Mint, used or unknown.
    pub condition: Condition,
    /// Free-text grade such as "Very Fine".
    pub grade: Option<String>,
    /// Gum condition.
    pub gum_condition: Option<String>,
    /// Perforation gauge.
    pub perforation: Option<String>,
    /// Catalog value of one mint copy.
    pub catalog_value_mint: Decimal,
    /// Catalog value of one used copy.
    pub catalog_value_used: Decimal,
    /// What was paid.
    pub purchase_price: Decimal,
    /// Current market value.
    pub current_market_value: Decimal,
    /// Mint copies held.
    pub quantity_mint: u32,
    /// Used copies held.
    pub quantity_used: u32,
    /// Where the stamp is kept.
    pub location: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Where the stamp came from.
    pub source: Option<String>,
    /// Path to a scan or photo.
    pub image_path: Option<String>,
    /// Date the stamp was acquired.
    pub date_acquired: Option<NaiveDate>,
    /// Marked as a favorite.
    pub is_favorite: bool,
    /// Held as a plate block.
    pub plate_block: bool,
    /// Held on a first day cover.
    pub first_day_cover: bool,
    /// On the want list.
    pub want_list: bool,
    /// Offered for sale.
    pub for_sale: bool,
}

impl Stamp {
    /// Creates a stamp with every optional field at its default.
    pub fn new(catalog_number: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            catalog_number: catalog_number.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Starts a validating builder.
    pub fn builder(catalog_number: impl Into<String>) -> StampBuilder {
        StampBuilder::new(catalog_number)
    }

    /// `catalog_value_mint * quantity_mint + catalog_value_used * quantity_used`.
    pub fn total_value(&self) -> Decimal {
        self.total_value_mint() + self.total_value_used()
    }

    /// Value of the mint copies held.
    pub fn total_value_mint(&self) -> Decimal {
        self.catalog_value_mint * Decimal::from(self.quantity_mint)
    }

    /// Value of the used copies held.
    pub fn total_value_used(&self) -> Decimal {
        self.catalog_value_used * Decimal::from(self.quantity_used)
    }

    /// Mint plus used copies.
    pub fn total_quantity(&self) -> u64 {
        u64::from(self.quantity_mint) + u64::from(self.quantity_used)
    }

    /// Checks the record invariants.
    ///
    /// Quantities cannot be negative by construction. Money fields must be
    /// non-negative and representable at the storage scale; the catalog
    /// number must not be blank. `year` is not range-checked.
    pub fn validate(&self) -> CoreResult<()> {
        if self.catalog_number.trim().is_empty() {
            return Err(CoreError::validation("catalog_number", "must not be blank"));
        }

        for (field, value) in self.money_fields() {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(CoreError::validation(
                    field,
                    format!("must not be negative, got {value}"),
                ));
            }
            decimal_to_units(field, value).map_err(|e| match e {
                CodecError::TooManyFractionDigits { max, .. } => CoreError::validation(
                    field,
                    format!("{value} has more than {max} fractional digits"),
                ),
                _ => CoreError::validation(field, format!("{value} is too large")),
            })?;
        }

        Ok(())
    }

    fn money_fields(&self) -> [(&'static str, Decimal); 4] {
        [
            ("catalog_value_mint", self.catalog_value_mint),
            ("catalog_value_used", self.catalog_value_used),
            ("purchase_price", self.purchase_price),
            ("current_market_value", self.current_market_value),
        ]
    }
}

impl AsRef<Stamp> for Stamp {
    fn as_ref(&self) -> &Stamp {
        self
    }
}

/// A stamp together with the identifier the store assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredStamp {
    /// Store identifier.
    pub id: StampId,
    /// The record.
    #[serde(flatten)]
    pub stamp: Stamp,
}

impl StoredStamp {
    /// Splits into identifier and record.
    pub fn into_parts(self) -> (StampId, Stamp) {
        (self.id, self.stamp)
    }
}

impl AsRef<Stamp> for StoredStamp {
    fn as_ref(&self) -> &Stamp {
        &self.stamp
    }
}

/// Builder that validates on [`StampBuilder::build`].
#[derive(Debug, Clone)]
#[must_use]
pub struct StampBuilder {
    stamp: Stamp,
}

impl StampBuilder {
    /// Creates a builder for the given catalog number.
    pub fn new(catalog_number: impl Into<String>) -> Self {
        Self {
            stamp: Stamp::new(catalog_number, ""),
        }
    }

    /// Sets the description.
    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.stamp.description = value.into();
        self
    }

    /// Sets the country.
    pub fn country(mut self, value: impl Into<String>) -> Self {
        self.stamp.country = Some(value.into());
        self
    }

    /// Sets the year of issue.
    pub fn year(mut self, value: i32) -> Self {
        self.stamp.year = Some(value);
        self
    }

    /// Sets the denomination.
    pub fn denomination(mut self, value: impl Into<String>) -> Self {
        self.stamp.denomination = Some(value.into());
        self
    }

    /// Sets the color.
    pub fn color(mut self, value: impl Into<String>) -> Self {
        self.stamp.color = Some(value.into());
        self
    }

    /// Sets the condition.
    pub fn condition(mut self, value: Condition) -> Self {
        self.stamp.condition = value;
        self
    }

    /// Sets the grade.
    pub fn grade(mut self, value: impl Into<String>) -> Self {
        self.stamp.grade = Some(value.into());
        self
    }

    /// Sets mint catalog value and quantity together.
    pub fn mint(mut self, catalog_value: Decimal, quantity: u32) -> Self {
        self.stamp.catalog_value_mint = catalog_value;
        self.stamp.quantity_mint = quantity;
        self
    }

    /// Sets used catalog value and quantity together.
    pub fn used(mut self, catalog_value: Decimal, quantity: u32) -> Self {
        self.stamp.catalog_value_used = catalog_value;
        self.stamp.quantity_used = quantity;
        self
    }

    /// Sets the purchase price.
    pub fn purchase_price(mut self, value: Decimal) -> Self {
        self.stamp.purchase_price = value;
        self
    }

    /// Sets the current market value.
    pub fn current_market_value(mut self, value: Decimal) -> Self {
        self.stamp.current_market_value = value;
        self
    }

    /// Sets the storage location.
    pub fn location(mut self, value: impl Into<String>) -> Self {
        self.stamp.location = Some(value.into());
        self
    }

    /// Sets the notes.
    pub fn notes(mut self, value: impl Into<String>) -> Self {
        self.stamp.notes = Some(value.into());
        self
    }

    /// Sets the source.
    pub fn source(mut self, value: impl Into<String>) -> Self {
        self.stamp.source = Some(value.into());
        self
    }

    /// Sets the acquisition date.
    pub fn date_acquired(mut self, value: NaiveDate) -> Self {
        self.stamp.date_acquired = Some(value);
        self
    }

    /// Sets the favorite flag.
    pub fn favorite(mut self, value: bool) -> Self {
        self.stamp.is_favorite = value;
        self
    }

    /// Sets the want-list flag.
    pub fn want_list(mut self, value: bool) -> Self {
        self.stamp.want_list = value;
        self
    }

    /// Sets the for-sale flag.
    pub fn for_sale(mut self, value: bool) -> Self {
        self.stamp.for_sale = value;
        self
    }

    /// Validates and returns the stamp.
    pub fn build(self) -> CoreResult<Stamp> {
        self.stamp.validate()?;
        Ok(self.stamp)
    }
}
