//! Statistics over a set of stamps.
//!
//! All money sums use exact decimal arithmetic, so totals never drift no
//! matter how many values are added.

use crate::error::{CoreError, CoreResult};
use crate::stamp::Stamp;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Field a breakdown groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// Issuing country.
    Country,
    /// Mint, used or unknown.
    Condition,
    /// Year of issue.
    Year,
    /// Denomination.
    Denomination,
    /// Where the stamp came from.
    Source,
    /// Storage location.
    Location,
}

impl GroupBy {
    /// All grouping fields.
    pub const ALL: [GroupBy; 6] = [
        GroupBy::Country,
        GroupBy::Condition,
        GroupBy::Year,
        GroupBy::Denomination,
        GroupBy::Source,
        GroupBy::Location,
    ];

    /// Field name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Country => "country",
            GroupBy::Condition => "condition",
            GroupBy::Year => "year",
            GroupBy::Denomination => "denomination",
            GroupBy::Source => "source",
            GroupBy::Location => "location",
        }
    }

    /// The grouping key of a stamp. Blank keys are unspecified.
    pub fn key_of(&self, stamp: &Stamp) -> GroupKey {
        let raw = match self {
            GroupBy::Country => stamp.country.clone(),
            GroupBy::Condition => Some(stamp.condition.as_str().to_string()),
            GroupBy::Year => stamp.year.map(|y| y.to_string()),
            GroupBy::Denomination => stamp.denomination.clone(),
            GroupBy::Source => stamp.source.clone(),
            GroupBy::Location => stamp.location.clone(),
        };
        GroupKey::from(raw)
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupBy::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = GroupBy::ALL.iter().map(GroupBy::as_str).collect();
                format!("unknown group-by field {s:?}, expected one of {}", names.join(", "))
            })
    }
}

/// A breakdown bucket key.
///
/// Ordered by value, with [`GroupKey::Unspecified`] after every value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    /// A trimmed, non-empty key.
    Value(String),
    /// The key was absent, empty or whitespace.
    Unspecified,
}

impl From<Option<String>> for GroupKey {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => GroupKey::Value(key.to_string()),
            _ => GroupKey::Unspecified,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Value(key) => f.write_str(key),
            GroupKey::Unspecified => f.write_str("(unspecified)"),
        }
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GroupKey::Value(key) => serializer.serialize_str(key),
            GroupKey::Unspecified => serializer.serialize_none(),
        }
    }
}

/// Summary metrics over a set of stamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    /// Number of records.
    pub record_count: u64,
    /// Mint copies.
    pub quantity_mint: u64,
    /// Used copies.
    pub quantity_used: u64,
    /// Mint plus used copies.
    pub quantity_total: u64,
    /// Catalog value of the mint copies.
    pub total_value_mint: Decimal,
    /// Catalog value of the used copies.
    pub total_value_used: Decimal,
    /// Catalog value of all copies.
    pub total_value: Decimal,
    /// Sum of purchase prices.
    pub purchase_cost: Decimal,
    /// Sum of current market values.
    pub market_value: Decimal,
    /// Records on the want list.
    pub want_list: u64,
    /// Records offered for sale.
    pub for_sale: u64,
    /// Records marked favorite.
    pub favorites: u64,
}

impl Metrics {
    /// Adds one stamp.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if a money sum leaves the decimal range. The
    /// metrics are left unchanged in that case.
    pub fn add(&mut self, stamp: &Stamp) -> CoreResult<()> {
        let mint = product("total_value_mint", stamp.catalog_value_mint, stamp.quantity_mint)?;
        let used = product("total_value_used", stamp.catalog_value_used, stamp.quantity_used)?;
        let total_value_mint = sum("total_value_mint", self.total_value_mint, mint)?;
        let total_value_used = sum("total_value_used", self.total_value_used, used)?;
        let total_value = sum("total_value", self.total_value, sum("total_value", mint, used)?)?;
        let purchase_cost = sum("purchase_cost", self.purchase_cost, stamp.purchase_price)?;
        let market_value = sum("market_value", self.market_value, stamp.current_market_value)?;

        self.total_value_mint = total_value_mint;
        self.total_value_used = total_value_used;
        self.total_value = total_value;
        self.purchase_cost = purchase_cost;
        self.market_value = market_value;
        self.record_count += 1;
        self.quantity_mint += u64::from(stamp.quantity_mint);
        self.quantity_used += u64::from(stamp.quantity_used);
        self.quantity_total += stamp.total_quantity();
        self.want_list += u64::from(stamp.want_list);
        self.for_sale += u64::from(stamp.for_sale);
        self.favorites += u64::from(stamp.is_favorite);
        Ok(())
    }

    /// Combined value per record; zero when there are no records.
    pub fn average_value(&self) -> Decimal {
        if self.record_count == 0 {
            Decimal::ZERO
        } else {
            self.total_value / Decimal::from(self.record_count)
        }
    }
}

fn product(metric: &'static str, price: Decimal, quantity: u32) -> CoreResult<Decimal> {
    price
        .checked_mul(Decimal::from(quantity))
        .ok_or(CoreError::Overflow { metric })
}

fn sum(metric: &'static str, a: Decimal, b: Decimal) -> CoreResult<Decimal> {
    a.checked_add(b).ok_or(CoreError::Overflow { metric })
}

/// One group of a breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// Group key; serialized as `null` when unspecified.
    pub key: GroupKey,
    /// Metrics restricted to the group.
    pub metrics: Metrics,
}

/// Result of [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    /// Metrics over every record.
    pub totals: Metrics,
    /// Number of distinct non-blank countries.
    pub distinct_countries: usize,
    /// Field the breakdown groups by, if any.
    pub group_by: Option<GroupBy>,
    /// Buckets ordered by key, unspecified last. Empty without `group_by`.
    pub breakdown: Vec<Bucket>,
}

impl CollectionStats {
    /// Looks up a bucket by key.
    pub fn bucket(&self, key: &GroupKey) -> Option<&Metrics> {
        self.breakdown
            .iter()
            .find(|b| &b.key == key)
            .map(|b| &b.metrics)
    }
}

/// Computes summary metrics, optionally broken down by a field.
///
/// Every record lands in exactly one bucket, so bucket metrics always sum
/// to the totals. An empty input yields all-zero metrics.
///
/// # Errors
///
/// Returns `Overflow` if a money sum leaves the decimal range.
///
/// ```
/// use rust_decimal::Decimal;
/// use stampdb_core::{aggregate, GroupBy, Stamp};
///
/// let stamps = vec![
///     Stamp { country: Some("USA".into()), quantity_mint: 2, catalog_value_mint: Decimal::new(1550, 2), ..Stamp::new("1", "") },
///     Stamp::new("2", ""),
/// ];
/// let stats = aggregate(&stamps, Some(GroupBy::Country))?;
/// assert_eq!(stats.totals.total_value_mint, Decimal::new(3100, 2));
/// assert_eq!(stats.breakdown.len(), 2);
/// # Ok::<(), stampdb_core::CoreError>(())
/// ```
pub fn aggregate<R: AsRef<Stamp>>(
    records: &[R],
    group_by: Option<GroupBy>,
) -> CoreResult<CollectionStats> {
    let mut totals = Metrics::default();
    let mut countries = BTreeSet::new();
    let mut groups: BTreeMap<GroupKey, Metrics> = BTreeMap::new();

    for record in records {
        let stamp = record.as_ref();
        totals.add(stamp)?;
        if let GroupKey::Value(country) = GroupBy::Country.key_of(stamp) {
            countries.insert(country);
        }
        if let Some(field) = group_by {
            groups.entry(field.key_of(stamp)).or_default().add(stamp)?;
        }
    }

    Ok(CollectionStats {
        totals,
        distinct_countries: countries.len(),
        group_by,
        breakdown: groups
            .into_iter()
            .map(|(key, metrics)| Bucket { key, metrics })
            .collect(),
    })
}
