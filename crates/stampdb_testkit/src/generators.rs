//! Property-based test generators using proptest.
//!
//! Provides strategies for generating stamps that satisfy the record
//! invariants, and search cases paired with an in-memory oracle.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use stampdb_core::{Condition, Criteria, Stamp};

/// Strategy for non-negative money values with at most four fractional
/// digits.
pub fn money_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000, 0u32..=4).prop_map(|(units, scale)| Decimal::new(units, scale))
}

/// Strategy for conditions.
pub fn condition_strategy() -> impl Strategy<Value = Condition> {
    prop::sample::select(Condition::ALL.to_vec())
}

/// Strategy for calendar dates between 1840 and 2100.
pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1840i32..2100, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default())
}

/// Strategy for country names, mixing common values with arbitrary text that
/// includes LIKE metacharacters.
pub fn country_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        Just("USA".to_string()),
        Just("Canada".to_string()),
        Just("Russia (USSR)".to_string()),
        "[a-zA-Z %_]{1,10}",
    ])
}

/// Strategy for free-text fields, quotes included.
pub fn text_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of("[a-zA-Z0-9 '%_\\\\-]{0,16}")
}

/// Strategy for valid stamps.
pub fn stamp_strategy() -> impl Strategy<Value = Stamp> {
    let identity = (
        "[A-Z0-9]{1,8}",
        "[a-zA-Z ]{0,20}",
        country_strategy(),
        prop::option::of(-100i32..3000),
        condition_strategy(),
        text_strategy(),
    );
    let values = (
        money_strategy(),
        money_strategy(),
        money_strategy(),
        money_strategy(),
        0u32..1000,
        0u32..1000,
    );
    let extras = (
        text_strategy(),
        prop::option::of(date_strategy()),
        prop::array::uniform5(any::<bool>()),
    );

    (identity, values, extras).prop_map(
        |(
            (number, description, country, year, condition, notes),
            (mint, used, price, market, qm, qu),
            (source, acquired, flags),
        )| Stamp {
            country,
            year,
            condition,
            notes,
            catalog_value_mint: mint,
            catalog_value_used: used,
            purchase_price: price,
            current_market_value: market,
            quantity_mint: qm,
            quantity_used: qu,
            source,
            date_acquired: acquired,
            is_favorite: flags[0],
            plate_block: flags[1],
            first_day_cover: flags[2],
            want_list: flags[3],
            for_sale: flags[4],
            ..Stamp::new(number, description)
        },
    )
}

/// Strategy for a batch of stamps.
pub fn stamps_strategy(max: usize) -> impl Strategy<Value = Vec<Stamp>> {
    prop::collection::vec(stamp_strategy(), 0..=max)
}

/// A search over a few fields, with an oracle that says which stamps it
/// should return.
#[derive(Debug, Clone, Default)]
pub struct SearchCase {
    /// Country contains this, ASCII case-insensitively.
    pub country_contains: Option<String>,
    /// Year within these bounds, either of which may be open.
    pub year: Option<(Option<i32>, Option<i32>)>,
    /// Condition equals this.
    pub condition: Option<Condition>,
    /// `for_sale` equals this.
    pub for_sale: Option<bool>,
}

impl SearchCase {
    /// The criteria to hand to the store.
    pub fn criteria(&self) -> Criteria {
        let mut criteria = Criteria::new();
        if let Some(needle) = &self.country_contains {
            criteria = criteria.contains("country", needle.as_str());
        }
        match self.year {
            Some((Some(lo), Some(hi))) => criteria = criteria.between("year", lo, hi),
            Some((Some(lo), None)) => criteria = criteria.at_least("year", lo),
            Some((None, Some(hi))) => criteria = criteria.at_most("year", hi),
            _ => {}
        }
        if let Some(condition) = self.condition {
            criteria = criteria.equals("condition", condition);
        }
        if let Some(flag) = self.for_sale {
            criteria = criteria.is("for_sale", flag);
        }
        criteria
    }

    /// Whether `stamp` should be among the results.
    pub fn matches(&self, stamp: &Stamp) -> bool {
        let country_ok = self.country_contains.as_ref().is_none_or(|needle| {
            stamp.country.as_ref().is_some_and(|country| {
                country
                    .to_ascii_lowercase()
                    .contains(&needle.to_ascii_lowercase())
            })
        });
        let year_ok = match self.year {
            Some((lo, hi)) => stamp.year.is_some_and(|year| {
                lo.is_none_or(|lo| year >= lo) && hi.is_none_or(|hi| year <= hi)
            }),
            None => true,
        };
        let condition_ok = self.condition.is_none_or(|c| stamp.condition == c);
        let for_sale_ok = self.for_sale.is_none_or(|f| stamp.for_sale == f);
        country_ok && year_ok && condition_ok && for_sale_ok
    }
}

/// Strategy for search cases. Inverted year bounds and fully open ranges are
/// never generated.
pub fn search_case_strategy() -> impl Strategy<Value = SearchCase> {
    let year = prop_oneof![
        (-100i32..3000, 0i32..500).prop_map(|(lo, span)| (Some(lo), Some(lo + span))),
        (-100i32..3000).prop_map(|lo| (Some(lo), None)),
        (-100i32..3000).prop_map(|hi| (None, Some(hi))),
    ];
    (
        prop::option::of("[a-zA-Z %_]{1,3}"),
        prop::option::of(year),
        prop::option::of(condition_strategy()),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(country_contains, year, condition, for_sale)| SearchCase {
            country_contains,
            year,
            condition,
            for_sale,
        })
}
