//! Search and statistics over a populated store.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use stampdb_core::{
    aggregate, Condition, CoreError, Criteria, GroupBy, GroupKey, Predicate, RowCodec, Scalar,
    Stamp, StampId, StampStore,
};

fn stamp(number: &str, country: Option<&str>, year: Option<i32>) -> Stamp {
    Stamp {
        country: country.map(String::from),
        year,
        ..Stamp::new(number, "")
    }
}

/// A small store plus the ids, in insertion order.
fn populated() -> (StampStore, Vec<StampId>) {
    let store = StampStore::open_in_memory().unwrap();
    let stamps = vec![
        Stamp {
            condition: Condition::Mint,
            catalog_value_mint: dec!(15.50),
            quantity_mint: 2,
            ..stamp("1", Some("USA"), Some(1985))
        },
        Stamp {
            condition: Condition::Used,
            catalog_value_used: dec!(0.25),
            quantity_used: 4,
            want_list: true,
            ..stamp("2", Some("USA"), Some(1975))
        },
        Stamp {
            catalog_value_mint: dec!(2.00),
            for_sale: true,
            source: Some("auction".into()),
            ..stamp("3", Some("Russia (USSR)"), Some(1990))
        },
        Stamp {
            date_acquired: NaiveDate::from_ymd_opt(2020, 6, 1),
            notes: Some("100% perfect_centering".into()),
            ..stamp("4", Some("Canada"), Some(2000))
        },
        stamp("5", None, None),
    ];
    let ids = store.create_many(&stamps).unwrap();
    (store, ids)
}

fn ids(hits: &[stampdb_core::StoredStamp]) -> Vec<StampId> {
    hits.iter().map(|s| s.id).collect()
}

#[test]
fn country_contains_and_year_between() {
    let (store, all) = populated();
    let criteria = Criteria::new()
        .contains("country", "US")
        .between("year", 1980, 2000);

    let hits = store.search(&criteria).unwrap();
    assert_eq!(ids(&hits), vec![all[0], all[2]]);
}

#[test]
fn contains_is_case_insensitive() {
    let (store, all) = populated();
    let hits = store.search(&Criteria::new().contains("country", "canada")).unwrap();
    assert_eq!(ids(&hits), vec![all[3]]);
}

#[test]
fn empty_criteria_equals_list_all() {
    let (store, _) = populated();
    let searched = store.search(&Criteria::new()).unwrap();
    let listed = store.list_all().unwrap();
    assert_eq!(searched, listed);
}

#[test]
fn exact_and_boolean_predicates() {
    let (store, all) = populated();

    let mint = store
        .search(&Criteria::new().equals("condition", Condition::Mint))
        .unwrap();
    assert_eq!(ids(&mint), vec![all[0]]);

    let wanted = store.search(&Criteria::new().is("want_list", true)).unwrap();
    assert_eq!(ids(&wanted), vec![all[1]]);

    let not_for_sale = store.search(&Criteria::new().is("for_sale", false)).unwrap();
    assert_eq!(not_for_sale.len(), 4);

    let usa_1975 = store
        .search(&Criteria::new().equals("country", "USA").equals("year", 1975))
        .unwrap();
    assert_eq!(ids(&usa_1975), vec![all[1]]);
}

#[test]
fn exact_text_never_matches_null() {
    let (store, _) = populated();
    let hits = store.search(&Criteria::new().equals("country", "")).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn open_ended_ranges() {
    let (store, all) = populated();

    let recent = store.search(&Criteria::new().at_least("year", 1990)).unwrap();
    assert_eq!(ids(&recent), vec![all[2], all[3]]);

    let valuable = store
        .search(&Criteria::new().at_least("catalog_value_mint", dec!(2)))
        .unwrap();
    assert_eq!(ids(&valuable), vec![all[0], all[2]]);

    let cheap = store
        .search(&Criteria::new().between("catalog_value_used", dec!(0.01), dec!(0.2500)))
        .unwrap();
    assert_eq!(ids(&cheap), vec![all[1]]);

    let acquired = store
        .search(&Criteria::new().at_most("date_acquired", "2020-12-31"))
        .unwrap();
    assert_eq!(ids(&acquired), vec![all[3]]);
}

#[test]
fn like_metacharacters_match_literally() {
    let (store, all) = populated();

    let percent = store.search(&Criteria::new().contains("notes", "100%")).unwrap();
    assert_eq!(ids(&percent), vec![all[3]]);

    let underscore = store.search(&Criteria::new().contains("notes", "t_c")).unwrap();
    assert_eq!(ids(&underscore), vec![all[3]]);

    // `_` would otherwise match any single character.
    let wildcard = store.search(&Criteria::new().contains("notes", "0_ ")).unwrap();
    assert!(wildcard.is_empty());
}

#[test]
fn injection_looking_input_is_plain_data() {
    let store = StampStore::open_in_memory().unwrap();
    let nasty = "%' OR 1=1 --";
    let id = store
        .create(&Stamp {
            notes: Some(nasty.into()),
            ..Stamp::new("'; DROP TABLE stamps; --", nasty)
        })
        .unwrap();
    store.create(&Stamp::new("plain", "")).unwrap();

    let hits = store.search(&Criteria::new().contains("notes", nasty)).unwrap();
    assert_eq!(ids(&hits), vec![id]);
    let hits = store
        .search(&Criteria::new().equals("catalog_number", "' OR '1'='1"))
        .unwrap();
    assert!(hits.is_empty());
    assert_eq!(store.count().unwrap(), 2);
    assert_eq!(store.read(id).unwrap().catalog_number, "'; DROP TABLE stamps; --");
}

#[test]
fn invalid_criteria() {
    let (store, _) = populated();
    let cases = vec![
        Criteria::new().equals("bogus_field", "x"),
        Criteria::new().contains("year", "19"),
        Criteria::new().between("year", 2000, 1980),
        Criteria::new().with("year", Predicate::Range { min: None, max: None }),
        Criteria::new().equals("year", Scalar::Text("1990".into())),
        Criteria::new().is("country", true),
        Criteria::new().at_least("purchase_price", dec!(0.00001)),
    ];
    for criteria in cases {
        let err = store.search(&criteria).unwrap_err();
        assert!(
            matches!(err, CoreError::InvalidCriteria { .. }),
            "{criteria:?} gave {err}"
        );
    }
}

#[test]
fn three_records_total_exactly() {
    let store = StampStore::open_in_memory().unwrap();
    store
        .create(&Stamp {
            quantity_mint: 2,
            catalog_value_mint: dec!(15.50),
            ..Stamp::new("A", "")
        })
        .unwrap();
    store
        .create(&Stamp {
            catalog_value_mint: dec!(99.99),
            ..Stamp::new("B", "")
        })
        .unwrap();
    store.create(&Stamp::new("C", "")).unwrap();

    let stats = aggregate(&store.list_all().unwrap(), None).unwrap();
    assert_eq!(stats.totals.total_value_mint, dec!(31.00));
    assert_eq!(stats.totals.record_count, 3);
}

#[test]
fn many_tenths_sum_exactly() {
    let store = StampStore::open_in_memory().unwrap();
    let stamps: Vec<Stamp> = (0..500)
        .map(|i| Stamp {
            quantity_used: 1,
            catalog_value_used: dec!(0.10),
            ..Stamp::new(format!("T{i}"), "")
        })
        .collect();
    store.create_many(&stamps).unwrap();

    let stats = store.statistics(&Criteria::new(), None).unwrap();
    assert_eq!(stats.totals.total_value_used, dec!(50));
    assert_eq!(stats.totals.total_value, dec!(50.00));
}

#[test]
fn breakdown_partitions_every_grouping() {
    let (store, _) = populated();
    let all = store.list_all().unwrap();
    let total = aggregate(&all, None).unwrap().totals.total_value;

    for field in GroupBy::ALL {
        let stats = aggregate(&all, Some(field)).unwrap();
        let sum: Decimal = stats.breakdown.iter().map(|b| b.metrics.total_value).sum();
        let count: u64 = stats.breakdown.iter().map(|b| b.metrics.record_count).sum();
        assert_eq!(sum, total, "{field}");
        assert_eq!(count, all.len() as u64, "{field}");
    }
}

#[test]
fn breakdown_by_country() {
    let (store, _) = populated();
    let stats = store
        .statistics(&Criteria::new(), Some(GroupBy::Country))
        .unwrap();

    let usa = stats.bucket(&GroupKey::Value("USA".into())).unwrap();
    assert_eq!(usa.record_count, 2);
    assert_eq!(usa.total_value, dec!(32));
    assert_eq!(
        stats.breakdown.last().map(|b| &b.key),
        Some(&GroupKey::Unspecified)
    );
    assert_eq!(stats.distinct_countries, 3);
    assert_eq!(stats.totals.want_list, 1);
    assert_eq!(stats.totals.for_sale, 1);
}

#[test]
fn statistics_over_a_search() {
    let (store, _) = populated();
    let stats = store
        .statistics(&Criteria::new().equals("country", "USA"), Some(GroupBy::Condition))
        .unwrap();
    assert_eq!(stats.totals.record_count, 2);
    assert_eq!(stats.breakdown.len(), 2);
}

fn money() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|units| Decimal::new(units, 4))
}

fn valid_stamp() -> impl Strategy<Value = Stamp> {
    (
        "[A-Z0-9]{1,8}",
        proptest::option::of("[a-zA-Z %_']{0,12}"),
        proptest::option::of(-5000i32..5000),
        prop_oneof![
            Just(Condition::Mint),
            Just(Condition::Used),
            Just(Condition::Unknown)
        ],
        (money(), money()),
        (any::<u32>(), any::<u32>()),
        any::<bool>(),
    )
        .prop_map(
            |(number, country, year, condition, (mint, used), (qm, qu), favorite)| Stamp {
                country,
                year,
                condition,
                catalog_value_mint: mint,
                catalog_value_used: used,
                quantity_mint: qm,
                quantity_used: qu,
                is_favorite: favorite,
                ..Stamp::new(number, "generated")
            },
        )
}

proptest! {
    #[test]
    fn codec_roundtrip(stamp in valid_stamp()) {
        let row = stamp.to_row().unwrap();
        prop_assert_eq!(Stamp::from_row(&row).unwrap(), stamp);
    }

    #[test]
    fn store_roundtrip(stamp in valid_stamp()) {
        let store = StampStore::open_in_memory().unwrap();
        let id = store.create(&stamp).unwrap();
        prop_assert_eq!(store.read(id).unwrap(), stamp);
    }
}
