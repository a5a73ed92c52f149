//! Property tests checking the store against an in-memory model.

use proptest::prelude::*;
use rust_decimal::Decimal;
use stampdb_core::{aggregate, GroupBy, StampStore};
use stampdb_testkit::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Create(stampdb_core::Stamp),
    Update(usize, stampdb_core::Stamp),
    Delete(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => stamp_strategy().prop_map(Op::Create),
        1 => (any::<usize>(), stamp_strategy()).prop_map(|(i, s)| Op::Update(i, s)),
        1 => any::<usize>().prop_map(Op::Delete),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn operations_agree_with_model(ops in prop::collection::vec(op_strategy(), 1..30)) {
        let mut harness = StoreHarness::new();
        for op in ops {
            let ids = harness.ids();
            match op {
                Op::Create(stamp) => {
                    harness.create(stamp);
                }
                Op::Update(i, stamp) if !ids.is_empty() => harness.update(ids[i % ids.len()], stamp),
                Op::Delete(i) if !ids.is_empty() => harness.delete(ids[i % ids.len()]),
                _ => {}
            }
        }
        harness.verify_all();
    }

    #[test]
    fn search_agrees_with_oracle(
        stamps in stamps_strategy(25),
        cases in prop::collection::vec(search_case_strategy(), 1..8),
    ) {
        let mut harness = StoreHarness::new();
        for stamp in stamps {
            harness.create(stamp);
        }
        for case in &cases {
            harness.verify_search(case);
        }
    }

    #[test]
    fn breakdown_partitions_totals(stamps in stamps_strategy(30), field in prop::sample::select(GroupBy::ALL.to_vec())) {
        let stats = aggregate(&stamps, Some(field)).unwrap();
        let value: Decimal = stats.breakdown.iter().map(|b| b.metrics.total_value).sum();
        let records: u64 = stats.breakdown.iter().map(|b| b.metrics.record_count).sum();
        let copies: u64 = stats.breakdown.iter().map(|b| b.metrics.quantity_total).sum();
        prop_assert_eq!(value, stats.totals.total_value);
        prop_assert_eq!(records, stamps.len() as u64);
        prop_assert_eq!(copies, stats.totals.quantity_total);
    }

    #[test]
    fn batch_create_matches_single_creates(stamps in stamps_strategy(15)) {
        let batch = StampStore::open_in_memory().unwrap();
        let single = StampStore::open_in_memory().unwrap();
        batch.create_many(&stamps).unwrap();
        for stamp in &stamps {
            single.create(stamp).unwrap();
        }
        prop_assert_eq!(batch.list_all().unwrap(), single.list_all().unwrap());
    }
}

#[test]
fn file_store_survives_reopen() {
    let mut harness = StoreHarness::file();
    for stamp in scenarios::sample_stamps() {
        harness.create(stamp);
    }
    let first = harness.ids()[0];
    harness.delete(first);

    let mut harness = harness.reopen();
    harness.verify_all();
    let id = harness.create(stampdb_core::Stamp::new("AFTER", "reopened"));
    assert!(id > first);
    harness.verify_statistics(Some(GroupBy::Condition));
}
