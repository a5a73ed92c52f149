//! Benchmark utilities.

use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;
use stampdb_core::{Condition, Stamp, StampStore};

const COUNTRIES: [&str; 6] = ["USA", "Canada", "France", "Germany", "Japan", "Brazil"];

/// Generate a random valid stamp.
pub fn random_stamp<R: Rng + ?Sized>(rng: &mut R, index: usize) -> Stamp {
    Stamp {
        country: COUNTRIES.choose(rng).map(|c| c.to_string()),
        year: Some(rng.gen_range(1840..2025)),
        condition: Condition::ALL[rng.gen_range(0..Condition::ALL.len())],
        catalog_value_mint: Decimal::new(rng.gen_range(0..1_000_000), 4),
        catalog_value_used: Decimal::new(rng.gen_range(0..1_000_000), 4),
        quantity_mint: rng.gen_range(0..5),
        quantity_used: rng.gen_range(0..5),
        for_sale: rng.gen_bool(0.1),
        want_list: rng.gen_bool(0.05),
        notes: rng.gen_bool(0.3).then(|| "hinged".to_string()),
        ..Stamp::new(format!("B{index}"), "benchmark stamp")
    }
}

/// Generate `count` random stamps.
pub fn generate_stamps(count: usize) -> Vec<Stamp> {
    let mut rng = rand::thread_rng();
    (0..count).map(|i| random_stamp(&mut rng, i)).collect()
}

/// An in-memory store holding `count` random stamps.
pub fn populated_store(count: usize) -> StampStore {
    let store = StampStore::open_in_memory().expect("open in-memory store");
    store
        .create_many(&generate_stamps(count))
        .expect("populate store");
    store
}
