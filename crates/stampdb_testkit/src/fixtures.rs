//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up test stores
//! and common test scenarios.

use stampdb_core::{StampStore, StoreConfig};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FILE_NAME: &str = "stamps.db";

/// A test store with automatic cleanup.
pub struct TestStore {
    /// The store instance.
    pub store: StampStore,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: Option<TempDir>,
}

impl TestStore {
    /// Creates a new in-memory test store.
    pub fn memory() -> Self {
        Self {
            store: StampStore::open_in_memory().expect("Failed to open in-memory store"),
            temp_dir: None,
        }
    }

    /// Creates a new file-based test store in a fresh temporary directory.
    pub fn file() -> Self {
        Self::file_with_config(StoreConfig::default())
    }

    /// Creates a new file-based test store with a custom configuration.
    pub fn file_with_config(config: StoreConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = StampStore::open_with_config(temp_dir.path().join(FILE_NAME), config)
            .expect("Failed to open file store");
        Self {
            store,
            temp_dir: Some(temp_dir),
        }
    }

    /// Returns the database path if file-based, None if in-memory.
    pub fn path(&self) -> Option<PathBuf> {
        self.temp_dir.as_ref().map(|d| d.path().join(FILE_NAME))
    }

    /// Closes the store and opens the same file again.
    ///
    /// # Panics
    ///
    /// Panics for in-memory stores, which do not survive closing.
    pub fn reopen(self) -> Self {
        self.reopen_with_config(StoreConfig::default())
    }

    /// Closes the store and opens the same file with `config`.
    pub fn reopen_with_config(self, config: StoreConfig) -> Self {
        let path = self.path().expect("Only file stores can be reopened");
        self.store.close().expect("Failed to close store");
        let store = StampStore::open_with_config(&path, config).expect("Failed to reopen store");
        Self {
            store,
            temp_dir: self.temp_dir,
        }
    }
}

impl std::ops::Deref for TestStore {
    type Target = StampStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Runs a test with a temporary in-memory store.
///
/// # Example
///
/// ```
/// use stampdb_testkit::with_temp_store;
///
/// with_temp_store(|store| {
///     assert_eq!(store.count().unwrap(), 0);
/// });
/// ```
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&StampStore) -> R,
{
    let test_store = TestStore::memory();
    f(&test_store.store)
}

/// Runs a test with a temporary file-based store.
pub fn with_file_store<F, R>(f: F) -> R
where
    F: FnOnce(&StampStore, &Path) -> R,
{
    let test_store = TestStore::file();
    let path = test_store.path().expect("File store should have a path");
    f(&test_store.store, &path)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use stampdb_core::{Condition, Stamp, StampId};

    /// A handful of stamps covering every condition, missing countries and
    /// years, and each boolean flag.
    pub fn sample_stamps() -> Vec<Stamp> {
        vec![
            Stamp {
                country: Some("USA".into()),
                year: Some(1992),
                denomination: Some("29c".into()),
                condition: Condition::Mint,
                catalog_value_mint: Decimal::new(2900, 4),
                quantity_mint: 4,
                is_favorite: true,
                ..Stamp::new("2616", "World Columbian Stamp Expo")
            },
            Stamp {
                country: Some("USA".into()),
                year: Some(1869),
                condition: Condition::Used,
                catalog_value_used: Decimal::new(3_250_000, 4),
                quantity_used: 1,
                purchase_price: Decimal::new(2_000_000, 4),
                date_acquired: NaiveDate::from_ymd_opt(2019, 5, 4),
                ..Stamp::new("119", "Pictorial issue")
            },
            Stamp {
                country: Some("Canada".into()),
                year: Some(1851),
                condition: Condition::Used,
                catalog_value_used: Decimal::new(9_000_000, 4),
                quantity_used: 1,
                want_list: true,
                ..Stamp::new("1", "Three Pence Beaver")
            },
            Stamp {
                country: Some("Russia (USSR)".into()),
                year: Some(1961),
                catalog_value_mint: Decimal::new(15_000, 4),
                catalog_value_used: Decimal::new(5_000, 4),
                quantity_mint: 1,
                quantity_used: 2,
                for_sale: true,
                plate_block: true,
                ..Stamp::new("2463", "Gagarin")
            },
            Stamp {
                first_day_cover: true,
                notes: Some("no markings".into()),
                ..Stamp::new("UNK-1", "Unidentified label")
            },
        ]
    }

    /// An in-memory store holding [`sample_stamps`], with their ids in
    /// insertion order.
    pub fn populated_store() -> (TestStore, Vec<StampId>) {
        let test_store = TestStore::memory();
        let ids = test_store
            .store
            .create_many(&sample_stamps())
            .expect("Failed to populate store");
        (test_store, ids)
    }

    /// An in-memory store with `count` generated stamps spread over a few
    /// countries and years.
    pub fn bulk_store(count: usize) -> TestStore {
        let countries = ["USA", "Canada", "France", "Japan"];
        let stamps: Vec<Stamp> = (0..count)
            .map(|i| Stamp {
                country: Some(countries[i % countries.len()].to_string()),
                year: Some(1900 + (i % 120) as i32),
                condition: Condition::ALL[i % Condition::ALL.len()],
                catalog_value_mint: Decimal::new((i as i64 % 500) * 25, 2),
                quantity_mint: (i % 3) as u32,
                ..Stamp::new(format!("B{i}"), "bulk")
            })
            .collect();
        let test_store = TestStore::memory();
        test_store
            .store
            .create_many(&stamps)
            .expect("Failed to populate store");
        test_store
    }
}
