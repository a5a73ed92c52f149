//! # StampDB Core
//!
//! Persistence, search and statistics for a personal stamp collection.
//!
//! This crate provides:
//! - [`Stamp`], the record model, and [`StampCollection`] for in-memory batches
//! - [`RowCodec`], the translation boundary between records and flat rows
//! - [`StampStore`], CRUD and schema lifecycle over SQLite
//! - [`Criteria`], parameterized multi-predicate search
//! - [`aggregate`], exact count and value statistics with breakdowns
//!
//! ## Example
//!
//! ```
//! use stampdb_core::{aggregate, Criteria, GroupBy, Stamp, StampStore};
//!
//! let store = StampStore::open_in_memory()?;
//! store.create(&Stamp {
//!     country: Some("USA".into()),
//!     year: Some(1992),
//!     ..Stamp::new("2616", "World Columbian Stamp Expo")
//! })?;
//!
//! let hits = store.search(&Criteria::new().contains("country", "us").between("year", 1980, 2000))?;
//! let stats = aggregate(&hits, Some(GroupBy::Country))?;
//! assert_eq!(stats.totals.record_count, 1);
//! # Ok::<(), stampdb_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod aggregate;
mod codec;
mod collection;
mod config;
mod error;
mod query;
pub mod schema;
mod stamp;
mod store;

pub use aggregate::{aggregate, Bucket, CollectionStats, GroupBy, GroupKey, Metrics};
pub use codec::RowCodec;
pub use collection::StampCollection;
pub use config::{JournalMode, StoreConfig};
pub use error::{CoreError, CoreResult};
pub use query::{Criteria, Filter, Predicate, Scalar};
pub use stamp::{Condition, Stamp, StampBuilder, StampId, StoredStamp, UnknownCondition};
pub use store::{StampStore, StoreStats, StoreStatsSnapshot};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
