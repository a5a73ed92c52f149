//! # StampDB Testkit
//!
//! Test utilities for StampDB.
//!
//! This crate provides:
//! - Store fixtures with automatic cleanup
//! - Property-based generators for stamps and search criteria
//! - A harness that checks the store against an in-memory model
//!
//! ## Usage
//!
//! ```
//! use stampdb_testkit::prelude::*;
//!
//! with_temp_store(|store| {
//!     let id = store.create(&scenarios::sample_stamps()[0]).unwrap();
//!     assert!(store.exists(id).unwrap());
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
