//! CLI command implementations.

pub mod add;
pub mod delete;
pub mod init;
pub mod list;
pub mod search;
pub mod show;
pub mod stats;
pub mod update;

use stampdb_core::{CoreResult, StampStore, StoreConfig};
use std::path::Path;

/// Opens an existing database. Only `init` and `add` create one.
fn open_existing(db_path: &Path) -> CoreResult<StampStore> {
    StampStore::open_with_config(db_path, StoreConfig::new().create_if_missing(false))
}
