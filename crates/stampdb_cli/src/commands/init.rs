//! Init command implementation.

use crate::output::{print_json, Format};
use serde::Serialize;
use stampdb_core::StampStore;
use std::path::Path;
use tracing::info;

#[derive(Debug, Serialize)]
struct InitResult {
    path: String,
    stamps: u64,
}

/// Creates the database and its table, or completes an older table.
pub fn run(db_path: &Path, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    info!("Initializing {:?}", db_path);
    let store = StampStore::open(db_path)?;
    let result = InitResult {
        path: db_path.display().to_string(),
        stamps: store.count()?,
    };
    store.close()?;

    match format {
        Format::Json => print_json(&result)?,
        Format::Text => {
            println!("✓ Database ready");
            println!("  Path: {}", result.path);
            println!("  Stamps: {}", result.stamps);
        }
    }
    Ok(())
}
