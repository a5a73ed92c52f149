//! Add command implementation.

use crate::args::StampArgs;
use crate::output::{print_json, Format};
use serde_json::json;
use stampdb_core::StampStore;
use std::path::Path;

/// Stores a new stamp and prints its identifier.
pub fn run(db_path: &Path, args: StampArgs, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let store = StampStore::open(db_path)?;
    let stamp = args.into_stamp();
    let id = store.create(&stamp)?;

    match format {
        Format::Json => print_json(&json!({ "id": id }))?,
        Format::Text => println!("✓ Added stamp #{id} ({})", stamp.catalog_number),
    }
    Ok(())
}
