//! Delete command implementation.

use super::open_existing;
use crate::output::{print_json, Format};
use serde_json::json;
use stampdb_core::StampId;
use std::path::Path;

/// Deletes a stamp.
pub fn run(db_path: &Path, id: StampId, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_existing(db_path)?;
    store.delete(id)?;

    match format {
        Format::Json => print_json(&json!({ "id": id, "deleted": true }))?,
        Format::Text => println!("✓ Deleted stamp #{id}"),
    }
    Ok(())
}
