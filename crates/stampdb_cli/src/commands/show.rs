//! Show command implementation.

use super::open_existing;
use crate::output::{print_json, stamp_details, Format};
use stampdb_core::{StampId, StoredStamp};
use std::path::Path;

/// Prints one stamp.
pub fn run(db_path: &Path, id: StampId, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_existing(db_path)?;
    let stamp = store.read(id)?;

    match format {
        Format::Json => print_json(&StoredStamp { id, stamp })?,
        Format::Text => print!("{}", stamp_details(id, &stamp)),
    }
    Ok(())
}
