//! Update command implementation.

use super::open_existing;
use crate::args::StampArgs;
use crate::output::{print_json, Format};
use serde_json::json;
use stampdb_core::StampId;
use std::path::Path;

/// Replaces every field of a stamp. Flags not given are reset to defaults.
pub fn run(
    db_path: &Path,
    id: StampId,
    args: StampArgs,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_existing(db_path)?;
    store.update(id, &args.into_stamp())?;

    match format {
        Format::Json => print_json(&json!({ "id": id, "updated": true }))?,
        Format::Text => println!("✓ Updated stamp #{id}"),
    }
    Ok(())
}
