//! List command implementation.

use super::open_existing;
use crate::output::{print_json, stamp_table, Format};
use std::path::Path;

/// Prints every stamp in identifier order.
pub fn run(db_path: &Path, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_existing(db_path)?;
    let stamps = store.list_all()?;

    match format {
        Format::Json => print_json(&stamps)?,
        Format::Text => println!("{}", stamp_table(&stamps)),
    }
    Ok(())
}
