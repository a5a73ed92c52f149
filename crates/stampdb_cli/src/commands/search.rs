//! Search command implementation.

use super::open_existing;
use crate::args::CriteriaArgs;
use crate::output::{print_json, stamp_table, Format};
use std::path::Path;
use tracing::debug;

/// Prints the stamps matching every predicate.
pub fn run(
    db_path: &Path,
    criteria: &CriteriaArgs,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let criteria = criteria.to_criteria()?;
    debug!(?criteria, "parsed search criteria");

    let store = open_existing(db_path)?;
    let hits = store.search(&criteria)?;

    match format {
        Format::Json => print_json(&hits)?,
        Format::Text => println!("{}", stamp_table(&hits)),
    }
    Ok(())
}
