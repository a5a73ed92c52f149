//! Stats command implementation.

use super::open_existing;
use crate::args::CriteriaArgs;
use crate::output::{print_json, stats_report, Format};
use stampdb_core::GroupBy;
use std::path::Path;

/// Prints totals, optionally broken down, over the matching stamps.
pub fn run(
    db_path: &Path,
    group_by: Option<GroupBy>,
    criteria: &CriteriaArgs,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let criteria = criteria.to_criteria()?;
    let store = open_existing(db_path)?;
    let stats = store.statistics(&criteria, group_by)?;

    match format {
        Format::Json => print_json(&stats)?,
        Format::Text => println!("{}", stats_report(&stats)),
    }
    Ok(())
}
