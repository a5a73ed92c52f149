//! StampDB CLI
//!
//! Command-line front end for a stamp collection database.
//!
//! # Commands
//!
//! - `init` - Create the database or bring an older table up to date
//! - `add` / `update` / `delete` / `show` - Manage single stamps
//! - `list` - List every stamp
//! - `search` - Filter by field predicates
//! - `stats` - Totals and breakdowns

mod args;
mod commands;
mod output;

use args::{CriteriaArgs, StampArgs};
use clap::{Parser, Subcommand};
use output::Format;
use stampdb_core::{GroupBy, StampId};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Stamp collection database tools.
#[derive(Parser)]
#[command(name = "stampdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database file
    #[arg(global = true, long, env = "STAMPDB_PATH", default_value = "stamps.db")]
    db: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Output format
    #[arg(global = true, short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database, or add columns missing from an older one
    Init,

    /// Add a stamp
    Add(StampArgs),

    /// Show one stamp
    Show {
        /// Stamp identifier
        id: StampId,
    },

    /// Replace every field of a stamp
    Update {
        /// Stamp identifier
        id: StampId,

        #[command(flatten)]
        stamp: StampArgs,
    },

    /// Delete a stamp
    Delete {
        /// Stamp identifier
        id: StampId,
    },

    /// List every stamp
    List,

    /// Find stamps matching all given predicates
    Search(CriteriaArgs),

    /// Show collection totals
    Stats {
        /// Break totals down by field
        #[arg(short, long)]
        group_by: Option<GroupBy>,

        #[command(flatten)]
        criteria: CriteriaArgs,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let db = cli.db.as_path();
    let format = cli.format;
    match cli.command {
        Commands::Init => commands::init::run(db, format)?,
        Commands::Add(stamp) => commands::add::run(db, stamp, format)?,
        Commands::Show { id } => commands::show::run(db, id, format)?,
        Commands::Update { id, stamp } => commands::update::run(db, id, stamp, format)?,
        Commands::Delete { id } => commands::delete::run(db, id, format)?,
        Commands::List => commands::list::run(db, format)?,
        Commands::Search(criteria) => commands::search::run(db, &criteria, format)?,
        Commands::Stats { group_by, criteria } => {
            commands::stats::run(db, group_by, &criteria, format)?
        }
        Commands::Version => {
            println!("StampDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("StampDB Core v{}", stampdb_core::VERSION);
        }
    }

    Ok(())
}
