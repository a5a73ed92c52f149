//! Text and JSON rendering.

use clap::ValueEnum;
use serde::Serialize;
use stampdb_core::{CollectionStats, Metrics, Stamp, StampId, StoredStamp};
use std::fmt;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One stamp, one field per line.
pub fn stamp_details(id: StampId, stamp: &Stamp) -> Details<'_> {
    Details { id, stamp }
}

/// One row per stamp, with a header and a count.
pub fn stamp_table(stamps: &[StoredStamp]) -> Table<'_> {
    Table { stamps }
}

/// Totals and breakdown.
pub fn stats_report(stats: &CollectionStats) -> Report<'_> {
    Report { stats }
}

/// Rendering of [`stamp_details`].
pub struct Details<'a> {
    id: StampId,
    stamp: &'a Stamp,
}

impl fmt::Display for Details<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stamp = self.stamp;
        writeln!(f, "Stamp #{}", self.id)?;
        let mut line = |label: &str, value: String| writeln!(f, "  {label:<16} {value}");

        line("Catalog number", stamp.catalog_number.clone())?;
        line("Description", stamp.description.clone())?;
        line("Country", opt(&stamp.country))?;
        line("Year", stamp.year.map_or_else(dash, |y| y.to_string()))?;
        line("Denomination", opt(&stamp.denomination))?;
        line("Color", opt(&stamp.color))?;
        line("Condition", stamp.condition.to_string())?;
        line("Grade", opt(&stamp.grade))?;
        line("Gum", opt(&stamp.gum_condition))?;
        line("Perforation", opt(&stamp.perforation))?;
        line(
            "Mint",
            format!("{} x {}", stamp.quantity_mint, stamp.catalog_value_mint),
        )?;
        line(
            "Used",
            format!("{} x {}", stamp.quantity_used, stamp.catalog_value_used),
        )?;
        line("Total value", stamp.total_value().to_string())?;
        line("Purchase price", stamp.purchase_price.to_string())?;
        line("Market value", stamp.current_market_value.to_string())?;
        line("Location", opt(&stamp.location))?;
        line("Source", opt(&stamp.source))?;
        line(
            "Acquired",
            stamp.date_acquired.map_or_else(dash, |d| d.to_string()),
        )?;
        line("Image", opt(&stamp.image_path))?;
        line("Flags", flags(stamp))?;
        line("Notes", opt(&stamp.notes))
    }
}

/// Rendering of [`stamp_table`].
pub struct Table<'a> {
    stamps: &'a [StoredStamp],
}

impl fmt::Display for Table<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>6}  {:<10}  {:<16}  {:>5}  {:<7}  {:>6}  {:>12}",
            "ID", "CATALOG", "COUNTRY", "YEAR", "COND", "QTY", "VALUE"
        )?;
        for StoredStamp { id, stamp } in self.stamps {
            writeln!(
                f,
                "{:>6}  {:<10}  {:<16}  {:>5}  {:<7}  {:>6}  {:>12}",
                id.to_string(),
                truncate(&stamp.catalog_number, 10),
                truncate(stamp.country.as_deref().unwrap_or("-"), 16),
                stamp.year.map_or_else(dash, |y| y.to_string()),
                stamp.condition.as_str(),
                stamp.total_quantity(),
                stamp.total_value().to_string(),
            )?;
        }
        write!(f, "{} stamp(s)", self.stamps.len())
    }
}

/// Rendering of [`stats_report`].
pub struct Report<'a> {
    stats: &'a CollectionStats,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats;
        let t = &stats.totals;
        writeln!(f, "Stamps:             {}", t.record_count)?;
        writeln!(f, "Countries:          {}", stats.distinct_countries)?;
        writeln!(
            f,
            "Copies:             {} ({} mint, {} used)",
            t.quantity_total, t.quantity_mint, t.quantity_used
        )?;
        writeln!(
            f,
            "Catalog value:      {} ({} mint, {} used)",
            t.total_value, t.total_value_mint, t.total_value_used
        )?;
        writeln!(f, "Average per stamp:  {}", t.average_value().round_dp(2))?;
        writeln!(f, "Purchase cost:      {}", t.purchase_cost)?;
        writeln!(f, "Market value:       {}", t.market_value)?;
        write!(
            f,
            "Favorites: {}  Want list: {}  For sale: {}",
            t.favorites, t.want_list, t.for_sale
        )?;

        if let Some(field) = stats.group_by {
            write!(
                f,
                "\n\n{:<20}  {:>6}  {:>8}  {:>12}",
                field.as_str().to_uppercase(),
                "STAMPS",
                "COPIES",
                "VALUE"
            )?;
            for bucket in &stats.breakdown {
                write!(f, "\n{}", bucket_line(&bucket.key.to_string(), &bucket.metrics))?;
            }
        }
        Ok(())
    }
}

fn bucket_line(key: &str, m: &Metrics) -> String {
    format!(
        "{:<20}  {:>6}  {:>8}  {:>12}",
        truncate(key, 20),
        m.record_count,
        m.quantity_total,
        m.total_value.to_string()
    )
}

fn dash() -> String {
    "-".to_string()
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(dash)
}

fn flags(stamp: &Stamp) -> String {
    let set: Vec<&str> = [
        (stamp.is_favorite, "favorite"),
        (stamp.plate_block, "plate block"),
        (stamp.first_day_cover, "first day cover"),
        (stamp.want_list, "want list"),
        (stamp.for_sale, "for sale"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();
    if set.is_empty() {
        dash()
    } else {
        set.join(", ")
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(width.saturating_sub(1)).collect();
        t.push('~');
        t
    }
}
