//! Inventory loading and formatting shared by the command runners.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use tracing::info;

use crate::cli::{AppContext, InventoryArgs, OutputFormat};
use crate::core::inventory::Inventory;
use crate::infra::config::Config;
use crate::infra::loader::{LoadStats, load_inventory};

/// CSV path from `--inventory`, else `inventory.path` from config
pub fn inventory_path(
    args: &InventoryArgs,
    config: &Config,
) -> PathBuf
{
    args.inventory
        .clone()
        .unwrap_or_else(|| {
            config
                .inventory
                .path
                .clone()
        })
}

/// Load the inventory and announce its size in text mode
pub fn open_inventory(
    path: &Path,
    format: OutputFormat,
    ctx: &AppContext,
) -> Result<(Inventory, LoadStats)>
{
    let (inventory, stats) =
        load_inventory(path).with_context(|| format!("Failed to load inventory from {}", path.display()))?;

    info!(
        kept = stats.kept,
        unclassified = stats.dropped_unclassified,
        bad_price = stats.dropped_bad_price,
        malformed = stats.skipped_malformed,
        "inventory ready"
    );

    if format == OutputFormat::Text && !ctx.quiet
    {
        println!(
            "{} {} listings from {} ({} brands)",
            "Monitoring"
                .if_supports_color(Stream::Stdout, |t| t.dimmed()),
            inventory.len(),
            path.display(),
            inventory
                .brands()
                .len()
        );
    }

    Ok((inventory, stats))
}

/// Whole currency units with thousands separators: `1234567.8` -> `1,234,568`
pub fn format_amount(value: f64) -> String
{
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits
        .chars()
        .enumerate()
    {
        if i > 0 && (digits.len() - i) % 3 == 0
        {
            out.push(',');
        }
        out.push(ch);
    }

    if rounded < 0.0 { format!("-{out}") } else { out }
}

pub fn print_json(value: &serde_json::Value) -> Result<()>
{
    println!("{}", serde_json::to_string_pretty(value).context("Failed to serialize JSON output")?);
    Ok(())
}
