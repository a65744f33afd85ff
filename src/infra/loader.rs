//! CSV inventory ingestion.
//!
//! Reads an auction export once, normalizes every row and builds the
//! immutable [`Inventory`]. Bad rows are inventory hygiene, not failures:
//! malformed lines, non-numeric or non-positive prices and unclassifiable
//! brands are counted in [`LoadStats`] and dropped.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::core::inventory::{Inventory, InventoryRecord, MAX_PRICE};

/// Accepted header names for the model column (matched case-insensitively)
const MODEL_HEADERS: &[&str] = &["車款名稱", "model_name", "model", "name"];

/// Accepted header names for the wholesale price column
const PRICE_HEADERS: &[&str] = &["成本底價", "wholesale_price", "price", "cost"];

#[derive(Debug, thiserror::Error)]
pub enum LoadError
{
    #[error("inventory file not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("inventory {source_name} has no usable rows ({rows_read} read)")]
    Empty
    {
        source_name: String,
        rows_read: usize,
    },

    #[error("inventory {source_name} has no {column} column (headers: {found})")]
    MissingColumn
    {
        source_name: String,
        column: &'static str,
        found: String,
    },

    #[error("failed to open inventory {}: {source}", path.display())]
    Io
    {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read inventory {source_name}: {source}")]
    Csv
    {
        source_name: String,
        #[source]
        source: csv::Error,
    },
}

/// Row accounting for one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats
{
    pub rows_read: usize,
    pub kept: usize,
    pub dropped_unclassified: usize,
    pub dropped_bad_price: usize,
    pub skipped_malformed: usize,
}

/// Load and normalize an inventory CSV from disk
#[instrument(level = "debug")]
pub fn load_inventory(path: &Path) -> Result<(Inventory, LoadStats), LoadError>
{
    if !path.exists()
    {
        return Err(LoadError::Missing(path.to_path_buf()));
    }

    let source_name = path
        .display()
        .to_string();
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;

    let (inventory, stats) = read_inventory(file, &source_name)?;
    info!(
        path = %source_name,
        kept = stats.kept,
        dropped = stats.rows_read - stats.kept,
        "inventory loaded"
    );
    Ok((inventory, stats))
}

/// Read an inventory from any CSV source; `source_name` labels errors
pub fn read_inventory<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<(Inventory, LoadStats), LoadError>
{
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|source| LoadError::Csv { source_name: source_name.to_string(), source })?
        .clone();

    let model_idx = find_column(&headers, MODEL_HEADERS).ok_or_else(|| LoadError::MissingColumn {
        source_name: source_name.to_string(),
        column: "model name",
        found: describe_headers(&headers),
    })?;
    let price_idx = find_column(&headers, PRICE_HEADERS).ok_or_else(|| LoadError::MissingColumn {
        source_name: source_name.to_string(),
        column: "wholesale price",
        found: describe_headers(&headers),
    })?;

    let mut stats = LoadStats::default();
    let mut records = Vec::new();

    for (line, row) in rdr
        .records()
        .enumerate()
    {
        stats.rows_read += 1;

        let row = match row
        {
            Ok(r) => r,
            Err(err) =>
            {
                warn!(source = source_name, line = line + 2, %err, "skipping malformed row");
                stats.skipped_malformed += 1;
                continue;
            }
        };

        let (Some(name), Some(raw_price)) = (row.get(model_idx), row.get(price_idx))
        else
        {
            warn!(source = source_name, line = line + 2, "skipping short row");
            stats.skipped_malformed += 1;
            continue;
        };

        let Some(price) = parse_price(raw_price)
        else
        {
            debug!(line = line + 2, raw_price, "dropping row with unusable price");
            stats.dropped_bad_price += 1;
            continue;
        };

        match InventoryRecord::new(name, price)
        {
            Some(record) => records.push(record),
            None =>
            {
                debug!(line = line + 2, name, "dropping unclassified model");
                stats.dropped_unclassified += 1;
            }
        }
    }

    stats.kept = records.len();
    if records.is_empty()
    {
        return Err(LoadError::Empty { source_name: source_name.to_string(), rows_read: stats.rows_read });
    }

    Ok((Inventory::from_records(records), stats))
}

fn find_column(
    headers: &csv::StringRecord,
    candidates: &[&str],
) -> Option<usize>
{
    headers
        .iter()
        .position(|h| {
            let h = h
                .trim_start_matches('\u{feff}')
                .trim();
            candidates
                .iter()
                .any(|c| h.eq_ignore_ascii_case(c))
        })
}

fn describe_headers(headers: &csv::StringRecord) -> String
{
    headers
        .iter()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a price cell such as `1,234,000`, `$500000`, `NT$ 480000` or
/// `500000.0`. Non-numeric, non-positive and out-of-range values yield `None`.
pub fn parse_price(raw: &str) -> Option<u64>
{
    let cleaned: String = raw
        .trim()
        .trim_start_matches("NT$")
        .trim_end_matches('元')
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | ' ' | '_'))
        .collect();

    let value: f64 = cleaned
        .parse()
        .ok()?;
    if !value.is_finite() || value <= 0.0
    {
        return None;
    }

    let rounded = value.round();
    if rounded < 1.0 || rounded >= MAX_PRICE as f64
    {
        return None;
    }
    Some(rounded as u64)
}
