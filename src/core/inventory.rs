//! Immutable inventory table shared by every engine call.
//!
//! The table is built once by the caller and passed in explicitly; clones
//! share the same backing slice and nothing ever mutates it. A reload builds
//! a fresh `Inventory` and replaces the old one whole.

use std::sync::Arc;

use itertools::Itertools;
use serde::Serialize;

use crate::core::brand::{Brand, classify_brand};
use crate::core::pricing::ArbitrageEstimate;

/// Largest accepted price in whole units; keeps margins representable as `i64`
pub const MAX_PRICE: u64 = i64::MAX as u64;

/// One auction listing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InventoryRecord
{
    /// Trimmed, upper-cased model name (not unique across the table)
    pub model_name: String,

    /// Whole-unit wholesale price
    pub wholesale_price: u64,

    /// Canonical brand derived from `model_name`
    pub brand: Brand,
}

impl InventoryRecord
{
    /// Normalize and classify a raw listing.
    ///
    /// Returns `None` when the brand is unclassifiable or the price is zero
    /// or above [`MAX_PRICE`]; these are inventory-hygiene drops, not errors.
    pub fn new(
        model_name: &str,
        wholesale_price: u64,
    ) -> Option<Self>
    {
        if wholesale_price == 0 || wholesale_price > MAX_PRICE
        {
            return None;
        }

        let model_name = normalize_model_name(model_name);
        let brand = classify_brand(&model_name)?;

        Some(Self { model_name, wholesale_price, brand })
    }

    pub fn estimate(&self) -> ArbitrageEstimate
    {
        ArbitrageEstimate::from_wholesale(self.wholesale_price)
    }
}

/// Trim and upper-case a model name the way every table column is stored
pub fn normalize_model_name(raw: &str) -> String
{
    raw.trim()
        .to_uppercase()
}

#[derive(Debug, Clone, Default)]
pub struct Inventory
{
    records: Arc<[InventoryRecord]>,
}

impl Inventory
{
    pub fn from_records(records: Vec<InventoryRecord>) -> Self
    {
        Self { records: records.into() }
    }

    /// Build from raw `(name, price)` rows, dropping unclassifiable ones
    pub fn from_raw<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let records: Vec<InventoryRecord> = rows
            .into_iter()
            .filter_map(|(name, price)| InventoryRecord::new(name.as_ref(), price))
            .collect();
        Self::from_records(records)
    }

    pub fn records(&self) -> &[InventoryRecord]
    {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InventoryRecord>
    {
        self.records
            .iter()
    }

    pub fn len(&self) -> usize
    {
        self.records
            .len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.records
            .is_empty()
    }

    /// Distinct brands, in first-seen table order
    pub fn brands(&self) -> Vec<Brand>
    {
        self.iter()
            .map(|r| r.brand)
            .unique()
            .collect()
    }
}

impl<'a> IntoIterator for &'a Inventory
{
    type Item = &'a InventoryRecord;
    type IntoIter = std::slice::Iter<'a, InventoryRecord>;

    fn into_iter(self) -> Self::IntoIter
    {
        self.iter()
    }
}
