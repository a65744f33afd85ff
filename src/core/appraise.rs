//! Seller asking price vs. inventory cost floor.

use serde::Serialize;

use crate::core::brand::Brand;
use crate::core::engine::BUDGET_BLOCK;
use crate::core::error::QueryError;
use crate::core::inventory::{InventoryRecord, MAX_PRICE};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Appraisal {
    pub model_name: String,
    pub brand: Brand,
    pub wholesale_price: u64,
    /// Asking price in whole units
    pub asking_price: u64,
    /// `asking_price - wholesale_price`; negative when the seller asks below cost
    pub margin: i64,
    /// `margin / wholesale_price`
    pub margin_ratio: f64,
    pub estimated_market_price: f64,
    /// The seller asks more than the estimated retail price
    pub above_market: bool,
}

/// Asking price in 萬 converted to whole units; must be finite, positive and
/// at most [`MAX_PRICE`].
pub fn asking_price_units(asking_price_wan: f64) -> Result<u64, QueryError> {
    let units = (asking_price_wan * BUDGET_BLOCK).round();
    // MAX_PRICE as f64 rounds up to 2^63, which is itself out of range
    let in_range = units >= 1.0 && units < MAX_PRICE as f64;
    if !asking_price_wan.is_finite() || asking_price_wan <= 0.0 || !in_range {
        return Err(QueryError::InvalidAskingPrice(asking_price_wan));
    }
    Ok(units as u64)
}

/// Compare a seller's asking price (in 萬) against the matched record.
pub fn appraise(record: &InventoryRecord, asking_price_wan: f64) -> Result<Appraisal, QueryError> {
    let asking_price = asking_price_units(asking_price_wan)?;
    // both sides are within 1..=MAX_PRICE, so neither cast nor difference overflows
    let margin = asking_price as i64 - record.wholesale_price as i64;
    let estimate = record.estimate();

    Ok(Appraisal {
        model_name: record.model_name.clone(),
        brand: record.brand,
        wholesale_price: record.wholesale_price,
        asking_price,
        margin,
        margin_ratio: margin as f64 / record.wholesale_price as f64,
        estimated_market_price: estimate.estimated_market_price,
        above_market: asking_price as f64 > estimate.estimated_market_price,
    })
}
