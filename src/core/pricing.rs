//! Arbitrage estimate derived from a wholesale price.
//!
//! Both multipliers are fixed: the retail markup approximates a dealer's
//! margin and the acquisition fee approximates the broker/service charge.
//! The spread is therefore always `wholesale * 0.13`.

use serde::Serialize;

/// Retail price approximation over wholesale
pub const MARKET_MARKUP: f64 = 1.18;

/// Acquisition cost including brokerage over wholesale
pub const ACQUISITION_FEE: f64 = 1.05;

/// Spread as a fraction of wholesale (`MARKET_MARKUP - ACQUISITION_FEE`)
pub const SPREAD_RATIO: f64 = MARKET_MARKUP - ACQUISITION_FEE;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArbitrageEstimate {
    pub estimated_market_price: f64,
    pub acquisition_cost: f64,
    pub potential_spread: f64,
}

impl ArbitrageEstimate {
    /// Zero and negative prices are filtered out by the inventory loader;
    /// for zero this still yields an all-zero estimate.
    pub fn from_wholesale(wholesale_price: u64) -> Self {
        let p = wholesale_price as f64;
        let estimated_market_price = p * MARKET_MARKUP;
        let acquisition_cost = p * ACQUISITION_FEE;
        Self {
            estimated_market_price,
            acquisition_cost,
            potential_spread: estimated_market_price - acquisition_cost,
        }
    }
}
