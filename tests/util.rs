//! Shared test utilities for integration tests
//!
//! Provides the auction-export fixture and helpers used across multiple
//! test files.

#![allow(dead_code)]

use assert_fs::prelude::*;
use lotscout::{Inventory, Recommendation, Role};

/// Auction export in the original column layout. Contains one duplicate
/// model (the cheaper ALTIS must win), one unclassifiable make and one
/// unusable price.
pub const AUCTION_CSV: &str = "\
車款名稱,成本底價
TOYOTA ALTIS,450000
TOYOTA RAV4 HYBRID,900000
TOYOTA 86,700000
HONDA FIT,380000
HONDA CR-V,650000
NISSAN SENTRA,350000
BMW 320I 2012 SPORT,520000
BMW X5,1200000
MAZDA MX-5,600000
FORD FOCUS,300000
TOYOTA ALTIS,430000
TESLA MODEL 3,900000
HONDA CIVIC,call
";

/// Temp directory holding `cars.csv` (the default inventory path)
pub fn make_auction_fixture() -> assert_fs::TempDir
{
    // Initialize the temporary working directory
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    tmp.child("cars.csv")
        .write_str(AUCTION_CSV)
        .expect("write cars.csv");

    tmp
}

/// Inventory from `(model, price)` pairs
pub fn inventory(rows: &[(&str, u64)]) -> Inventory
{
    Inventory::from_raw(
        rows.iter()
            .copied(),
    )
}

/// `(model_name, role)` pairs in result order
pub fn picks(recs: &[Recommendation]) -> Vec<(String, Role)>
{
    recs.iter()
        .map(|r| {
            (
                r.candidate
                    .record
                    .model_name
                    .clone(),
                r.role,
            )
        })
        .collect()
}
