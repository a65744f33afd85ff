//! Query validation errors raised at the engine boundary.
//!
//! Data-quality drops and empty results are not errors; only a malformed
//! request is.

use miette::Diagnostic;

use crate::core::brand::UnknownBrand;
use crate::core::usage::UnknownUsage;

#[derive(Debug, Clone, PartialEq, thiserror::Error, Diagnostic)]
pub enum QueryError
{
    #[error("budget must be a positive number of 10,000-unit blocks, got {0}")]
    #[diagnostic(
        code(lotscout::query::budget),
        help("pass the budget in 萬, e.g. `--budget 70` for 700,000")
    )]
    InvalidBudget(f64),

    #[error("budget floor ratio must be within [0, 1], got {0}")]
    #[diagnostic(
        code(lotscout::query::floor_ratio),
        help("0.3 keeps listings priced between 30% and 100% of the budget")
    )]
    InvalidFloorRatio(f64),

    #[error("unknown usage category '{0}'")]
    #[diagnostic(
        code(lotscout::query::usage),
        help(
            "valid categories: fuel-economy, family-space, business, prestige, driving-enjoyment, learner"
        )
    )]
    UnknownUsage(String),

    #[error("unknown brand '{0}'")]
    #[diagnostic(
        code(lotscout::query::brand),
        help(
            "use a make such as TOYOTA, HONDA, BMW, BENZ, VW, or `none` for no preference"
        )
    )]
    UnknownBrand(String),

    #[error("asking price must be a positive number of 10,000-unit blocks, got {0}")]
    #[diagnostic(code(lotscout::query::asking_price), help("pass the seller's price in 萬, e.g. `--price 60`"))]
    InvalidAskingPrice(f64),
}

impl From<UnknownUsage> for QueryError
{
    fn from(err: UnknownUsage) -> Self
    {
        QueryError::UnknownUsage(err.0)
    }
}

impl From<UnknownBrand> for QueryError
{
    fn from(err: UnknownBrand) -> Self
    {
        QueryError::UnknownBrand(err.0)
    }
}
