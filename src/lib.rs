//! **lotscout** - wholesale auction recommender
//!
//! Scores an immutable inventory of auction listings against a buyer's
//! budget, usage category and brand preference, then picks up to three
//! brand-diverse recommendations with arbitrage estimates.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Command runners: load, query, print (text, table, JSON)
pub mod cli_ext {
    /// Inventory resolution and shared output helpers
    pub mod session;

    /// `recommend`
    pub mod recommend_cmd;

    /// `match`, `appraise`, `classify`
    pub mod lookup_cmd;
}

/// Recommendation engine - pure functions over an immutable inventory
pub mod core {
    /// Model-name to canonical brand classification
    pub mod brand;
    pub use brand::{Brand, classify_brand};

    /// Buyer usage categories
    pub mod usage;
    pub use usage::UsageCategory;

    /// Retail / acquisition / spread estimate
    pub mod pricing;
    pub use pricing::ArbitrageEstimate;

    /// Normalized records and the shared inventory table
    pub mod inventory;
    pub use inventory::{Inventory, InventoryRecord};

    /// Per-category keyword and brand weights
    pub mod scoring;
    pub use scoring::ScoringPolicy;

    /// Budget window, dedup and tiered brand-diverse selection
    pub mod selector;
    pub use selector::{Recommendation, Role};

    /// Free-text to inventory record matching
    pub mod fuzzy;
    pub use fuzzy::fuzzy_match;

    /// Request validation errors
    pub mod error;
    pub use error::QueryError;

    /// Query validation and the recommendation pipeline
    pub mod engine;
    pub use engine::{Engine, Query, RecommendOptions, recommend};

    /// Asking price vs. cost floor
    pub mod appraise;
    pub use appraise::{Appraisal, appraise};
}

/// Infrastructure - configuration, inventory loading and logging
pub mod infra {
    /// Layered configuration (file + LOTSCOUT_* env) and `init`
    pub mod config;
    pub use config::{Config, load_config};

    /// CSV inventory ingestion
    pub mod loader;
    pub use loader::{LoadError, LoadStats, load_inventory};

    /// tracing-subscriber setup
    pub mod logging;
}

// Strategic re-exports for library consumers
pub use cli::{AppContext, Cli, Commands};
pub use crate::core::{
    Brand, Engine, Inventory, InventoryRecord, Query, QueryError, Recommendation, RecommendOptions,
    Role, ScoringPolicy, UsageCategory, classify_brand, fuzzy_match, recommend,
};
pub use crate::infra::{Config, load_config, load_inventory};
