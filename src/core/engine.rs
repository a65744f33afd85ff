//! Recommendation pipeline: validate query → budget window → score → gate
//! → dedup → tiered selection.
//!
//! The engine owns no inventory. Callers build an [`Inventory`] once and pass
//! it to every call; nothing here mutates shared state, so concurrent calls
//! over clones of the same table are independent.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::core::brand::Brand;
use crate::core::error::QueryError;
use crate::core::inventory::Inventory;
use crate::core::scoring::ScoringPolicy;
use crate::core::selector::{
    BudgetWindow,
    Recommendation,
    ScoreGate,
    ScoredCandidate,
    dedup_cheapest,
    select,
};
use crate::core::usage::UsageCategory;

/// Currency units per budget block (萬)
pub const BUDGET_BLOCK: f64 = 10_000.0;

/// Default lower edge of the budget window as a fraction of the budget
pub const DEFAULT_FLOOR_RATIO: f64 = 0.3;

/// Validated buyer request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Query
{
    /// Budget in 10,000-unit blocks
    pub budget_limit: f64,
    pub usage: UsageCategory,
    pub preferred_brand: Option<Brand>,
}

impl Query
{
    pub fn new(
        budget_limit: f64,
        usage: UsageCategory,
        preferred_brand: Option<Brand>,
    ) -> Result<Self, QueryError>
    {
        if !budget_limit.is_finite() || budget_limit <= 0.0
        {
            return Err(QueryError::InvalidBudget(budget_limit));
        }
        Ok(Self { budget_limit, usage, preferred_brand })
    }

    /// Parse free-form category and brand tokens; an empty brand or `none`
    /// means no preference.
    pub fn parse(
        budget_limit: f64,
        usage: &str,
        brand: &str,
    ) -> Result<Self, QueryError>
    {
        let usage: UsageCategory = usage.parse()?;
        let preferred = parse_preferred_brand(brand)?;
        Self::new(budget_limit, usage, preferred)
    }

    pub fn budget_max(&self) -> f64
    {
        self.budget_limit * BUDGET_BLOCK
    }
}

pub fn parse_preferred_brand(raw: &str) -> Result<Option<Brand>, QueryError>
{
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none")
    {
        return Ok(None);
    }
    Ok(Some(trimmed.parse::<Brand>()?))
}

/// Tunables that are not part of the scoring policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecommendOptions
{
    /// `budget_min = floor_ratio * budget_max`
    pub floor_ratio: f64,

    /// Require `match_score > 0` instead of the policy's exclusion floor
    pub strict: bool,
}

impl Default for RecommendOptions
{
    fn default() -> Self
    {
        Self { floor_ratio: DEFAULT_FLOOR_RATIO, strict: false }
    }
}

impl RecommendOptions
{
    pub fn validate(&self) -> Result<(), QueryError>
    {
        if !(0.0..=1.0).contains(&self.floor_ratio)
        {
            return Err(QueryError::InvalidFloorRatio(self.floor_ratio));
        }
        Ok(())
    }
}

/// Policy plus options, bundled for repeated queries
#[derive(Debug, Clone, Default)]
pub struct Engine
{
    policy: ScoringPolicy,
    options: RecommendOptions,
}

impl Engine
{
    pub fn new(
        policy: ScoringPolicy,
        options: RecommendOptions,
    ) -> Result<Self, QueryError>
    {
        options.validate()?;
        Ok(Self { policy, options })
    }

    pub fn policy(&self) -> &ScoringPolicy
    {
        &self.policy
    }

    pub fn options(&self) -> RecommendOptions
    {
        self.options
    }

    pub fn recommend(
        &self,
        inventory: &Inventory,
        query: &Query,
    ) -> Result<Vec<Recommendation>, QueryError>
    {
        recommend_with(inventory, query, &self.policy, self.options)
    }

    /// Scored, gated, deduplicated pool before tiered selection
    pub fn candidate_pool(
        &self,
        inventory: &Inventory,
        query: &Query,
    ) -> Result<Vec<ScoredCandidate>, QueryError>
    {
        candidate_pool(inventory, query, &self.policy, self.options)
    }
}

/// Recommend with default options
pub fn recommend(
    inventory: &Inventory,
    query: &Query,
    policy: &ScoringPolicy,
) -> Result<Vec<Recommendation>, QueryError>
{
    recommend_with(inventory, query, policy, RecommendOptions::default())
}

#[instrument(level = "debug", skip(inventory, policy), fields(rows = inventory.len()))]
pub fn recommend_with(
    inventory: &Inventory,
    query: &Query,
    policy: &ScoringPolicy,
    options: RecommendOptions,
) -> Result<Vec<Recommendation>, QueryError>
{
    let pool = candidate_pool(inventory, query, policy, options)?;
    let picks = select(pool, query.preferred_brand);

    debug!(selected = picks.len(), "recommendation complete");
    Ok(picks)
}

fn candidate_pool(
    inventory: &Inventory,
    query: &Query,
    policy: &ScoringPolicy,
    options: RecommendOptions,
) -> Result<Vec<ScoredCandidate>, QueryError>
{
    // Query::new validates, but the fields are public
    if !query.budget_limit.is_finite() || query.budget_limit <= 0.0
    {
        return Err(QueryError::InvalidBudget(query.budget_limit));
    }
    options.validate()?;

    let window = BudgetWindow::new(query.budget_max(), options.floor_ratio);
    let gate = if options.strict { ScoreGate::PositiveOnly } else { ScoreGate::Floor(policy.exclusion_floor) };

    let in_window: Vec<_> = inventory
        .iter()
        .filter(|r| window.contains(r.wholesale_price))
        .collect();

    let admitted: Vec<ScoredCandidate> = in_window
        .iter()
        .map(|r| {
            let score = policy.score(r, query.usage, query.preferred_brand);
            ScoredCandidate::new((*r).clone(), score)
        })
        .filter(|c| gate.admits(c.match_score))
        .collect();

    let admitted_count = admitted.len();
    let pool = dedup_cheapest(admitted);

    debug!(
        min = window.min,
        max = window.max,
        in_window = in_window.len(),
        admitted = admitted_count,
        pool = pool.len(),
        "candidate pool built"
    );

    Ok(pool)
}
