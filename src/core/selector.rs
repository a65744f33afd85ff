//! Candidate filtering and brand-diverse top-3 selection.
//!
//! Selection runs as an ordered list of stages, each filling slots the
//! previous one left open:
//!
//! 1. `Hero`         best preferred-brand record with positive score
//! 2. `Competitors`  up to two positive-score records of distinct other brands
//! 3. `CrossSegment` relaxed competitors (any admitted score) by spread
//! 4. `Fill`         whatever remains, best fit first, no brand constraint
//!
//! The output order is the display order and is never re-sorted.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::brand::Brand;
use crate::core::inventory::InventoryRecord;
use crate::core::pricing::ArbitrageEstimate;

/// Maximum number of recommendations returned
pub const MAX_RESULTS: usize = 3;

/// Competitor slots next to the hero
pub const MAX_COMPETITORS: usize = 2;

/// Selection tier a recommendation was picked by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role
{
    PrimaryRecommendation,
    StrongCompetitor,
    CrossSegmentComparison,
    PopularAlternative,
}

impl Role
{
    pub const fn as_str(self) -> &'static str
    {
        match self
        {
            Role::PrimaryRecommendation => "primary-recommendation",
            Role::StrongCompetitor => "strong-competitor",
            Role::CrossSegmentComparison => "cross-segment-comparison",
            Role::PopularAlternative => "popular-alternative",
        }
    }
}

impl std::fmt::Display for Role
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result
    {
        f.write_str(self.as_str())
    }
}

/// A record scored for one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate
{
    #[serde(flatten)]
    pub record: InventoryRecord,

    pub match_score: i64,

    #[serde(flatten)]
    pub estimate: ArbitrageEstimate,
}

impl ScoredCandidate
{
    pub fn new(
        record: InventoryRecord,
        match_score: i64,
    ) -> Self
    {
        let estimate = record.estimate();
        Self { record, match_score, estimate }
    }

    pub fn brand(&self) -> Brand
    {
        self.record
            .brand
    }

    pub fn spread(&self) -> f64
    {
        self.estimate
            .potential_spread
    }
}

/// A selected candidate together with the tier that picked it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation
{
    #[serde(flatten)]
    pub candidate: ScoredCandidate,

    pub role: Role,
}

/// Inclusive wholesale-price window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetWindow
{
    pub min: u64,
    pub max: u64,
}

impl BudgetWindow
{
    /// `max = limit * block`, `min = max * floor_ratio`, both rounded to
    /// whole units. Inputs are validated by the caller.
    pub fn new(
        budget_max: f64,
        floor_ratio: f64,
    ) -> Self
    {
        let max = budget_max
            .max(0.0)
            .round() as u64;
        let min = (max as f64 * floor_ratio.clamp(0.0, 1.0)).round() as u64;
        Self { min, max }
    }

    pub fn contains(
        &self,
        price: u64,
    ) -> bool
    {
        self.min <= price && price <= self.max
    }
}

/// Hard-exclusion gate applied after scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreGate
{
    /// Drop scores at or below the floor
    Floor(i64),
    /// Strict variant: keep only positive scores
    PositiveOnly,
}

impl ScoreGate
{
    pub fn admits(
        self,
        score: i64,
    ) -> bool
    {
        match self
        {
            ScoreGate::Floor(floor) => score > floor,
            ScoreGate::PositiveOnly => score > 0,
        }
    }
}

/// Keep the cheapest listing per model name, in first-seen order
pub fn dedup_cheapest(candidates: Vec<ScoredCandidate>) -> Vec<ScoredCandidate>
{
    let mut by_name: IndexMap<String, ScoredCandidate> = IndexMap::with_capacity(candidates.len());

    for cand in candidates
    {
        match by_name.get_mut(&cand.record.model_name)
        {
            Some(existing) =>
            {
                if cand
                    .record
                    .wholesale_price
                    < existing
                        .record
                        .wholesale_price
                {
                    *existing = cand;
                }
            }
            None =>
            {
                by_name.insert(
                    cand.record
                        .model_name
                        .clone(),
                    cand,
                );
            }
        }
    }

    by_name
        .into_values()
        .collect()
}

/// `(match_score desc, potential_spread desc)`
fn by_fit(
    a: &ScoredCandidate,
    b: &ScoredCandidate,
) -> Ordering
{
    b.match_score
        .cmp(&a.match_score)
        .then_with(|| {
            b.spread()
                .total_cmp(&a.spread())
        })
}

/// `potential_spread desc`
fn by_spread(
    a: &ScoredCandidate,
    b: &ScoredCandidate,
) -> Ordering
{
    b.spread()
        .total_cmp(&a.spread())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage
{
    Hero,
    Competitors,
    CrossSegment,
    Fill,
    Done,
}

struct Selection
{
    pool: Vec<ScoredCandidate>,
    taken: Vec<bool>,
    picked: Vec<(usize, Role)>,
    preferred: Option<Brand>,
}

impl Selection
{
    fn new(
        pool: Vec<ScoredCandidate>,
        preferred: Option<Brand>,
    ) -> Self
    {
        let taken = vec![false; pool.len()];
        Self { pool, taken, picked: Vec::with_capacity(MAX_RESULTS), preferred }
    }

    fn run(mut self) -> Vec<Recommendation>
    {
        let mut stage = if self
            .preferred
            .is_some()
        {
            Stage::Hero
        }
        else
        {
            Stage::Fill
        };

        while stage != Stage::Done
        {
            let before = self
                .picked
                .len();

            stage = match stage
            {
                Stage::Hero =>
                {
                    if self.pick_hero() { Stage::Competitors } else { Stage::Fill }
                }
                Stage::Competitors =>
                {
                    if self.pick_competitors() < MAX_COMPETITORS { Stage::CrossSegment } else { Stage::Fill }
                }
                Stage::CrossSegment =>
                {
                    self.pick_cross_segment();
                    Stage::Fill
                }
                Stage::Fill =>
                {
                    self.fill();
                    Stage::Done
                }
                Stage::Done => Stage::Done,
            };

            debug!(
                next = ?stage,
                added = self.picked.len() - before,
                total = self.picked.len(),
                "selection stage finished"
            );
        }

        self.finish()
    }

    /// Indices of untaken candidates satisfying `keep`, sorted by `cmp`.
    /// The sort is stable so ties resolve in pool order.
    fn open(
        &self,
        keep: impl Fn(&ScoredCandidate) -> bool,
        cmp: fn(&ScoredCandidate, &ScoredCandidate) -> Ordering,
    ) -> Vec<usize>
    {
        let mut idxs: Vec<usize> = (0..self.pool.len())
            .filter(|&i| !self.taken[i] && keep(&self.pool[i]))
            .collect();
        idxs.sort_by(|&a, &b| cmp(&self.pool[a], &self.pool[b]));
        idxs
    }

    fn take(
        &mut self,
        idx: usize,
        role: Role,
    )
    {
        self.taken[idx] = true;
        self.picked
            .push((idx, role));
    }

    fn picked_brands(&self) -> Vec<Brand>
    {
        self.picked
            .iter()
            .map(|&(i, _)| self.pool[i].brand())
            .collect()
    }

    fn slots_left(&self) -> usize
    {
        MAX_RESULTS.saturating_sub(
            self.picked
                .len(),
        )
    }

    fn pick_hero(&mut self) -> bool
    {
        let Some(preferred) = self.preferred
        else
        {
            return false;
        };

        let hero = self
            .open(|c| c.brand() == preferred && c.match_score > 0, by_fit)
            .first()
            .copied();

        match hero
        {
            Some(idx) =>
            {
                self.take(idx, Role::PrimaryRecommendation);
                true
            }
            None => false,
        }
    }

    /// Returns the number of competitors selected so far
    fn pick_competitors(&mut self) -> usize
    {
        let preferred = self.preferred;
        let mut chosen = 0;

        for idx in self.open(|c| Some(c.brand()) != preferred && c.match_score > 0, by_fit)
        {
            if chosen == MAX_COMPETITORS || self.slots_left() == 0
            {
                break;
            }
            let brand = self.pool[idx].brand();
            if self
                .picked_brands()
                .contains(&brand)
            {
                continue;
            }
            self.take(idx, Role::StrongCompetitor);
            chosen += 1;
        }

        chosen
    }

    fn pick_cross_segment(&mut self)
    {
        let preferred = self.preferred;
        let competitors = self
            .picked
            .iter()
            .filter(|&&(_, role)| role == Role::StrongCompetitor)
            .count();
        let mut need = MAX_COMPETITORS.saturating_sub(competitors);

        for idx in self.open(|c| Some(c.brand()) != preferred, by_spread)
        {
            if need == 0 || self.slots_left() == 0
            {
                break;
            }
            let brand = self.pool[idx].brand();
            if self
                .picked_brands()
                .contains(&brand)
            {
                continue;
            }
            self.take(idx, Role::CrossSegmentComparison);
            need -= 1;
        }
    }

    fn fill(&mut self)
    {
        let mut first = true;

        for idx in self.open(|_| true, by_fit)
        {
            if self.slots_left() == 0
            {
                break;
            }
            let role = if first || self.pool[idx].match_score > 0
            {
                Role::PopularAlternative
            }
            else
            {
                Role::CrossSegmentComparison
            };
            self.take(idx, role);
            first = false;
        }
    }

    fn finish(self) -> Vec<Recommendation>
    {
        let mut slots: Vec<Option<ScoredCandidate>> = self
            .pool
            .into_iter()
            .map(Some)
            .collect();

        self.picked
            .into_iter()
            .filter_map(|(idx, role)| {
                slots[idx]
                    .take()
                    .map(|candidate| Recommendation { candidate, role })
            })
            .collect()
    }
}

/// Pick up to [`MAX_RESULTS`] role-tagged recommendations from an already
/// filtered, deduplicated pool. Pure: identical inputs give identical output.
pub fn select(
    pool: Vec<ScoredCandidate>,
    preferred: Option<Brand>,
) -> Vec<Recommendation>
{
    if pool.is_empty()
    {
        return Vec::new();
    }
    Selection::new(pool, preferred).run()
}
