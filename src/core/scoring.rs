//! Usage-fit scoring driven by an explicit, swappable policy table.
//!
//! Each usage category owns a list of keyword rules (allow-lists carry
//! positive points, deny-lists negative), brand adjustments, and an optional
//! sport-line rule. A rule contributes its points once when any of its
//! keywords occurs in the upper-cased model name.
//!
//! Weight tiers of the built-in policy:
//! - ordinary fit signals: ±10..60
//! - preferred-brand bonus: +200
//! - hard exclusions: -1000 (family-space two-seaters: -5000)
//! - exclusion floor: -100
//!
//! so a brand preference outranks ordinary fit but never lifts a hard
//! exclusion back above the floor.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::brand::Brand;
use crate::core::inventory::InventoryRecord;
use crate::core::usage::UsageCategory;

#[derive(Debug, thiserror::Error)]
pub enum PolicyError
{
    #[error("failed to read scoring policy {path}: {source}")]
    Io
    {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scoring policy TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize scoring policy: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid scoring policy: {0}")]
    Invalid(String),
}

/// Points awarded when any keyword occurs in the model name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule
{
    /// Short human label, used in trace output only
    pub label: String,
    pub points: i64,
    pub keywords: Vec<String>,
}

/// Points awarded when the record's brand is listed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandRule
{
    pub points: i64,
    pub brands: Vec<Brand>,
}

/// Brand-conditional rule: for the listed (practical) brands, a model on the
/// sport sub-line earns `bonus`, every other model of those brands `penalty`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SportLineRule
{
    pub brands: Vec<Brand>,
    pub keywords: Vec<String>,
    pub bonus: i64,
    pub penalty: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRules
{
    pub category: UsageCategory,

    #[serde(default)]
    pub keywords: Vec<KeywordRule>,

    #[serde(default)]
    pub brands: Vec<BrandRule>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport_line: Option<SportLineRule>,
}

impl CategoryRules
{
    /// Category fit of one record, excluding the preferred-brand bonus
    pub fn score(
        &self,
        record: &InventoryRecord,
    ) -> i64
    {
        let name = record
            .model_name
            .as_str();
        let mut total = 0;

        for rule in &self.keywords
        {
            if contains_any(name, &rule.keywords)
            {
                trace!(model = name, rule = %rule.label, points = rule.points, "keyword rule hit");
                total += rule.points;
            }
        }

        for rule in &self.brands
        {
            if rule
                .brands
                .contains(&record.brand)
            {
                total += rule.points;
            }
        }

        if let Some(sport) = &self.sport_line
        {
            if sport
                .brands
                .contains(&record.brand)
            {
                total += if contains_any(name, &sport.keywords) { sport.bonus } else { sport.penalty };
            }
        }

        total
    }
}

fn contains_any(
    name: &str,
    keywords: &[String],
) -> bool
{
    keywords
        .iter()
        .any(|k| name.contains(k.as_str()))
}

/// Complete scoring configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringPolicy
{
    /// Added when the record's brand equals the preferred brand
    pub brand_bonus: i64,

    /// Records scoring at or below this are never recommended
    pub exclusion_floor: i64,

    pub categories: Vec<CategoryRules>,
}

impl Default for ScoringPolicy
{
    fn default() -> Self
    {
        builtin_policy()
    }
}

impl ScoringPolicy
{
    pub fn rules_for(
        &self,
        category: UsageCategory,
    ) -> Option<&CategoryRules>
    {
        self.categories
            .iter()
            .find(|c| c.category == category)
    }

    /// Integer match score of `record` for `category`.
    ///
    /// Total over every input: a record no rule mentions scores 0 (plus the
    /// brand bonus when it is of the preferred brand).
    pub fn score(
        &self,
        record: &InventoryRecord,
        category: UsageCategory,
        preferred: Option<Brand>,
    ) -> i64
    {
        let fit = self
            .rules_for(category)
            .map(|rules| rules.score(record))
            .unwrap_or(0);

        let bonus = if preferred == Some(record.brand) { self.brand_bonus } else { 0 };

        fit + bonus
    }

    /// Parse a policy from TOML, normalizing keywords to upper case
    pub fn from_toml_str(text: &str) -> Result<Self, PolicyError>
    {
        let policy: ScoringPolicy = toml::from_str(text)?;
        let policy = policy.normalized();
        policy.validate()?;
        Ok(policy)
    }

    pub fn load(path: &Path) -> Result<Self, PolicyError>
    {
        let text = fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path
                .display()
                .to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, PolicyError>
    {
        Ok(toml::to_string_pretty(self)?)
    }

    fn normalized(mut self) -> Self
    {
        let upper = |words: &mut Vec<String>| {
            for w in words.iter_mut()
            {
                *w = w
                    .trim()
                    .to_uppercase();
            }
            words.retain(|w| !w.is_empty());
        };

        for cat in &mut self.categories
        {
            for rule in &mut cat.keywords
            {
                upper(&mut rule.keywords);
            }
            if let Some(sport) = &mut cat.sport_line
            {
                upper(&mut sport.keywords);
            }
        }
        self
    }

    fn validate(&self) -> Result<(), PolicyError>
    {
        if self.brand_bonus < 0
        {
            return Err(PolicyError::Invalid(format!(
                "brand_bonus must not be negative (got {})",
                self.brand_bonus
            )));
        }

        for (i, cat) in self
            .categories
            .iter()
            .enumerate()
        {
            if self.categories[..i]
                .iter()
                .any(|c| c.category == cat.category)
            {
                return Err(PolicyError::Invalid(format!(
                    "category '{}' is defined more than once",
                    cat.category
                )));
            }
        }

        Ok(())
    }
}

fn words(list: &[&str]) -> Vec<String>
{
    list.iter()
        .map(|s| s.to_string())
        .collect()
}

fn kw(
    label: &str,
    points: i64,
    list: &[&str],
) -> KeywordRule
{
    KeywordRule { label: label.to_string(), points, keywords: words(list) }
}

fn brands(
    points: i64,
    list: &[Brand],
) -> BrandRule
{
    BrandRule { points, brands: list.to_vec() }
}

// Shared keyword groups
const SPORTS_TWO_SEAT: &[&str] = &[
    "GR86", "86", "MX-5", "MX5", "BRZ", "370Z", "S2000", "SUPRA", "Z4", "SLK", "CAYMAN",
    "BOXSTER", "911", "COUPE", "CABRIO", "ROADSTER", "SPIDER", "GT-R", "TYPE R", "TYPE-R",
];
const SUV: &[&str] = &[
    "RAV4", "CR-V", "CRV", "X-TRAIL", "CX-5", "CX-9", "OUTLANDER", "KUGA", "TIGUAN", "FORESTER",
    "TUCSON", "SANTA FE", "SORENTO", "SPORTAGE", "XC90", "XC60", "CAYENNE", "URX", "X5", "X3",
];
const COMMERCIAL: &[&str] =
    &["HIACE", "TOWN ACE", "VERYCA", "ZINGER", "CANTER", "DELICA", "HILUX", "RANGER", "貨車"];
const HIGH_POWER: &[&str] = &[
    "GT-R", "AMG", "M2", "M3", "M4", "911", "CAYMAN", "SUPRA", "TYPE R", "TYPE-R", "370Z", "RS3",
    "RS4", "RS5", "RS6", "RS7",
];

/// Built-in weighting scheme
pub fn builtin_policy() -> ScoringPolicy
{
    use Brand::*;

    let fuel_economy = CategoryRules {
        category: UsageCategory::FuelEconomy,
        keywords: vec![
            kw("hybrid", 50, &["HYBRID", "HV", "E-POWER", "PHEV", "PRIUS"]),
            kw("compact", 40, &[
                "ALTIS", "COROLLA", "YARIS", "VIOS", "FIT", "CITY", "CIVIC", "SENTRA", "TIIDA",
                "MARCH", "MAZDA3", "FOCUS", "FIESTA", "GOLF", "POLO", "SWIFT", "ELANTRA",
                "PICANTO", "LIVINA",
            ]),
            kw("suv", -30, SUV),
            kw("large-commercial", -20, &["HIACE", "VERYCA", "ZINGER", "CANTER", "ALPHARD", "PREVIA"]),
            kw("sports-car", -1000, &[SPORTS_TWO_SEAT, &["AMG", "M3", "M4"][..]].concat()),
        ],
        brands: vec![],
        sport_line: None,
    };

    let family_space = CategoryRules {
        category: UsageCategory::FamilySpace,
        keywords: vec![
            kw("mpv", 50, &[
                "SIENTA", "WISH", "PREVIA", "ALPHARD", "ODYSSEY", "TOURAN", "SHARAN", "CARNIVAL",
                "DELICA", "LIVINA", "URX", "MPV", "7人", "七人",
            ]),
            kw("suv", 30, SUV),
            kw("sedan", 10, &["CAMRY", "ACCORD", "ALTIS", "COROLLA", "TEANA", "PASSAT"]),
            kw("city-car", -30, &["MARCH", "YARIS", "PICANTO", "SWIFT", "JIMNY"]),
            kw("two-seat", -5000, SPORTS_TWO_SEAT),
        ],
        brands: vec![],
        sport_line: None,
    };

    let business = CategoryRules {
        category: UsageCategory::Business,
        keywords: vec![
            kw("commercial", 50, &[COMMERCIAL, &["VAN"][..]].concat()),
            kw("durable-sedan", 30, &[
                "CAMRY", "ALTIS", "COROLLA", "CIVIC", "ACCORD", "SENTRA", "TEANA", "PRIUS", "VIOS",
            ]),
            kw("sports-car", -1000, &[SPORTS_TWO_SEAT, &["AMG"][..]].concat()),
        ],
        brands: vec![brands(20, &[Toyota, Lexus, Honda]), brands(-30, &[Porsche, Mini])],
        sport_line: None,
    };

    let prestige = CategoryRules {
        category: UsageCategory::Prestige,
        keywords: vec![
            kw("flagship", 40, &[
                "S-CLASS", "S350", "S400", "S450", "S500", "S580", "MAYBACH", "7-SERIES", "740",
                "750", "760", "LS460", "LS500", "ES300", "ES350", "A8", "PANAMERA", "CAYENNE",
                "XC90", "E300", "540",
            ]),
            kw("economy-small", -30, &["MARCH", "YARIS", "VIOS", "PICANTO", "SWIFT", "COLT"]),
            kw("commercial", -1000, COMMERCIAL),
        ],
        brands: vec![
            brands(50, &[Benz, Bmw, Lexus, Porsche]),
            brands(30, &[Audi, Volvo, Infiniti]),
            brands(-40, &[Suzuki, Mitsubishi, Luxgen, Kia, Hyundai]),
        ],
        sport_line: None,
    };

    let driving_enjoyment = CategoryRules {
        category: UsageCategory::DrivingEnjoyment,
        keywords: vec![
            kw("sports-car", 50, &[SPORTS_TWO_SEAT, &["GTI", "AMG", "M2", "M3", "M4"][..]].concat()),
            kw("sport-trim", 20, &["SPORT", "TURBO"]),
            kw("minivan", -50, &["PREVIA", "ALPHARD", "SIENTA", "WISH", "CARNIVAL"]),
            kw("commercial", -1000, COMMERCIAL),
        ],
        brands: vec![brands(30, &[Porsche, Bmw, Mini])],
        sport_line: Some(SportLineRule {
            brands: vec![Toyota, Honda, Nissan, Mitsubishi, Suzuki, Luxgen, Hyundai, Kia],
            keywords: words(&[
                "GR86", "86", "GR YARIS", "SUPRA", "TYPE R", "TYPE-R", "NISMO", "GT-R", "370Z",
                "S2000", "SWIFT SPORT", "LANCER EVO", "EVOLUTION", "RALLIART",
            ]),
            bonus: 60,
            penalty: -40,
        }),
    };

    let learner = CategoryRules {
        category: UsageCategory::Learner,
        keywords: vec![
            kw("small-cheap", 40, &[
                "MARCH", "YARIS", "VIOS", "FIT", "CITY", "SWIFT", "TIIDA", "PICANTO", "COLT",
                "FIESTA", "POLO", "ALTIS", "COROLLA", "LIVINA",
            ]),
            kw("large", -20, &["HIACE", "ALPHARD", "PREVIA", "CANTER"]),
            kw("high-power", -1000, HIGH_POWER),
        ],
        brands: vec![
            brands(10, &[Toyota, Honda, Nissan, Suzuki]),
            brands(-50, &[Porsche, Benz, Bmw, Audi]),
        ],
        sport_line: None,
    };

    ScoringPolicy {
        brand_bonus: 200,
        exclusion_floor: -100,
        categories: vec![fuel_economy, family_space, business, prestige, driving_enjoyment, learner],
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn rec(name: &str) -> InventoryRecord
    {
        InventoryRecord::new(name, 500_000).expect("classifiable")
    }

    #[test]
    fn neutral_record_scores_zero()
    {
        let policy = ScoringPolicy::default();
        let r = rec("AUDI A4 AVANT");
        assert_eq!(policy.score(&r, UsageCategory::FuelEconomy, None), 0);
    }

    #[test]
    fn economy_keywords_and_brand_bonus()
    {
        let policy = ScoringPolicy::default();
        let altis = rec("ALTIS");
        let rav4 = rec("RAV4 HYBRID");
        let gr86 = rec("86");

        assert_eq!(policy.score(&altis, UsageCategory::FuelEconomy, None), 40);
        assert_eq!(policy.score(&altis, UsageCategory::FuelEconomy, Some(Brand::Toyota)), 240);
        assert_eq!(policy.score(&rav4, UsageCategory::FuelEconomy, Some(Brand::Toyota)), 220);
        assert!(policy.score(&gr86, UsageCategory::FuelEconomy, Some(Brand::Toyota)) <= policy.exclusion_floor);
    }

    #[test]
    fn family_space_two_seater_is_beyond_rescue()
    {
        let policy = ScoringPolicy::default();
        let mx5 = rec("MAZDA MX-5 ROADSTER");
        let score = policy.score(&mx5, UsageCategory::FamilySpace, Some(Brand::Mazda));
        assert!(score <= -4000, "got {score}");
    }

    #[test]
    fn sport_line_rule_splits_practical_brand_lineup()
    {
        let policy = ScoringPolicy::default();
        let gr86 = rec("TOYOTA GR86");
        let altis = rec("TOYOTA ALTIS");
        let bmw = rec("BMW 320I");

        // 50 sports-car + 60 sport-line
        assert_eq!(policy.score(&gr86, UsageCategory::DrivingEnjoyment, None), 110);
        assert_eq!(policy.score(&altis, UsageCategory::DrivingEnjoyment, None), -40);
        // BMW is not a practical brand: brand adjustment only
        assert_eq!(policy.score(&bmw, UsageCategory::DrivingEnjoyment, None), 30);
    }

    #[test]
    fn prestige_brand_adjustments()
    {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.score(&rec("BENZ S350"), UsageCategory::Prestige, None), 90);
        assert_eq!(policy.score(&rec("SUZUKI SWIFT"), UsageCategory::Prestige, None), -70);
        assert!(policy.score(&rec("TOYOTA HIACE"), UsageCategory::Prestige, Some(Brand::Toyota)) < -100);
    }

    #[test]
    fn hard_exclusions_survive_every_positive_signal()
    {
        let policy = ScoringPolicy::default();
        for cat in &policy.categories
        {
            let best_case: i64 = cat
                .keywords
                .iter()
                .map(|r| r.points.max(0))
                .chain(
                    cat.brands
                        .iter()
                        .map(|r| r.points.max(0)),
                )
                .chain(
                    cat.sport_line
                        .iter()
                        .map(|s| s.bonus.max(0)),
                )
                .sum::<i64>()
                + policy.brand_bonus;

            for rule in &cat.keywords
            {
                if rule.points <= policy.exclusion_floor
                {
                    assert!(rule.points + best_case <= policy.exclusion_floor, "{}", rule.label);
                }
                else
                {
                    assert!(rule.points.abs() < policy.brand_bonus, "{}", rule.label);
                }
            }
        }
    }

    #[test]
    fn policy_round_trips_through_toml_and_normalizes_keywords()
    {
        let text = ScoringPolicy::default()
            .to_toml_string()
            .unwrap();
        let back = ScoringPolicy::from_toml_str(&text).unwrap();
        assert_eq!(back, ScoringPolicy::default());

        let custom = r#"
brand_bonus = 100
exclusion_floor = -50

[[categories]]
category = "learner"

[[categories.keywords]]
label = "tiny"
points = 15
keywords = [" march ", "fit"]
"#;
        let policy = ScoringPolicy::from_toml_str(custom).unwrap();
        let rules = policy
            .rules_for(UsageCategory::Learner)
            .unwrap();
        assert_eq!(rules.keywords[0].keywords, vec!["MARCH", "FIT"]);
        assert!(policy.rules_for(UsageCategory::Prestige).is_none());
        assert_eq!(policy.score(&rec("NISSAN MARCH"), UsageCategory::Learner, Some(Brand::Nissan)), 115);
    }

    #[test]
    fn duplicate_categories_are_rejected()
    {
        let text = r#"
brand_bonus = 200
exclusion_floor = -100

[[categories]]
category = "business"

[[categories]]
category = "business"
"#;
        let err = ScoringPolicy::from_toml_str(text).unwrap_err();
        assert!(matches!(err, PolicyError::Invalid(_)));
    }
}
