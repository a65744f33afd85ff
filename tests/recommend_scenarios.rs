//! End-to-end library scenarios: load or build an inventory, query the
//! engine and check the tiered, brand-diverse picks.

mod util;

use lotscout::core::engine::recommend_with;
use lotscout::core::selector::MAX_RESULTS;
use lotscout::{
    Brand, Engine, Query, QueryError, RecommendOptions, Role, ScoringPolicy, UsageCategory,
    load_inventory, recommend,
};
use util::{inventory, make_auction_fixture, picks};

fn owned(expected: &[(&str, Role)]) -> Vec<(String, Role)>
{
    expected
        .iter()
        .map(|(n, r)| (n.to_string(), *r))
        .collect()
}

#[test]
fn economy_commuter_prefers_the_toyota_compact()
{
    // Given: a hybrid SUV above budget and a two-seat coupe at the ceiling
    let inv = inventory(&[("ALTIS", 500_000), ("RAV4 HYBRID", 900_000), ("86", 700_000)]);
    let query = Query::parse(70.0, "fuel-economy-commuting", "TOYOTA").expect("valid query");

    // When
    let recs = recommend(&inv, &query, &ScoringPolicy::default()).expect("recommend");

    // Then: the compact is the hero; the SUV and the coupe never appear
    assert_eq!(picks(&recs), owned(&[("ALTIS", Role::PrimaryRecommendation)]));
    assert_eq!(recs[0].candidate.match_score, 240);
}

#[test]
fn fixture_csv_yields_hero_and_two_competitors()
{
    let tmp = make_auction_fixture();
    let (inv, stats) = load_inventory(&tmp.path().join("cars.csv")).expect("load");

    assert_eq!(stats.rows_read, 13);
    assert_eq!(stats.dropped_unclassified, 1);
    assert_eq!(stats.dropped_bad_price, 1);
    assert_eq!(inv.len(), 11);

    let query = Query::new(70.0, UsageCategory::FuelEconomy, Some(Brand::Toyota)).unwrap();
    let recs = recommend(&inv, &query, &ScoringPolicy::default()).unwrap();

    assert_eq!(
        picks(&recs),
        owned(&[
            ("TOYOTA ALTIS", Role::PrimaryRecommendation),
            ("HONDA FIT", Role::StrongCompetitor),
            ("NISSAN SENTRA", Role::StrongCompetitor),
        ])
    );
    // the cheaper duplicate listing wins
    assert_eq!(recs[0].candidate.record.wholesale_price, 430_000);
}

#[test]
fn cross_segment_fills_missing_competitor_slot()
{
    // Only one other brand scores positively; the runner-up slot goes to
    // the best spread among the remaining brands.
    let inv = inventory(&[
        ("TOYOTA ALTIS", 450_000),
        ("HONDA FIT", 380_000),
        ("HONDA CR-V", 650_000),
        ("BMW 320I", 520_000),
    ]);
    let query = Query::new(70.0, UsageCategory::FuelEconomy, Some(Brand::Toyota)).unwrap();
    let recs = recommend(&inv, &query, &ScoringPolicy::default()).unwrap();

    assert_eq!(
        picks(&recs),
        owned(&[
            ("TOYOTA ALTIS", Role::PrimaryRecommendation),
            ("HONDA FIT", Role::StrongCompetitor),
            ("BMW 320I", Role::CrossSegmentComparison),
        ])
    );
}

#[test]
fn strict_mode_keeps_only_positive_fits()
{
    let inv = inventory(&[
        ("TOYOTA ALTIS", 450_000),
        ("HONDA FIT", 380_000),
        ("HONDA CR-V", 650_000),
        ("BMW 320I", 520_000),
    ]);
    let query = Query::new(70.0, UsageCategory::FuelEconomy, Some(Brand::Toyota)).unwrap();
    let strict = RecommendOptions { strict: true, ..Default::default() };
    let recs = recommend_with(&inv, &query, &ScoringPolicy::default(), strict).unwrap();

    assert_eq!(
        picks(&recs),
        owned(&[("TOYOTA ALTIS", Role::PrimaryRecommendation), ("HONDA FIT", Role::StrongCompetitor)])
    );
}

#[test]
fn no_preference_fills_by_fit_then_spread()
{
    let inv = inventory(&[
        ("NISSAN SENTRA", 350_000),
        ("HONDA CR-V", 490_000),
        ("HONDA FIT", 380_000),
        ("TOYOTA ALTIS", 450_000),
    ]);
    let query = Query::new(50.0, UsageCategory::FuelEconomy, None).unwrap();
    let recs = recommend(&inv, &query, &ScoringPolicy::default()).unwrap();

    assert_eq!(
        picks(&recs),
        owned(&[
            ("TOYOTA ALTIS", Role::PopularAlternative),
            ("HONDA FIT", Role::PopularAlternative),
            ("NISSAN SENTRA", Role::PopularAlternative),
        ])
    );
}

#[test]
fn missing_hero_falls_back_to_fill()
{
    let inv = inventory(&[("HONDA FIT", 380_000), ("NISSAN SENTRA", 350_000)]);
    let query = Query::new(50.0, UsageCategory::FuelEconomy, Some(Brand::Bmw)).unwrap();
    let recs = recommend(&inv, &query, &ScoringPolicy::default()).unwrap();

    assert_eq!(
        picks(&recs),
        owned(&[("HONDA FIT", Role::PopularAlternative), ("NISSAN SENTRA", Role::PopularAlternative)])
    );
}

#[test]
fn family_space_never_offers_two_seaters()
{
    let inv = inventory(&[
        ("MAZDA MX-5", 600_000),
        ("MAZDA CX-5", 620_000),
        ("TOYOTA 86", 650_000),
        ("TOYOTA SIENTA", 480_000),
        ("HONDA S2000", 500_000),
    ]);

    for preferred in [None, Some(Brand::Mazda), Some(Brand::Toyota), Some(Brand::Honda)]
    {
        let query = Query::new(70.0, UsageCategory::FamilySpace, preferred).unwrap();
        let recs = recommend(&inv, &query, &ScoringPolicy::default()).unwrap();
        let names: Vec<String> = picks(&recs)
            .into_iter()
            .map(|(n, _)| n)
            .collect();

        assert!(!names.contains(&"MAZDA MX-5".to_string()), "{preferred:?}: {names:?}");
        assert!(!names.contains(&"TOYOTA 86".to_string()), "{preferred:?}: {names:?}");
        assert!(!names.contains(&"HONDA S2000".to_string()), "{preferred:?}: {names:?}");
        assert!(!names.is_empty());
    }
}

#[test]
fn degenerate_window_matches_exact_price_only()
{
    let engine = Engine::new(ScoringPolicy::default(), RecommendOptions { floor_ratio: 1.0, strict: false }).unwrap();
    let inv = inventory(&[("HONDA FIT", 380_000), ("NISSAN SENTRA", 350_000), ("FORD FOCUS", 380_001)]);

    let hit = Query::new(38.0, UsageCategory::FuelEconomy, None).unwrap();
    assert_eq!(
        picks(&engine.recommend(&inv, &hit).unwrap()),
        owned(&[("HONDA FIT", Role::PopularAlternative)])
    );

    let miss = Query::new(36.0, UsageCategory::FuelEconomy, None).unwrap();
    assert_eq!(engine.recommend(&inv, &miss), Ok(Vec::new()));
}

#[test]
fn empty_inventory_is_an_empty_result_not_an_error()
{
    let query = Query::new(70.0, UsageCategory::Learner, None).unwrap();
    let recs = recommend(&inventory(&[]), &query, &ScoringPolicy::default()).unwrap();
    assert!(recs.is_empty());
}

#[test]
fn invalid_requests_fail_fast()
{
    assert_eq!(Query::parse(0.0, "learner", "none"), Err(QueryError::InvalidBudget(0.0)));
    assert!(matches!(Query::parse(70.0, "joyride", "none"), Err(QueryError::UnknownUsage(_))));
    assert!(matches!(Query::parse(70.0, "learner", "TESLA"), Err(QueryError::UnknownBrand(_))));
}

#[test]
fn repeated_calls_are_identical()
{
    let tmp = make_auction_fixture();
    let (inv, _) = load_inventory(&tmp.path().join("cars.csv")).unwrap();
    let shared = inv.clone();

    for usage in UsageCategory::ALL
    {
        let query = Query::new(80.0, usage, Some(Brand::Honda)).unwrap();
        let first = recommend(&inv, &query, &ScoringPolicy::default()).unwrap();
        let second = recommend(&shared, &query, &ScoringPolicy::default()).unwrap();
        assert_eq!(first, second, "{usage}");
        assert!(first.len() <= MAX_RESULTS);
    }
}

#[test]
fn custom_policy_changes_the_ranking()
{
    // Flip the economy preference: small cars now lose to SUVs
    let mut policy = ScoringPolicy::default();
    let rules = policy
        .categories
        .iter_mut()
        .find(|c| c.category == UsageCategory::FuelEconomy)
        .unwrap();
    for rule in &mut rules.keywords
    {
        if rule.label == "suv"
        {
            rule.points = 100;
        }
    }
    let policy = ScoringPolicy::from_toml_str(&policy.to_toml_string().unwrap()).unwrap();

    let inv = inventory(&[("HONDA FIT", 380_000), ("HONDA CR-V", 490_000)]);
    let query = Query::new(50.0, UsageCategory::FuelEconomy, None).unwrap();
    let recs = recommend(&inv, &query, &policy).unwrap();

    assert_eq!(recs[0].candidate.record.model_name, "HONDA CR-V");
    assert_eq!(recs[0].candidate.match_score, 100);
}
