//! Token-hit matching of free text against inventory model names.
//!
//! Used to reconcile a model name pulled out of unstructured text (a seller
//! message, an OCR'd listing) with the canonical inventory. Each whitespace
//! token of the query that occurs case-insensitively inside a model name is
//! one hit; the record with the most hits wins, earliest in table order on
//! ties.

use serde::Serialize;

use crate::core::inventory::{Inventory, InventoryRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FuzzyHit<'a> {
    pub record: &'a InventoryRecord,
    pub hits: usize,
}

impl<'a> FuzzyHit<'a> {
    /// Score one record against a query.
    pub fn of(record: &'a InventoryRecord, query: &str) -> Self {
        let hits = count_hits(&query_tokens(query), &record.model_name);
        Self { record, hits }
    }
}

fn query_tokens(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_uppercase).collect()
}

fn count_hits(tokens: &[String], model_name: &str) -> usize {
    let name = model_name.to_uppercase();
    tokens.iter().filter(|t| name.contains(t.as_str())).count()
}

/// Best single match, or `None` when no token hits any record.
pub fn fuzzy_match<'a>(inventory: &'a Inventory, query: &str) -> Option<&'a InventoryRecord> {
    let tokens = query_tokens(query);
    if tokens.is_empty() {
        return None;
    }

    let mut best: Option<FuzzyHit<'a>> = None;
    for record in inventory {
        let hits = count_hits(&tokens, &record.model_name);
        // strictly greater keeps the first record on ties
        if hits > best.map_or(0, |b| b.hits) {
            best = Some(FuzzyHit { record, hits });
        }
    }

    best.map(|b| b.record)
}

/// Every record with at least one hit, most hits first, table order on ties.
pub fn fuzzy_rank<'a>(inventory: &'a Inventory, query: &str) -> Vec<FuzzyHit<'a>> {
    let tokens = query_tokens(query);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<FuzzyHit<'a>> = inventory
        .iter()
        .map(|record| FuzzyHit { record, hits: count_hits(&tokens, &record.model_name) })
        .filter(|h| h.hits > 0)
        .collect();
    ranked.sort_by(|a, b| b.hits.cmp(&a.hits));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory() -> Inventory {
        Inventory::from_raw([
            ("BMW X5", 1_200_000),
            ("BMW 320I 2012 SPORT", 520_000),
            ("TOYOTA ALTIS", 450_000),
        ])
    }

    #[test]
    fn more_token_hits_win() {
        let inv = inventory();
        let best = fuzzy_match(&inv, "2012 BMW 320i").expect("match");
        assert_eq!(best.model_name, "BMW 320I 2012 SPORT");
    }

    #[test]
    fn ties_resolve_to_table_order() {
        let inv = inventory();
        let best = fuzzy_match(&inv, "bmw").expect("match");
        assert_eq!(best.model_name, "BMW X5");
    }

    #[test]
    fn no_hits_or_blank_query_is_none() {
        let inv = inventory();
        assert!(fuzzy_match(&inv, "tesla zzz").is_none());
        assert!(fuzzy_match(&inv, "   ").is_none());
    }

    #[test]
    fn single_letter_tokens_count_as_hits() {
        let inv = inventory();
        // "Y" occurs inside "TOYOTA"
        let best = fuzzy_match(&inv, "tesla model y").expect("match");
        assert_eq!(best.model_name, "TOYOTA ALTIS");
        assert_eq!(FuzzyHit::of(best, "tesla model y").hits, 1);
    }

    #[test]
    fn hit_of_best_match_agrees_with_rank_head() {
        let inv = inventory();
        for query in ["2012 BMW 320i", "bmw", "altis toyota", "x5 sport"] {
            let best = fuzzy_match(&inv, query).map(|r| FuzzyHit::of(r, query));
            assert_eq!(best, fuzzy_rank(&inv, query).into_iter().next(), "{query}");
        }
    }

    #[test]
    fn rank_lists_all_hits_in_order() {
        let inv = inventory();
        let ranked = fuzzy_rank(&inv, "BMW 320I");
        let got: Vec<(&str, usize)> =
            ranked.iter().map(|h| (h.record.model_name.as_str(), h.hits)).collect();
        assert_eq!(got, vec![("BMW 320I 2012 SPORT", 2), ("BMW X5", 1)]);
    }
}
