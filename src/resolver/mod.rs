// Resolver module: maps free text to the single best catalog record.

pub mod strategies;

use crate::config::MatchConfig;
use crate::model::{Catalog, CatalogRecord};
use crate::normalizer::normalize_name;
use tracing::{debug, info};

pub use strategies::{FallbackScan, FuzzyMatch, MatchStrategy, SubstringMatch, TokenOverlap};

/// Which stage of the cascade produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    Substring,
    TokenOverlap,
    Fuzzy,
    FallbackScan,
}

/// Query text as the strategies compare it.
#[derive(Debug, Clone)]
pub struct Query {
    pub normalized: String,
}

impl Query {
    pub fn new(text: &str) -> Self {
        Self {
            normalized: normalize_name(text),
        }
    }
}

/// A matchable record prepared for comparison.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub category: &'a str,
    pub record: &'a CatalogRecord,
    pub normalized: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMatch<'a> {
    pub category: &'a str,
    pub record: &'a CatalogRecord,
    pub stage: MatchStage,
}

/// Ordered pipeline of strategies; the first one that returns a candidate wins.
pub struct NameResolver {
    strategies: Vec<Box<dyn MatchStrategy + Send + Sync>>,
}

impl NameResolver {
    pub fn new(cfg: &MatchConfig) -> Self {
        Self::with_strategies(vec![
            Box::new(SubstringMatch),
            Box::new(TokenOverlap::new(cfg.token_overlap_threshold)),
            Box::new(FuzzyMatch::new(cfg.fuzzy_cutoff, cfg.fuzzy_max_candidates)),
            Box::new(FallbackScan::new(cfg.fallback_priority.clone())),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn MatchStrategy + Send + Sync>>) -> Self {
        Self { strategies }
    }

    /// Returns `None` when no stage finds anything; callers must handle that.
    pub fn resolve<'a>(&self, catalog: &'a Catalog, text: &str) -> Option<ResolvedMatch<'a>> {
        let query = Query::new(text);
        if query.normalized.is_empty() {
            debug!("Empty query after normalization, nothing to resolve");
            return None;
        }

        let candidates = candidates(catalog);
        for strategy in &self.strategies {
            if let Some(idx) = strategy.find(&query, &candidates) {
                let hit = &candidates[idx];
                info!(
                    "Resolved {:?} to {} (cat={}, stage={:?})",
                    query.normalized,
                    hit.record.display_name,
                    hit.category,
                    strategy.stage()
                );
                return Some(ResolvedMatch {
                    category: hit.category,
                    record: hit.record,
                    stage: strategy.stage(),
                });
            }
        }

        info!("No catalog match for {:?}", query.normalized);
        None
    }
}

/// Matchable records in catalog order with their normalized names.
pub fn candidates(catalog: &Catalog) -> Vec<Candidate<'_>> {
    catalog
        .entries()
        .map(|(category, record)| Candidate {
            category,
            record,
            normalized: normalize_name(&record.display_name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CatalogRecord;
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::empty()
            .with_category(
                "gpus",
                vec![
                    CatalogRecord::new("ASUS RTX 4060 OC", json!(19000)),
                    CatalogRecord::new("Sapphire Pulse RX 7600 XT", json!(18500)),
                ],
            )
            .with_category(
                "cpus",
                vec![
                    CatalogRecord::new("AMD Ryzen 5 5600", json!(5000)),
                    CatalogRecord::new("AMD Ryzen 5 5600X", json!(6200)),
                ],
            )
            .with_category(
                "motherboards",
                vec![CatalogRecord::new("ASUS PRIME B650-PLUS", json!(9500))],
            )
    }

    fn resolver() -> NameResolver {
        NameResolver::new(&MatchConfig::default())
    }

    #[test]
    fn exact_name_inside_query_wins() {
        let cat = catalog();
        let hit = resolver()
            .resolve(&cat, "what are the specs of the asus prime b650 plus?")
            .unwrap();
        assert_eq!(hit.record.display_name, "ASUS PRIME B650-PLUS");
        assert_eq!(hit.category, "motherboards");
        assert_eq!(hit.stage, MatchStage::Substring);
    }

    #[test]
    fn longer_name_beats_its_prefix() {
        let cat = catalog();
        let hit = resolver().resolve(&cat, "price of amd ryzen 5 5600x").unwrap();
        assert_eq!(hit.record.display_name, "AMD Ryzen 5 5600X");
    }

    #[test]
    fn partial_name_resolves_without_fuzzy() {
        let cat = catalog();
        let hit = resolver().resolve(&cat, "price of RTX 4060").unwrap();
        assert_eq!(hit.record.display_name, "ASUS RTX 4060 OC");
        assert_ne!(hit.stage, MatchStage::Fuzzy);
    }

    #[test]
    fn exact_name_beats_longer_name_that_extends_it() {
        let cat = Catalog::empty().with_category(
            "gpus",
            vec![
                CatalogRecord::new("ASUS RTX 4060 OC", json!(19500)),
                CatalogRecord::new("ASUS RTX 4060", json!(18000)),
            ],
        );
        let hit = resolver().resolve(&cat, "ASUS RTX 4060").unwrap();
        assert_eq!(hit.record.display_name, "ASUS RTX 4060");
        assert_eq!(hit.stage, MatchStage::Substring);
    }

    #[test]
    fn typo_falls_through_to_fuzzy() {
        let cat = catalog();
        let hit = resolver().resolve(&cat, "saphire pulse rx7600xt").unwrap();
        assert_eq!(hit.record.display_name, "Sapphire Pulse RX 7600 XT");
        assert_eq!(hit.stage, MatchStage::Fuzzy);
    }

    #[test]
    fn unrelated_text_is_not_found() {
        let cat = catalog();
        assert!(resolver().resolve(&cat, "tell me a joke about penguins").is_none());
        assert!(resolver().resolve(&cat, "   ?!  ").is_none());
        assert!(resolver().resolve(&Catalog::empty(), "rtx 4060").is_none());
    }
}
