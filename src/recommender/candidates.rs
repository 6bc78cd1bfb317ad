use crate::config::Allocation;
use crate::model::{Catalog, CatalogRecord};
use crate::normalizer::has_keyword;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct PoolEntry<'a> {
    pub record: &'a CatalogRecord,
    pub price: f64,
    pub score: f64,
}

/// Ranked candidates for one allocation slot, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct Pool<'a> {
    pub category: String,
    pub target: f64,
    pub entries: Vec<PoolEntry<'a>>,
}

impl<'a> Pool<'a> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The i-th ranked entry, or the top entry when the pool is shorter.
    pub fn pick(&self, rank: usize) -> Option<&PoolEntry<'a>> {
        self.entries.get(rank).or_else(|| self.entries.first())
    }

    pub fn cheapest(&self) -> Option<&PoolEntry<'a>> {
        self.entries.iter().min_by(|a, b| a.price.total_cmp(&b.price))
    }

    /// Cheapest entry strictly under `price`.
    pub fn cheapest_below(&self, price: f64) -> Option<&PoolEntry<'a>> {
        self.cheapest().filter(|e| e.price < price)
    }
}

/// Knobs for ranking one slot.
#[derive(Debug, Clone, Copy)]
pub struct Scoring<'k> {
    pub pool_size: usize,
    pub usage_discount: f64,
    pub boost_keywords: &'k [String],
}

/// Distance of `price` from `target`, relative to the target.
pub fn price_score(price: f64, target: f64) -> f64 {
    (price - target).abs() / target.max(1.0)
}

/// Ranks every priced, matchable record of the slot's source categories by
/// closeness to the slot's share of the budget.
pub fn build_pool<'a>(
    catalog: &'a Catalog,
    allocation: &Allocation,
    budget: f64,
    scoring: &Scoring<'_>,
) -> Pool<'a> {
    let target = budget * allocation.fraction;

    let mut entries: Vec<PoolEntry<'a>> = allocation
        .source_categories()
        .into_iter()
        .flat_map(|c| catalog.category(c))
        .filter(|r| r.is_matchable())
        .filter_map(|record| {
            let price = record.price()?;
            let mut score = price_score(price, target);
            if has_keyword(&record.label(), scoring.boost_keywords) {
                score *= scoring.usage_discount;
            }
            Some(PoolEntry {
                record,
                price,
                score,
            })
        })
        .collect();

    entries.sort_by(|a, b| match a.score.total_cmp(&b.score) {
        Ordering::Equal => a.price.total_cmp(&b.price),
        other => other,
    });
    entries.truncate(scoring.pool_size);

    Pool {
        category: allocation.category.clone(),
        target,
        entries,
    }
}
