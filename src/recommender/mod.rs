// Recommender module: turns a budget query into 2-3 complete builds.

pub mod assembly;
pub mod budget;
pub mod candidates;

use crate::config::{RecommenderConfig, Usage};
use crate::model::{BuildOption, Catalog};
use assembly::{assemble_option, cap_runaway, dedupe, fit_to_budget};
use budget::{classify_usage, default_budget, extract_budget};
use candidates::{Pool, Scoring, build_pool};
use tracing::{info, warn};

pub use budget::BudgetSource;

/// Builds produced for one query.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSet<'a> {
    pub budget: f64,
    pub budget_source: BudgetSource,
    pub usage: Usage,
    /// Budget plus slack; options at or under this are accepted as-is.
    pub limit: f64,
    pub options: Vec<BuildOption<'a>>,
    /// Set when fewer distinct builds existed than the minimum and one was repeated.
    pub duplicated: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation<'a> {
    Builds(BuildSet<'a>),
    CannotRecommend { reason: String },
}

impl<'a> Recommendation<'a> {
    fn cannot(reason: &str) -> Self {
        Recommendation::CannotRecommend {
            reason: reason.to_string(),
        }
    }
}

pub struct Recommender {
    cfg: RecommenderConfig,
}

impl Recommender {
    pub fn new(cfg: RecommenderConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.cfg
    }

    /// Accepted overshoot for a given budget.
    pub fn slack(&self, budget: f64) -> f64 {
        (budget * self.cfg.slack_fraction).max(self.cfg.min_slack)
    }

    pub fn recommend<'a>(&self, catalog: &'a Catalog, text: &str) -> Recommendation<'a> {
        let (budget, budget_source) = match extract_budget(text) {
            Some(b) => (b, BudgetSource::Explicit),
            None => match default_budget(catalog, self.cfg.default_budget_multiplier) {
                Some(b) if b > 0.0 => (b, BudgetSource::Estimated),
                _ => {
                    warn!("No budget in query and no catalog prices to estimate one");
                    return Recommendation::cannot(
                        "There isn't enough pricing data to estimate a budget. \
                         Try including an amount, for example \"gaming build 30k\".",
                    );
                }
            },
        };
        let usage = classify_usage(text, &self.cfg.usage_profiles);
        info!("Recommending builds: budget={:.0} ({:?}), usage={}", budget, budget_source, usage);

        let pools = self.build_pools(catalog, budget, usage);
        if pools.iter().all(Pool::is_empty) {
            warn!("No priced candidates in any allocation category");
            return Recommendation::cannot(
                "The catalog has no priced components to build from right now.",
            );
        }

        let limit = budget + self.slack(budget);
        let ceiling = budget * self.cfg.runaway_factor;
        let count = self.option_count(&pools);

        let options: Vec<BuildOption<'a>> = (0..count)
            .map(|rank| {
                let mut option = assemble_option(&pools, rank);
                let swaps = fit_to_budget(&mut option, &pools, limit);
                cap_runaway(&mut option, &pools, ceiling, &self.cfg.safeguard_categories);
                info!("Option {}: total {:.0} after {} downgrades", rank + 1, option.total(), swaps);
                option
            })
            .collect();

        let mut options = dedupe(options);
        let duplicated = options.len() < self.cfg.min_options;
        if duplicated {
            warn!(
                "Only {} distinct build(s), repeating to reach {}",
                options.len(),
                self.cfg.min_options
            );
            if let Some(first) = options.first().cloned() {
                options.resize(self.cfg.min_options, first);
            }
        }

        Recommendation::Builds(BuildSet {
            budget,
            budget_source,
            usage,
            limit,
            options,
            duplicated,
        })
    }

    /// One ranked pool per allocation slot, in allocation-table order.
    pub fn build_pools<'a>(&self, catalog: &'a Catalog, budget: f64, usage: Usage) -> Vec<Pool<'a>> {
        let boost: &[String] = self
            .cfg
            .profile(usage)
            .map(|p| p.boost_keywords.as_slice())
            .unwrap_or(&[]);
        let scoring = Scoring {
            pool_size: self.cfg.pool_size,
            usage_discount: self.cfg.usage_discount,
            boost_keywords: boost,
        };

        self.cfg
            .allocations
            .iter()
            .map(|allocation| {
                let pool = build_pool(catalog, allocation, budget, &scoring);
                info!(
                    "Pool {}: target {:.0}, {} candidates",
                    pool.category,
                    pool.target,
                    pool.len()
                );
                pool
            })
            .collect()
    }

    /// min(max_options, max(min_options, largest anchor pool)).
    pub fn option_count(&self, pools: &[Pool<'_>]) -> usize {
        let largest = pools
            .iter()
            .filter(|p| self.cfg.anchor_categories.contains(&p.category))
            .map(Pool::len)
            .max()
            .unwrap_or(0);
        largest.max(self.cfg.min_options).min(self.cfg.max_options)
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(RecommenderConfig::default())
    }
}
