use crate::model::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Share of the budget given to one build slot.
#[derive(Debug, Clone, Deserialize)]
pub struct Allocation {
    pub category: String,
    pub fraction: f64,
    /// Catalog categories pooled into this slot; empty means just `category`.
    #[serde(default)]
    pub sources: Vec<String>,
}

impl Allocation {
    fn new(category: &str, fraction: f64, sources: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            fraction,
            sources: sources.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn source_categories(&self) -> Vec<&str> {
        if self.sources.is_empty() {
            vec![self.category.as_str()]
        } else {
            self.sources.iter().map(String::as_str).collect()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Usage {
    Gaming,
    Productivity,
    Office,
    General,
}

impl std::fmt::Display for Usage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Usage::Gaming => "gaming",
            Usage::Productivity => "productivity",
            Usage::Office => "office",
            Usage::General => "general",
        };
        f.write_str(name)
    }
}

/// Words that select a usage, and words in a part's label that earn the discount.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageProfile {
    pub usage: Usage,
    pub triggers: Vec<String>,
    #[serde(default)]
    pub boost_keywords: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub token_overlap_threshold: f64,
    pub fuzzy_cutoff: f64,
    pub fuzzy_max_candidates: usize,
    pub fallback_priority: Vec<String>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            token_overlap_threshold: 0.35,
            fuzzy_cutoff: 0.70,
            fuzzy_max_candidates: 3,
            fallback_priority: words(&[
                "motherboards", "cpus", "gpus", "rams", "storages", "psus", "coolers", "ssds",
                "nvmes", "hdds",
            ]),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    pub allocations: Vec<Allocation>,
    pub usage_profiles: Vec<UsageProfile>,
    pub pool_size: usize,
    pub usage_discount: f64,
    pub slack_fraction: f64,
    pub min_slack: f64,
    pub runaway_factor: f64,
    pub safeguard_categories: Vec<String>,
    pub anchor_categories: Vec<String>,
    pub default_budget_multiplier: f64,
    pub min_options: usize,
    pub max_options: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            allocations: vec![
                Allocation::new("motherboards", 0.10, &[]),
                Allocation::new("cpus", 0.25, &[]),
                Allocation::new("rams", 0.10, &[]),
                Allocation::new("storages", 0.06, &["storages", "ssds", "nvmes", "hdds"]),
                Allocation::new("coolers", 0.04, &[]),
                Allocation::new("gpus", 0.35, &[]),
                Allocation::new("psus", 0.06, &[]),
            ],
            usage_profiles: vec![
                UsageProfile {
                    usage: Usage::Gaming,
                    triggers: words(&["gaming", "game", "games", "gamer", "fps", "esports", "streaming"]),
                    boost_keywords: words(&["gaming", "xt", "rtx", "rog", "tuf", "aorus"]),
                },
                UsageProfile {
                    usage: Usage::Productivity,
                    triggers: words(&[
                        "productivity", "workstation", "editing", "rendering", "render", "cad",
                        "3d", "programming", "coding",
                    ]),
                    boost_keywords: words(&["workstation", "pro", "xeon", "threadripper"]),
                },
                UsageProfile {
                    usage: Usage::Office,
                    triggers: words(&["office", "home", "school", "browsing", "student"]),
                    boost_keywords: Vec::new(),
                },
            ],
            pool_size: 5,
            usage_discount: 0.85,
            slack_fraction: 0.05,
            min_slack: 500.0,
            runaway_factor: 1.25,
            safeguard_categories: words(&["gpus", "cpus"]),
            anchor_categories: words(&["cpus", "gpus", "rams", "motherboards"]),
            default_budget_multiplier: 5.0,
            min_options: 2,
            max_options: 3,
        }
    }
}

const ALLOCATION_EPSILON: f64 = 1e-6;

impl RecommenderConfig {
    /// Share of the budget no slot claims.
    pub fn headroom(&self) -> f64 {
        let sum: f64 = self.allocations.iter().map(|a| a.fraction).sum();
        (1.0 - sum).max(0.0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allocations.is_empty() {
            return Err(ConfigError::InvalidAllocation("no categories".into()));
        }
        if let Some(a) = self.allocations.iter().find(|a| !(a.fraction >= 0.0)) {
            return Err(ConfigError::InvalidAllocation(format!(
                "{} has negative fraction {}",
                a.category, a.fraction
            )));
        }
        // anything under 1.0 stays unallocated as headroom
        let sum: f64 = self.allocations.iter().map(|a| a.fraction).sum();
        if !(sum > 0.0 && sum <= 1.0 + ALLOCATION_EPSILON) {
            return Err(ConfigError::InvalidAllocation(format!(
                "fractions sum to {sum}, expected more than 0 and at most 1.0"
            )));
        }
        if self.min_options == 0 || self.min_options > self.max_options {
            return Err(ConfigError::InvalidAllocation(format!(
                "option bounds {}..={} are invalid",
                self.min_options, self.max_options
            )));
        }
        Ok(())
    }

    pub fn profile(&self, usage: Usage) -> Option<&UsageProfile> {
        self.usage_profiles.iter().find(|p| p.usage == usage)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub catalog_path: String,
    pub currency_symbol: String,
    pub fallback_message: String,
    pub matching: MatchConfig,
    pub recommender: RecommenderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: "Export/pc_database.json".to_string(),
            currency_symbol: "₱".to_string(),
            fallback_message: "I can only answer from the parts catalog right now. \
                Try asking for the price or specs of a specific component, or a build with a budget."
                .to_string(),
            matching: MatchConfig::default(),
            recommender: RecommenderConfig::default(),
        }
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.recommender.validate()?;
    Ok(config)
}
