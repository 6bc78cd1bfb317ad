use crate::analyzer::PriceStats;
use crate::config::{Usage, UsageProfile};
use crate::model::Catalog;
use crate::normalizer::has_keyword;
use regex::{Captures, Regex};
use std::sync::LazyLock;

const AMOUNT: &str = r"(\d[\d,]*(?:\.\d+)?)";

// currency marker in front, optional k after
static MARKED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?:₱|\$|\bphp|\bp)\s*{AMOUNT}(\s*k\b)?")).expect("budget pattern")
});
static THOUSANDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(?i)\b{AMOUNT}(\s*k\b)")).expect("budget pattern"));
static PLAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\b{AMOUNT}\b")).expect("budget pattern"));

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BudgetSource {
    /// Amount written in the query.
    Explicit,
    /// Derived from catalog prices because the query had none.
    Estimated,
}

fn amount(caps: &Captures<'_>) -> Option<f64> {
    let digits = caps.get(1)?.as_str().replace(',', "");
    let mut value: f64 = digits.parse().ok()?;
    if caps.get(2).is_some() {
        value *= 1000.0;
    }
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Pulls a budget out of free text. Amounts with a currency marker or a `k`
/// suffix win over bare numbers.
pub fn extract_budget(text: &str) -> Option<f64> {
    [&*MARKED_RE, &*THOUSANDS_RE, &*PLAIN_RE]
        .into_iter()
        .find_map(|re| re.captures_iter(text).find_map(|caps| amount(&caps)))
}

/// Default budget: `multiplier` × the median price across the whole catalog.
pub fn default_budget(catalog: &Catalog, multiplier: f64) -> Option<f64> {
    PriceStats::for_catalog(catalog).map(|stats| stats.median * multiplier)
}

/// First profile whose trigger words appear in the text; otherwise `General`.
pub fn classify_usage(text: &str, profiles: &[UsageProfile]) -> Usage {
    profiles
        .iter()
        .find(|p| has_keyword(text, &p.triggers))
        .map(|p| p.usage)
        .unwrap_or(Usage::General)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecommenderConfig;
    use crate::model::CatalogRecord;
    use serde_json::json;

    #[test]
    fn reads_k_shorthand_and_currency() {
        assert_eq!(extract_budget("gaming build 30k"), Some(30000.0));
        assert_eq!(extract_budget("build for 1.5K"), Some(1500.0));
        assert_eq!(extract_budget("budget ₱45,000 for editing"), Some(45000.0));
        assert_eq!(extract_budget("around php 60000"), Some(60000.0));
        assert_eq!(extract_budget("P25,000 office pc"), Some(25000.0));
    }

    #[test]
    fn marked_amount_beats_model_number() {
        assert_eq!(extract_budget("rtx 4060 build under 50k"), Some(50000.0));
        assert_eq!(extract_budget("a pc with rtx 4060 for $900"), Some(900.0));
    }

    #[test]
    fn plain_number_is_last_resort() {
        assert_eq!(extract_budget("build me something for 35000"), Some(35000.0));
        assert_eq!(extract_budget("32gb ddr5 build"), None);
        assert_eq!(extract_budget("recommend a build"), None);
    }

    #[test]
    fn default_budget_is_scaled_median() {
        let catalog = Catalog::empty()
            .with_category("cpus", vec![CatalogRecord::new("A", json!(1000))])
            .with_category(
                "gpus",
                vec![
                    CatalogRecord::new("B", json!("3k")),
                    CatalogRecord::new("C", json!("n/a")),
                ],
            )
            .with_category("rams", vec![CatalogRecord::new("D", json!(2000))]);
        assert_eq!(default_budget(&catalog, 5.0), Some(10000.0));
        assert_eq!(default_budget(&Catalog::empty(), 5.0), None);
    }

    #[test]
    fn usage_comes_from_keywords() {
        let profiles = RecommenderConfig::default().usage_profiles;
        assert_eq!(classify_usage("Gaming build 30k", &profiles), Usage::Gaming);
        assert_eq!(classify_usage("workstation for rendering", &profiles), Usage::Productivity);
        assert_eq!(classify_usage("pc for school", &profiles), Usage::Office);
        assert_eq!(classify_usage("a build for 20k", &profiles), Usage::General);
    }
}
