// Assistant module: routes a query to the resolver, the recommender or the responder.

pub mod responder;
pub mod spec_sheet;

use crate::analyzer::price_stats::{EstimateScope, PriceEstimate};
use crate::analyzer::{estimate_range, guess_category};
use crate::config::AppConfig;
use crate::model::{Catalog, CatalogRecord};
use crate::normalizer::format_price;
use crate::recommender::{BuildSet, Recommendation, Recommender};
use crate::resolver::NameResolver;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{info, warn};

pub use responder::{OfflineResponder, Responder};
pub use spec_sheet::{SpecRow, spec_rows};

static SPECS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(specs|specifications|spec|details|configuration)\b").expect("specs pattern")
});
static BUILD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(build|builds|recommend|recommendation|setup|rig|budget)\b")
        .expect("build pattern")
});
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(price|prices|how much|cost|costs)\b").expect("price pattern")
});

#[derive(Debug, Clone, PartialEq)]
pub enum Answer<'a> {
    Empty,
    Specs {
        category: &'a str,
        record: &'a CatalogRecord,
        rows: Vec<SpecRow>,
    },
    Price {
        category: &'a str,
        record: &'a CatalogRecord,
        price: Option<f64>,
    },
    PriceEstimate(PriceEstimate),
    NoPriceData,
    Builds(BuildSet<'a>),
    CannotRecommend {
        reason: String,
    },
    Generated(String),
    ResponderFailed(String),
}

pub struct Assistant {
    resolver: NameResolver,
    recommender: Recommender,
    responder: Arc<dyn Responder>,
}

impl Assistant {
    pub fn new(config: &AppConfig, responder: Arc<dyn Responder>) -> Self {
        Self {
            resolver: NameResolver::new(&config.matching),
            recommender: Recommender::new(config.recommender.clone()),
            responder,
        }
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    /// Answers from the catalog alone; `None` means the responder should take it.
    pub fn answer_from_catalog<'a>(&self, catalog: &'a Catalog, query: &str) -> Option<Answer<'a>> {
        let query = query.trim();
        if query.is_empty() {
            return Some(Answer::Empty);
        }

        if SPECS_RE.is_match(query) {
            if let Some(hit) = self.resolver.resolve(catalog, query) {
                return Some(Answer::Specs {
                    category: hit.category,
                    record: hit.record,
                    rows: spec_rows(hit.record),
                });
            }
            info!("Specs requested but nothing resolved, falling through");
        }

        if BUILD_RE.is_match(query) {
            return Some(match self.recommender.recommend(catalog, query) {
                Recommendation::Builds(set) => Answer::Builds(set),
                Recommendation::CannotRecommend { reason } => Answer::CannotRecommend { reason },
            });
        }

        if PRICE_RE.is_match(query) {
            if let Some(hit) = self.resolver.resolve(catalog, query) {
                info!(
                    "Found item {} in category {}, price field={:?}",
                    hit.record.display_name, hit.category, hit.record.raw_price()
                );
                return Some(Answer::Price {
                    category: hit.category,
                    record: hit.record,
                    price: hit.record.price(),
                });
            }
            let guess = guess_category(query);
            info!("Guessed category: {:?}", guess.as_ref().map(|g| g.category));
            return Some(match estimate_range(catalog, guess.as_ref()) {
                Some(estimate) => Answer::PriceEstimate(estimate),
                None => Answer::NoPriceData,
            });
        }

        None
    }

    pub async fn answer<'a>(&self, catalog: &'a Catalog, query: &str) -> Answer<'a> {
        if let Some(answer) = self.answer_from_catalog(catalog, query) {
            return answer;
        }
        info!("Handing query to responder");
        match self.responder.generate(query.trim()).await {
            Ok(text) => Answer::Generated(text.trim().to_string()),
            Err(e) => {
                warn!("Responder failed: {}", e);
                Answer::ResponderFailed(e.to_string())
            }
        }
    }
}

fn record_title(record: &CatalogRecord) -> &str {
    &record.display_name
}

impl Answer<'_> {
    /// Plain-text rendering for terminals and logs.
    pub fn to_text(&self, symbol: &str) -> String {
        match self {
            Answer::Empty => "No question provided".to_string(),
            Answer::Specs { record, rows, .. } => {
                let mut out = format!("{} Specifications:\n", record_title(record));
                let width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
                for row in rows {
                    out.push_str(&format!("  {:<width$}  {}\n", row.label, row.value));
                }
                out.trim_end().to_string()
            }
            Answer::Price {
                record,
                price: Some(p),
                ..
            } => format!("The price for {} is {}.", record_title(record), format_price(*p, symbol)),
            Answer::Price { .. } => {
                "I don't have a price listed for that component in the catalog.".to_string()
            }
            Answer::PriceEstimate(est) => {
                let scope = match &est.scope {
                    EstimateScope::Category(c) => format!("similar {}", c),
                    EstimateScope::WholeCatalog => "the catalog".to_string(),
                };
                format!(
                    "I don't have that exact product. Based on {}, an estimated price range is {} to {}.",
                    scope,
                    format_price(est.min, symbol),
                    format_price(est.max, symbol)
                )
            }
            Answer::NoPriceData => "I don't have enough pricing data to estimate a range. \
                Try asking with the exact product name."
                .to_string(),
            Answer::Builds(set) => {
                let mut out = format!(
                    "Budget {} ({}), {} options:",
                    format_price(set.budget, symbol),
                    set.usage,
                    set.options.len()
                );
                for (i, option) in set.options.iter().enumerate() {
                    out.push_str(&format!("\n\nOption {}:", i + 1));
                    for line in &option.lines {
                        let name = line.record.map(record_title).unwrap_or("(none available)");
                        out.push_str(&format!(
                            "\n  {:<13} {} - {}",
                            line.category,
                            name,
                            format_price(line.price, symbol)
                        ));
                    }
                    out.push_str(&format!("\n  Total: {}", format_price(option.total(), symbol)));
                }
                out
            }
            Answer::CannotRecommend { reason } => reason.clone(),
            Answer::Generated(text) => text.clone(),
            Answer::ResponderFailed(e) => format!("Model call failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResponderError;
    use async_trait::async_trait;
    use serde_json::json;

    struct FailingResponder;

    #[async_trait]
    impl Responder for FailingResponder {
        async fn generate(&self, _prompt: &str) -> Result<String, ResponderError> {
            Err(ResponderError::Generation("quota exceeded".into()))
        }
    }

    fn catalog() -> Catalog {
        Catalog::empty()
            .with_category(
                "gpus",
                vec![
                    CatalogRecord::new("ASUS RTX 4060 OC", json!("19,000"))
                        .with_brand("ASUS")
                        .with_attribute("vram", json!("8GB")),
                    CatalogRecord::new("Zotac RTX 4070", json!(33000)),
                ],
            )
            .with_category(
                "cpus",
                vec![
                    CatalogRecord::new("Ryzen 5 5600", json!(5000)),
                    CatalogRecord::new("Ryzen 7 5700X", json!("TBA")),
                ],
            )
    }

    fn assistant() -> Assistant {
        let cfg = AppConfig::default();
        Assistant::new(&cfg, Arc::new(OfflineResponder::new(cfg.fallback_message.clone())))
    }

    #[test]
    fn price_question_resolves_record() {
        let cat = catalog();
        match assistant().answer_from_catalog(&cat, "price of RTX 4060") {
            Some(Answer::Price { record, price, category }) => {
                assert_eq!(record.display_name, "ASUS RTX 4060 OC");
                assert_eq!(category, "gpus");
                assert_eq!(price, Some(19000.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unparsable_price_is_reported_not_fatal() {
        let cat = catalog();
        let answer = assistant().answer_from_catalog(&cat, "how much is the ryzen 7 5700x").unwrap();
        assert!(matches!(answer, Answer::Price { price: None, .. }));
        assert!(answer.to_text("₱").contains("don't have a price"));
    }

    #[test]
    fn unknown_product_gets_range_estimate() {
        let cat = catalog();
        let answer = assistant().answer_from_catalog(&cat, "how much is a radeon 9070").unwrap();
        assert_eq!(
            answer,
            Answer::PriceEstimate(PriceEstimate {
                scope: EstimateScope::Category("gpus".into()),
                min: 19000.0,
                max: 33000.0,
            })
        );
        assert_eq!(
            answer.to_text("₱"),
            "I don't have that exact product. Based on similar gpus, an estimated price range is ₱19,000 to ₱33,000."
        );
    }

    #[test]
    fn specs_question_lists_attributes() {
        let cat = catalog();
        let answer = assistant().answer_from_catalog(&cat, "specs of asus rtx 4060 oc").unwrap();
        let Answer::Specs { rows, .. } = &answer else {
            panic!("expected specs, got {answer:?}");
        };
        assert!(rows.iter().any(|r| r.label == "Vram" && r.value == "8GB"));
        assert!(answer.to_text("₱").starts_with("ASUS RTX 4060 OC Specifications:"));
    }

    #[test]
    fn build_question_goes_to_recommender() {
        let cat = catalog();
        let answer = assistant().answer_from_catalog(&cat, "gaming build 30k").unwrap();
        let Answer::Builds(set) = &answer else {
            panic!("expected builds, got {answer:?}");
        };
        assert_eq!(set.budget, 30000.0);
        assert!((2..=3).contains(&set.options.len()));
        assert!(answer.to_text("₱").contains("Total: ₱"));
    }

    #[test]
    fn build_on_empty_catalog_explains_why() {
        let cat = Catalog::empty();
        match assistant().answer_from_catalog(&cat, "recommend a build for 40k") {
            Some(Answer::CannotRecommend { reason }) => assert!(!reason.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn open_questions_go_to_responder() {
        let cat = catalog();
        let assistant = assistant();
        assert!(assistant.answer_from_catalog(&cat, "what is a motherboard?").is_none());
        match assistant.answer(&cat, "what is a motherboard?").await {
            Answer::Generated(text) => assert_eq!(text, AppConfig::default().fallback_message),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(assistant.answer(&cat, "   ").await, Answer::Empty);
    }

    #[tokio::test]
    async fn responder_failure_is_an_answer() {
        let cat = catalog();
        let assistant = Assistant::new(&AppConfig::default(), Arc::new(FailingResponder));
        let answer = assistant.answer(&cat, "is pcie 5 worth it").await;
        assert_eq!(answer, Answer::ResponderFailed("generation failed: quota exceeded".into()));
    }
}
