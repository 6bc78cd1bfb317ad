use crate::analyzer::category_guess::CategoryGuess;
use crate::model::Catalog;
use crate::utils::median;
use tracing::info;

/// Basic statistics over a set of prices.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub std_dev: f64,
    pub median: f64,
}

impl PriceStats {
    /// Non-positive prices are ignored; `None` when nothing is left.
    pub fn from_prices(prices: &[f64]) -> Option<Self> {
        let prices: Vec<f64> = prices.iter().copied().filter(|&p| p > 0.0).collect();
        if prices.is_empty() {
            return None;
        }
        let count = prices.len() as f64;
        let avg = prices.iter().sum::<f64>() / count;
        let std_dev = (prices.iter().map(|p| (p - avg).powi(2)).sum::<f64>() / count).sqrt();

        Some(Self {
            count: prices.len(),
            min: prices.iter().copied().fold(f64::INFINITY, f64::min),
            max: prices.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            avg,
            std_dev,
            median: median(&prices)?,
        })
    }

    pub fn for_categories(catalog: &Catalog, categories: &[&str]) -> Option<Self> {
        let prices: Vec<f64> = categories
            .iter()
            .flat_map(|c| catalog.category(c))
            .filter(|r| r.is_matchable())
            .filter_map(|r| r.price())
            .collect();
        Self::from_prices(&prices)
    }

    pub fn for_catalog(catalog: &Catalog) -> Option<Self> {
        Self::from_prices(&catalog.prices())
    }
}

/// Where a price range estimate came from.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimateScope {
    Category(String),
    WholeCatalog,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceEstimate {
    pub scope: EstimateScope,
    pub min: f64,
    pub max: f64,
}

/// Min/max price for a guessed category, widening to its related categories
/// and then to the whole catalog when there is no data.
pub fn estimate_range(catalog: &Catalog, guess: Option<&CategoryGuess>) -> Option<PriceEstimate> {
    if let Some(guess) = guess {
        let stats = PriceStats::for_categories(catalog, &[guess.category])
            .or_else(|| PriceStats::for_categories(catalog, guess.related));
        if let Some(stats) = stats {
            info!("Estimated {} range from {} prices", guess.category, stats.count);
            return Some(PriceEstimate {
                scope: EstimateScope::Category(guess.category.to_string()),
                min: stats.min,
                max: stats.max,
            });
        }
    }

    PriceStats::for_catalog(catalog).map(|stats| PriceEstimate {
        scope: EstimateScope::WholeCatalog,
        min: stats.min,
        max: stats.max,
    })
}
