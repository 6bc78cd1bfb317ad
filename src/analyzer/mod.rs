// Analyzer module: price statistics over the catalog and category guessing.

pub mod category_guess;
pub mod price_stats;

pub use category_guess::guess_category;
pub use price_stats::{PriceStats, estimate_range};
