// Core structs: CatalogRecord, Catalog, BuildOption
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::normalizer::normalize_price;

pub const PRICE_KEY: &str = "price";

/// One hardware item as it appears in the catalog file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogRecord {
    #[serde(rename = "displayName", default)]
    pub display_name: String,
    #[serde(default)]
    pub brand: Option<String>,
    /// Every other field in file order, `price` included (socket, wattage, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl CatalogRecord {
    pub fn new(display_name: &str, price: Value) -> Self {
        Self {
            display_name: display_name.to_string(),
            brand: None,
            attributes: Map::from_iter([(PRICE_KEY.to_string(), price)]),
        }
    }

    pub fn with_brand(mut self, brand: &str) -> Self {
        self.brand = Some(brand.to_string());
        self
    }

    pub fn with_attribute(mut self, key: &str, value: Value) -> Self {
        self.attributes.insert(key.to_string(), value);
        self
    }

    /// Records without a display name never take part in matching or recommending.
    pub fn is_matchable(&self) -> bool {
        !self.display_name.trim().is_empty()
    }

    /// The price field exactly as the catalog stores it.
    pub fn raw_price(&self) -> Option<&Value> {
        self.attributes.get(PRICE_KEY)
    }

    /// Normalized price, or `None` when the field is missing or unparsable.
    pub fn price(&self) -> Option<f64> {
        self.raw_price().and_then(normalize_price)
    }

    /// Brand and display name joined, used for usage keyword checks.
    pub fn label(&self) -> String {
        match self.brand.as_deref().map(str::trim) {
            Some(brand) if !brand.is_empty() => format!("{} {}", brand, self.display_name),
            _ => self.display_name.clone(),
        }
    }
}

/// All records of one category, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub name: String,
    pub records: Vec<CatalogRecord>,
}

/// Immutable catalog snapshot. Category order is the order the loader saw them in.
#[derive(Debug, Clone)]
pub struct Catalog {
    groups: Vec<CategoryGroup>,
    pub loaded_at: DateTime<Utc>,
}

impl Catalog {
    pub fn new(groups: Vec<CategoryGroup>) -> Self {
        Self {
            groups,
            loaded_at: Utc::now(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Builder used mostly by tests and synthetic catalogs.
    pub fn with_category(mut self, name: &str, records: Vec<CatalogRecord>) -> Self {
        match self.groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.records.extend(records),
            None => self.groups.push(CategoryGroup {
                name: name.to_string(),
                records,
            }),
        }
        self
    }

    /// Time since this snapshot was built.
    pub fn age(&self) -> TimeDelta {
        Utc::now().signed_duration_since(self.loaded_at)
    }

    pub fn groups(&self) -> &[CategoryGroup] {
        &self.groups
    }

    pub fn category(&self, name: &str) -> &[CatalogRecord] {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .map(|g| g.records.as_slice())
            .unwrap_or(&[])
    }

    /// Every matchable record with its owning category, in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &CatalogRecord)> + '_ {
        self.groups.iter().flat_map(|g| {
            g.records
                .iter()
                .filter(|r| r.is_matchable())
                .map(move |r| (g.name.as_str(), r))
        })
    }

    /// All parsable prices of matchable records.
    pub fn prices(&self) -> Vec<f64> {
        self.entries().filter_map(|(_, r)| r.price()).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One slot of a build: the allocation category and what (if anything) fills it.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem<'a> {
    pub category: String,
    pub record: Option<&'a CatalogRecord>,
    pub price: f64,
}

impl<'a> LineItem<'a> {
    pub fn picked(category: &str, record: &'a CatalogRecord, price: f64) -> Self {
        Self {
            category: category.to_string(),
            record: Some(record),
            price,
        }
    }

    pub fn absent(category: &str) -> Self {
        Self {
            category: category.to_string(),
            record: None,
            price: 0.0,
        }
    }
}

/// A complete proposed build covering every allocation category.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOption<'a> {
    pub lines: Vec<LineItem<'a>>,
}

impl<'a> BuildOption<'a> {
    pub fn total(&self) -> f64 {
        self.lines.iter().map(|l| l.price).sum()
    }

    pub fn line(&self, category: &str) -> Option<&LineItem<'a>> {
        self.lines.iter().find(|l| l.category == category)
    }

    /// Two options are the same build when every slot holds the same record.
    pub fn same_picks(&self, other: &BuildOption<'_>) -> bool {
        self.lines.len() == other.lines.len()
            && self.lines.iter().zip(&other.lines).all(|(a, b)| {
                a.category == b.category
                    && match (a.record, b.record) {
                        (Some(x), Some(y)) => std::ptr::eq(x, y),
                        (None, None) => true,
                        _ => false,
                    }
            })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    #[error("price field is empty")]
    Empty,
    #[error("no numeric value in {0:?}")]
    NoDigits(String),
    #[error("price value is not a finite number")]
    NotFinite,
    #[error("unsupported price type: {0}")]
    UnsupportedType(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("catalog root must be a JSON object keyed by category")]
    NotAnObject,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid allocation table: {0}")]
    InvalidAllocation(String),
}

#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("responder unavailable")]
    Unavailable,
    #[error("generation failed: {0}")]
    Generation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_deserializes_with_open_attributes() {
        let record: CatalogRecord = serde_json::from_value(json!({
            "displayName": "ASUS PRIME B650-PLUS",
            "brand": "ASUS",
            "price": "₱9,500",
            "socket": "AM5",
            "memoryType": ["DDR5"]
        }))
        .unwrap();

        assert_eq!(record.display_name, "ASUS PRIME B650-PLUS");
        assert_eq!(record.price(), Some(9500.0));
        assert_eq!(record.attributes.get("socket"), Some(&json!("AM5")));
        assert!(!record.attributes.contains_key("displayName"));
        let keys: Vec<&str> = record.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["price", "socket", "memoryType"]);
    }

    #[test]
    fn record_without_name_is_not_matchable() {
        let record: CatalogRecord = serde_json::from_value(json!({ "price": 100 })).unwrap();
        assert!(!record.is_matchable());

        let catalog = Catalog::empty().with_category("cpus", vec![record]);
        assert_eq!(catalog.entries().count(), 0);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn total_counts_absent_slots_as_zero() {
        let cpu = CatalogRecord::new("Ryzen 5 5600", json!(5000));
        let option = BuildOption {
            lines: vec![
                LineItem::picked("cpus", &cpu, 5000.0),
                LineItem::absent("gpus"),
            ],
        };
        assert_eq!(option.total(), 5000.0);
        assert_eq!(option.line("gpus").map(|l| l.price), Some(0.0));
    }
}
