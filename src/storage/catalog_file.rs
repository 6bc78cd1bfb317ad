use crate::model::{Catalog, CatalogError, CatalogRecord, CategoryGroup};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Reads a catalog file: a JSON object whose array-valued keys are categories.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let catalog = parse_catalog(&content)?;
    info!(
        "Loaded component catalog from {} ({} categories, {} records)",
        path.display(),
        catalog.groups().len(),
        catalog.len()
    );
    Ok(catalog)
}

/// Parses catalog JSON. Key order is kept as catalog order; non-array keys
/// and entries that are not records are skipped.
pub fn parse_catalog(content: &str) -> Result<Catalog, CatalogError> {
    let root: Value = serde_json::from_str(content)?;
    let Value::Object(map) = root else {
        return Err(CatalogError::NotAnObject);
    };

    let mut groups = Vec::new();
    for (category, items) in map {
        let Value::Array(items) = items else {
            continue;
        };
        let mut records = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<CatalogRecord>(item) {
                Ok(record) => {
                    if !record.is_matchable() {
                        warn!("Record {} in {} has no displayName", i, category);
                    }
                    records.push(record);
                }
                Err(e) => warn!("Skipping entry {} in {}: {}", i, category, e),
            }
        }
        groups.push(CategoryGroup {
            name: category,
            records,
        });
    }
    Ok(Catalog::new(groups))
}

/// Holds the current catalog snapshot. Readers clone the `Arc` and keep using
/// it; a reload replaces the pointer and never touches the old snapshot.
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Swaps in `catalog` and returns the snapshot it replaced.
    pub fn install(&self, catalog: Catalog) -> Arc<Catalog> {
        let fresh = Arc::new(catalog);
        let loaded_at = fresh.loaded_at;
        let previous = match self.current.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, fresh),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), fresh),
        };
        info!(
            "Installed catalog snapshot loaded at {}, replacing one {}s old",
            loaded_at.format("%Y-%m-%d %H:%M:%S"),
            previous.age().num_seconds()
        );
        previous
    }

    /// Loads `path` and swaps it in; on error the current snapshot stays.
    pub fn reload(&self, path: impl AsRef<Path>) -> Result<Arc<Catalog>, CatalogError> {
        let catalog = load_catalog(path)?;
        self.install(catalog);
        Ok(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": 3,
        "gpus": [
            { "displayName": "ASUS RTX 4060 OC", "brand": "ASUS", "price": "19,000", "vram": 8 },
            "not a record"
        ],
        "cpus": [
            { "displayName": "Ryzen 5 5600", "price": 5000, "socket": "AM4" },
            { "price": 100 }
        ]
    }"#;

    #[test]
    fn keeps_file_order_and_skips_junk() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        let names: Vec<&str> = catalog.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["gpus", "cpus"]);
        assert_eq!(catalog.category("gpus").len(), 1);
        assert_eq!(catalog.category("cpus").len(), 2);
        assert_eq!(catalog.entries().count(), 2);
        assert_eq!(catalog.category("gpus")[0].price(), Some(19000.0));
    }

    #[test]
    fn install_hands_back_the_replaced_snapshot() {
        let store = CatalogStore::new(Catalog::empty().with_category("cpus", Vec::new()));
        let first = store.snapshot();
        let replaced = store.install(parse_catalog(SAMPLE).unwrap());

        assert!(Arc::ptr_eq(&first, &replaced));
        assert!(replaced.age().num_milliseconds() >= 0);
        assert!(store.snapshot().loaded_at >= replaced.loaded_at);
    }

    #[test]
    fn rejects_non_object_root() {
        assert!(matches!(parse_catalog("[1, 2]"), Err(CatalogError::NotAnObject)));
        assert!(matches!(parse_catalog("{ nope"), Err(CatalogError::Json(_))));
    }

    #[test]
    fn reload_swaps_snapshot_without_touching_readers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pc_database.json");
        fs::write(&path, SAMPLE).unwrap();

        let store = CatalogStore::new(Catalog::empty());
        let before = store.snapshot();
        let fresh = store.reload(&path).unwrap();

        assert!(before.is_empty());
        assert_eq!(store.snapshot().entries().count(), 2);
        assert!(Arc::ptr_eq(&fresh, &store.snapshot()));
        assert!(fresh.loaded_at >= before.loaded_at);

        assert!(store.reload(dir.path().join("missing.json")).is_err());
        assert_eq!(store.snapshot().entries().count(), 2);
    }
}
