// Storage module: catalog loading and the shared snapshot.

pub mod catalog_file;

pub use catalog_file::{CatalogStore, load_catalog, parse_catalog};
