//! Catalog-backed PC part lookup and budget build recommendations.
//!
//! The core is synchronous and works on an immutable [`model::Catalog`] snapshot:
//! [`resolver::NameResolver`] maps free text to one record, and
//! [`recommender::Recommender`] turns a budget query into 2-3 complete builds.
//! [`assistant::Assistant`] routes a raw query to either of them, or to an
//! external [`assistant::Responder`] when neither applies.

pub mod analyzer;
pub mod assistant;
pub mod config;
pub mod model;
pub mod normalizer;
pub mod recommender;
pub mod resolver;
pub mod storage;
pub mod utils;
