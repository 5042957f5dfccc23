use thiserror::Error;

use crate::types::ItemId;

/// Error type for catalog lookups, index queries, and configuration failures.
#[derive(Debug, Error)]
pub enum RecommenderError {
    #[error("item '{item}' is unknown to the package catalog")]
    CatalogLookup { item: ItemId },
    #[error("search index query failed: {0}")]
    IndexQuery(String),
    #[error("strategy '{0}' is not supported")]
    UnsupportedStrategy(String),
    #[error("configuration error: {0}")]
    Configuration(String),
}
