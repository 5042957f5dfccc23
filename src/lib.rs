#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Package catalog trait and the in-memory backend.
pub mod catalog;
/// Recommender configuration types.
pub mod config;
/// Centralized constants used across profiles, strategies, and evaluation.
pub mod constants;
/// Scored item sets and recommendation results.
pub mod data;
/// Holdout cross-validation harness and reports.
pub mod evaluation;
/// Reusable example runners shared by the demo binaries.
pub mod example_apps;
/// Search index trait, term classes, and the in-memory backend.
pub mod index;
/// Confusion counts and the evaluation metric set.
pub mod metrics;
/// User profiles: construction, reduction, and term extraction.
pub mod profile;
/// The recommendation façade tying strategies to index handles.
pub mod recommender;
/// Recommendation strategies and their selection keys.
pub mod strategy;
/// Shared type aliases.
pub mod types;

mod errors;

pub use catalog::{CatalogEntry, MemoryCatalog, PackageCatalog};
pub use config::{RecommenderConfig, Weighting};
pub use data::{ItemScore, RecommendationResult};
pub use errors::RecommenderError;
pub use evaluation::{CrossValidation, CrossValidationReport, EvaluationSplit, MetricColumn};
pub use index::{MemoryIndex, RelevanceSet, SearchHit, SearchIndex, TermClass, TermWeight};
pub use metrics::{ConfusionCounts, Metric};
pub use profile::{ContentKind, UserProfile};
pub use recommender::Recommender;
pub use strategy::{Strategy, StrategyKind};
pub use types::{DemographicTag, DocId, ItemId, Term, UserId};
