use std::fmt;
use std::str::FromStr;

use crate::constants::{collaborative, profile};
use crate::errors::RecommenderError;
use crate::strategy::StrategyKind;

/// Term weighting scheme applied by ranked retrieval.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Weighting {
    /// Okapi BM25 weighting.
    #[default]
    Bm25,
    /// Traditional probabilistic weighting.
    Trad,
}

impl Weighting {
    /// Canonical option string for this scheme.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Weighting::Bm25 => "bm25",
            Weighting::Trad => "trad",
        }
    }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weighting {
    type Err = RecommenderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "bm25" => Ok(Weighting::Bm25),
            "trad" => Ok(Weighting::Trad),
            other => Err(RecommenderError::Configuration(format!(
                "unknown weighting scheme '{other}'"
            ))),
        }
    }
}

/// Top-level recommender configuration.
#[derive(Clone, Debug)]
pub struct RecommenderConfig {
    /// Strategy selected when building a recommender from configuration.
    pub strategy: StrategyKind,
    /// Weighting scheme applied to every ranked query.
    pub weighting: Weighting,
    /// Number of expansion terms drawn for content profiles.
    pub profile_size: usize,
    /// Neighborhood size (k) for collaborative retrieval.
    pub neighbours: usize,
    /// Number of items requested from a live recommendation.
    pub result_size: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            // The cheapest strategy is the default one.
            strategy: StrategyKind::Content,
            weighting: Weighting::Bm25,
            profile_size: profile::DEFAULT_PROFILE_SIZE,
            neighbours: collaborative::DEFAULT_NEIGHBOURS,
            result_size: profile::DEFAULT_RESULT_SIZE,
        }
    }
}

impl RecommenderConfig {
    /// Reject sizes that would make every strategy degenerate.
    pub fn validate(&self) -> Result<(), RecommenderError> {
        if self.profile_size == 0 {
            return Err(RecommenderError::Configuration(
                "profile_size must be at least 1".into(),
            ));
        }
        if self.neighbours == 0 {
            return Err(RecommenderError::Configuration(
                "neighbours must be at least 1".into(),
            ));
        }
        if self.result_size == 0 {
            return Err(RecommenderError::Configuration(
                "result_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
