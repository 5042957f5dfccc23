//! Recommendation strategies: content-based retrieval and collaborative
//! neighbor expansion.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, error};

use crate::config::RecommenderConfig;
use crate::constants::terms::PACKAGE_PREFIX;
use crate::data::{ItemScore, RecommendationResult};
use crate::errors::RecommenderError;
use crate::index::{RelevanceSet, TermClass};
use crate::profile::{ContentKind, UserProfile};
use crate::recommender::Recommender;
use crate::types::Term;

/// Strategy selection key, spelled as the configuration option strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyKind {
    /// `cb`: content-based over tags and description keywords.
    Content,
    /// `cbt`: content-based over tag terms only.
    ContentTag,
    /// `cbd`: content-based over description keywords only.
    ContentDescription,
    /// `col`: collaborative over the clustered user index.
    Collaborative,
    /// `colu`: collaborative over the full user index.
    CollaborativeUnclustered,
    /// `demo`: demographic (not supported).
    Demographic,
    /// `knowledge`: knowledge-based (not supported).
    KnowledgeBased,
    /// `reputation`: item reputation (not supported).
    ItemReputation,
}

impl StrategyKind {
    /// Canonical option string for this kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Content => "cb",
            StrategyKind::ContentTag => "cbt",
            StrategyKind::ContentDescription => "cbd",
            StrategyKind::Collaborative => "col",
            StrategyKind::CollaborativeUnclustered => "colu",
            StrategyKind::Demographic => "demo",
            StrategyKind::KnowledgeBased => "knowledge",
            StrategyKind::ItemReputation => "reputation",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = RecommenderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cb" => Ok(StrategyKind::Content),
            "cbt" => Ok(StrategyKind::ContentTag),
            "cbd" => Ok(StrategyKind::ContentDescription),
            "col" => Ok(StrategyKind::Collaborative),
            "colu" => Ok(StrategyKind::CollaborativeUnclustered),
            "demo" => Ok(StrategyKind::Demographic),
            "knowledge" => Ok(StrategyKind::KnowledgeBased),
            "reputation" => Ok(StrategyKind::ItemReputation),
            other => Err(RecommenderError::Configuration(format!(
                "unknown strategy option '{other}'"
            ))),
        }
    }
}

/// A runnable recommendation strategy.
///
/// Both variants share one `run` contract: produce a ranked result sized to
/// the caller's budget, or an empty result after a logged index failure.
#[derive(Clone, Debug, PartialEq)]
pub enum Strategy {
    /// Ranked retrieval over the user's extracted term profile.
    ContentBased {
        /// Profile content drawn from tags, descriptions, or both.
        content: ContentKind,
        /// Number of expansion terms in the query profile.
        profile_size: usize,
    },
    /// Nearest-user search plus package-term expansion.
    Collaborative {
        /// Neighborhood size (k).
        neighbours: usize,
        /// Query the pre-clustered user index instead of the full one.
        clustering: bool,
    },
}

impl Strategy {
    /// Build the strategy for a selection key.
    ///
    /// Unsupported kinds fail here, never at run time.
    pub fn from_kind(
        kind: StrategyKind,
        config: &RecommenderConfig,
    ) -> Result<Self, RecommenderError> {
        match kind {
            StrategyKind::Content => Ok(Strategy::ContentBased {
                content: ContentKind::Full,
                profile_size: config.profile_size,
            }),
            StrategyKind::ContentTag => Ok(Strategy::ContentBased {
                content: ContentKind::Tag,
                profile_size: config.profile_size,
            }),
            StrategyKind::ContentDescription => Ok(Strategy::ContentBased {
                content: ContentKind::Description,
                profile_size: config.profile_size,
            }),
            StrategyKind::Collaborative => Ok(Strategy::Collaborative {
                neighbours: config.neighbours,
                clustering: true,
            }),
            StrategyKind::CollaborativeUnclustered => Ok(Strategy::Collaborative {
                neighbours: config.neighbours,
                clustering: false,
            }),
            unsupported => Err(RecommenderError::UnsupportedStrategy(
                unsupported.as_str().to_string(),
            )),
        }
    }

    /// Human-readable strategy family name.
    pub fn description(&self) -> &'static str {
        match self {
            Strategy::ContentBased { .. } => "Content-based",
            Strategy::Collaborative { .. } => "Collaborative",
        }
    }

    /// Produce a recommendation for `user`, sized to `size`.
    ///
    /// Index failures surface as an empty result after an error log, so
    /// batch evaluation keeps running; callers must treat an empty result
    /// as a failed run, not as "nothing to recommend".
    pub fn run(&self, rec: &Recommender, user: &UserProfile, size: usize) -> RecommendationResult {
        match *self {
            Strategy::ContentBased {
                content,
                profile_size,
            } => content_based(rec, user, content, profile_size, size),
            Strategy::Collaborative {
                neighbours,
                clustering,
            } => collaborative(rec, user, neighbours, clustering, size),
        }
    }
}

/// Query the item index with the user's term profile, excluding the user's
/// own items at match time so the result fills with next-best candidates.
fn content_based(
    rec: &Recommender,
    user: &UserProfile,
    content: ContentKind,
    profile_size: usize,
    size: usize,
) -> RecommendationResult {
    let profile = match user.profile(rec.items_index(), content, profile_size) {
        Ok(profile) => profile,
        Err(err) => {
            error!("[apprec:strategy] content-based strategy: {err}");
            return RecommendationResult::empty();
        }
    };
    let not_installed = |item: &str| !user.has_item(item);
    match rec
        .items_index()
        .query(&profile, rec.weighting(), size, Some(&not_installed))
    {
        Ok(hits) => {
            let mut item_score = ItemScore::new();
            for hit in hits {
                item_score.insert(hit.item, hit.weight);
            }
            RecommendationResult::new(item_score)
        }
        Err(err) => {
            error!("[apprec:strategy] content-based strategy: {err}");
            RecommendationResult::empty()
        }
    }
}

/// Find the k most similar users, then expand their documents into
/// package-class terms. Candidate items are never inspected for content;
/// relevance comes purely from co-installation.
fn collaborative(
    rec: &Recommender,
    user: &UserProfile,
    neighbours: usize,
    clustering: bool,
    size: usize,
) -> RecommendationResult {
    let query: Vec<Term> = user.pkg_profile().iter().cloned().collect();
    let index = rec.users_index(clustering);
    let hits = match index.query(&query, rec.weighting(), neighbours, None) {
        Ok(hits) => hits,
        Err(err) => {
            error!("[apprec:strategy] collaborative strategy: {err}");
            return RecommendationResult::empty();
        }
    };
    debug!("[apprec:strategy] neighborhood composed by the following users");
    for hit in &hits {
        debug!("[apprec:strategy] neighbor {} (weight {:.4})", hit.item, hit.weight);
    }
    let relevance = RelevanceSet::from_hits(&hits);
    match index.expand(&relevance, size, TermClass::Package) {
        Ok(terms) => {
            let mut item_score = ItemScore::new();
            for expansion in terms {
                if let Some(item) = PACKAGE_PREFIX.strip(&expansion.term) {
                    item_score.insert(item.to_string(), expansion.weight);
                }
            }
            RecommendationResult::new(item_score)
        }
        Err(err) => {
            error!("[apprec:strategy] collaborative strategy: {err}");
            RecommendationResult::empty()
        }
    }
}
