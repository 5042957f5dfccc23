//! Recommender façade: index handles, weighting scheme, and strategy
//! dispatch.

use std::fmt;

use tracing::debug;

use crate::config::{RecommenderConfig, Weighting};
use crate::data::RecommendationResult;
use crate::errors::RecommenderError;
use crate::index::SearchIndex;
use crate::profile::UserProfile;
use crate::strategy::{Strategy, StrategyKind};

/// Owns the index handles and the active strategy; pure dispatch otherwise.
pub struct Recommender {
    items_index: Box<dyn SearchIndex>,
    users_index: Box<dyn SearchIndex>,
    clustered_users_index: Option<Box<dyn SearchIndex>>,
    weighting: Weighting,
    strategy: Strategy,
    config: RecommenderConfig,
}

impl fmt::Debug for Recommender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Index handles are opaque trait objects; report everything else.
        f.debug_struct("Recommender")
            .field("weighting", &self.weighting)
            .field("strategy", &self.strategy)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Recommender {
    /// Build a recommender over an item index and a user index.
    ///
    /// The active strategy comes from `config.strategy`; an unsupported
    /// kind fails here and stops the run.
    pub fn new(
        items_index: Box<dyn SearchIndex>,
        users_index: Box<dyn SearchIndex>,
        config: &RecommenderConfig,
    ) -> Result<Self, RecommenderError> {
        config.validate()?;
        let strategy = Strategy::from_kind(config.strategy, config)?;
        Ok(Self {
            items_index,
            users_index,
            clustered_users_index: None,
            weighting: config.weighting,
            strategy,
            config: config.clone(),
        })
    }

    /// Attach a pre-clustered user index.
    pub fn with_clustered_users(mut self, index: Box<dyn SearchIndex>) -> Self {
        self.clustered_users_index = Some(index);
        self
    }

    /// The item index handle.
    pub fn items_index(&self) -> &dyn SearchIndex {
        self.items_index.as_ref()
    }

    /// The user index handle, honouring the clustering toggle.
    ///
    /// Falls back to the full index when no clustered index is attached;
    /// the two differ only in recall.
    pub fn users_index(&self, clustering: bool) -> &dyn SearchIndex {
        if clustering {
            match &self.clustered_users_index {
                Some(index) => return index.as_ref(),
                None => debug!(
                    "[apprec:recommender] no clustered user index attached; using the full index"
                ),
            }
        }
        self.users_index.as_ref()
    }

    /// The configured weighting scheme, applied to every ranked query.
    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    /// The active strategy.
    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Evaluation universe: number of documents in the item index.
    pub fn universe_size(&self) -> usize {
        self.items_index.doc_count()
    }

    /// Run a strategy for `user`, sized to `size` items.
    ///
    /// `kind` overrides the active strategy for this call, parameterized
    /// from the construction-time configuration; `None` runs the active
    /// one. Only an unsupported override kind can fail.
    pub fn get_recommendation(
        &self,
        user: &UserProfile,
        size: usize,
        kind: Option<StrategyKind>,
    ) -> Result<RecommendationResult, RecommenderError> {
        match kind {
            Some(kind) => {
                let strategy = Strategy::from_kind(kind, &self.config)?;
                Ok(strategy.run(self, user, size))
            }
            None => Ok(self.strategy.run(self, user, size)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ItemScore;
    use crate::index::MemoryIndex;

    fn item_index() -> MemoryIndex {
        let mut index = MemoryIndex::new();
        index.add_package("vim", &["role::program", "use::editing"], "terminal text editor");
        index.add_package("emacs", &["role::program", "use::editing"], "extensible text editor");
        index.add_package("nano", &["role::program", "use::editing"], "simple text editor");
        index
    }

    fn user_index() -> MemoryIndex {
        let mut index = MemoryIndex::new();
        index.add_user("user-a", &["vim", "emacs"]);
        index.add_user("user-b", &["vim", "nano"]);
        index
    }

    fn sample_user() -> UserProfile {
        let scores = ItemScore::uniform(["vim".to_string()], 1.0);
        UserProfile::with_user_id(scores, 3)
    }

    #[test]
    fn unsupported_configured_strategy_fails_at_construction() {
        let config = RecommenderConfig {
            strategy: StrategyKind::Demographic,
            ..RecommenderConfig::default()
        };
        let err = Recommender::new(Box::new(item_index()), Box::new(user_index()), &config)
            .unwrap_err();
        assert!(matches!(err, RecommenderError::UnsupportedStrategy(ref name) if name == "demo"));
    }

    #[test]
    fn override_kind_changes_the_strategy_for_one_call() {
        let config = RecommenderConfig::default();
        let rec =
            Recommender::new(Box::new(item_index()), Box::new(user_index()), &config).unwrap();
        let user = sample_user();

        let content = rec.get_recommendation(&user, 5, None).unwrap();
        assert!(!content.contains("vim"));

        let collaborative = rec
            .get_recommendation(&user, 5, Some(StrategyKind::CollaborativeUnclustered))
            .unwrap();
        assert!(!collaborative.is_empty());

        let err = rec
            .get_recommendation(&user, 5, Some(StrategyKind::KnowledgeBased))
            .unwrap_err();
        assert!(matches!(err, RecommenderError::UnsupportedStrategy(_)));
    }

    #[test]
    fn clustering_falls_back_to_the_full_user_index() {
        let config = RecommenderConfig::default();
        let rec =
            Recommender::new(Box::new(item_index()), Box::new(user_index()), &config).unwrap();
        assert_eq!(rec.users_index(true).doc_count(), 2);

        let clustered = MemoryIndex::new();
        let rec = rec.with_clustered_users(Box::new(clustered));
        assert_eq!(rec.users_index(true).doc_count(), 0);
        assert_eq!(rec.users_index(false).doc_count(), 2);
    }

    #[test]
    fn universe_size_tracks_the_item_index() {
        let config = RecommenderConfig::default();
        let rec =
            Recommender::new(Box::new(item_index()), Box::new(user_index()), &config).unwrap();
        assert_eq!(rec.universe_size(), 3);
    }
}
