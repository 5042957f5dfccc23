//! User profiles: construction, reduction, and term-profile extraction.

use std::collections::{BTreeSet, HashSet};

use indexmap::IndexSet;
use rand::Rng;
use tracing::{debug, info};

use crate::catalog::PackageCatalog;
use crate::config::Weighting;
use crate::constants::demographics;
use crate::constants::profile::INSTALLED_ITEM_WEIGHT;
use crate::constants::terms::PACKAGE_PREFIX;
use crate::data::ItemScore;
use crate::errors::RecommenderError;
use crate::index::{RelevanceSet, SearchIndex, TermClass};
use crate::types::{DemographicTag, ItemId, Term, UserId};

/// Content source for a user's term profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    /// Tag terms only.
    Tag,
    /// Description keywords only.
    Description,
    /// Tags first, then description keywords, `size / 2` slots each.
    Full,
}

/// A recommender user: scored items, the working package profile, and a
/// demographic tag set.
///
/// `pkg_profile` starts as the full key set of `item_score` and only ever
/// shrinks; reductions remove items, never add them.
#[derive(Clone, Debug)]
pub struct UserProfile {
    item_score: ItemScore,
    pkg_profile: IndexSet<ItemId>,
    user_id: UserId,
    demographic_tags: BTreeSet<DemographicTag>,
}

impl UserProfile {
    /// Build a profile over a scored item set, drawing a random user id.
    pub fn new(item_score: ItemScore) -> Self {
        let user_id = rand::rng().random::<UserId>();
        Self::with_user_id(item_score, user_id)
    }

    /// Build a profile with an explicit user id (deterministic tests).
    pub fn with_user_id(item_score: ItemScore, user_id: UserId) -> Self {
        let pkg_profile = item_score.items().cloned().collect();
        let mut profile = Self {
            item_score,
            pkg_profile,
            user_id,
            demographic_tags: BTreeSet::new(),
        };
        profile.set_demographic_labels(demographics::DEFAULT_LABELS.iter().copied());
        profile
    }

    /// Build a profile from a catalog's installed set, every item weighted 1.
    pub fn from_catalog(catalog: &dyn PackageCatalog) -> Self {
        let item_score = ItemScore::uniform(catalog.installed(), INSTALLED_ITEM_WEIGHT);
        Self::new(item_score)
    }

    /// The user identifier.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Item identifiers of the raw scored set, in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &ItemId> {
        self.item_score.items()
    }

    /// Whether an item belongs to the raw scored set.
    pub fn has_item(&self, item: &str) -> bool {
        self.item_score.contains(item)
    }

    /// The raw scored item set.
    pub fn item_score(&self) -> &ItemScore {
        &self.item_score
    }

    /// The working package profile.
    pub fn pkg_profile(&self) -> &IndexSet<ItemId> {
        &self.pkg_profile
    }

    /// Replace the demographic labels, expanding each through the fixed
    /// label-to-tags mapping.
    pub fn set_demographic_labels<S: Into<String>>(&mut self, labels: impl IntoIterator<Item = S>) {
        self.demographic_tags = labels
            .into_iter()
            .flat_map(|label| demographics::tags_for_label(&label.into()))
            .collect();
    }

    /// The expanded demographic tag set.
    pub fn demographic_tags(&self) -> &BTreeSet<DemographicTag> {
        &self.demographic_tags
    }

    /// Drop every auto-installed item from the working profile.
    ///
    /// Items unknown to the catalog are skipped, not fatal.
    pub fn reduce_to_manually_installed(&mut self, catalog: &dyn PackageCatalog) {
        let before = self.pkg_profile.len();
        let snapshot: Vec<ItemId> = self.pkg_profile.iter().cloned().collect();
        for item in snapshot {
            match catalog.is_auto_installed(&item) {
                Ok(true) => {
                    self.pkg_profile.shift_remove(&item);
                }
                Ok(false) => {}
                Err(err) => {
                    debug!("[apprec:profile] disregarding item missing from catalog: {err}");
                }
            }
        }
        info!(
            "[apprec:profile] reduced profile size from {before} to {}",
            self.pkg_profile.len()
        );
    }

    /// Drop every item reachable as an OR-dependency alternative of another
    /// profile item, keeping only maximal selections.
    ///
    /// Walks a snapshot of the profile, skipping entries an earlier step
    /// already removed. When two profile items list each other as
    /// alternatives, which one survives depends on profile order; no
    /// tie-break is imposed.
    pub fn reduce_to_maximal_set(&mut self, catalog: &dyn PackageCatalog) {
        let before = self.pkg_profile.len();
        let snapshot: Vec<ItemId> = self.pkg_profile.iter().cloned().collect();
        for item in snapshot {
            if !self.pkg_profile.contains(&item) {
                continue;
            }
            let groups = match catalog.dependency_alternatives(&item) {
                Ok(groups) => groups,
                Err(err) => {
                    debug!("[apprec:profile] disregarding item missing from catalog: {err}");
                    continue;
                }
            };
            for group in groups {
                for alternative in group {
                    self.pkg_profile.shift_remove(&alternative);
                }
            }
        }
        info!(
            "[apprec:profile] reduced profile size from {before} to {}",
            self.pkg_profile.len()
        );
    }

    /// Keep only profile items present in the allow list.
    pub fn retain_allowed(&mut self, allowed: &HashSet<ItemId>) {
        let before = self.pkg_profile.len();
        self.pkg_profile.retain(|item| allowed.contains(item));
        info!(
            "[apprec:profile] reduced profile size from {before} to {}",
            self.pkg_profile.len()
        );
    }

    /// Most relevant profile terms for one content kind.
    ///
    /// Queries the index for the profile's own documents, marks those as
    /// the relevance set, and expands it filtered to the requested class.
    /// For [`ContentKind::Full`], tags come first and both halves get
    /// `size / 2` slots, so odd sizes yield one term fewer.
    pub fn profile(
        &self,
        index: &dyn SearchIndex,
        content: ContentKind,
        size: usize,
    ) -> Result<Vec<Term>, RecommenderError> {
        match content {
            ContentKind::Tag => self.expanded_terms(index, size, TermClass::Tag),
            ContentKind::Description => self.expanded_terms(index, size, TermClass::Description),
            ContentKind::Full => {
                let mut terms = self.expanded_terms(index, size, TermClass::Tag)?;
                terms.truncate(size / 2);
                let mut keywords = self.expanded_terms(index, size, TermClass::Description)?;
                keywords.truncate(size / 2);
                terms.append(&mut keywords);
                Ok(terms)
            }
        }
    }

    /// Expansion terms for the profile's own documents, filtered by class.
    fn expanded_terms(
        &self,
        index: &dyn SearchIndex,
        size: usize,
        filter: TermClass,
    ) -> Result<Vec<Term>, RecommenderError> {
        let query: Vec<Term> = self
            .pkg_profile
            .iter()
            .map(|item| PACKAGE_PREFIX.encode(item))
            .collect();
        let hits = index.query(&query, Weighting::default(), index.doc_count(), None)?;
        let relevance = RelevanceSet::from_hits(&hits);
        let expanded = index.expand(&relevance, size, filter)?;
        Ok(expanded.into_iter().map(|tw| tw.term).collect())
    }
}
