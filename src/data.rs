use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use crate::types::{ItemId, Term};

/// Insertion-ordered mapping from item identifier to a non-negative weight.
///
/// Doubles as a raw installed-set representation (every weight 1) and as a
/// strategy's scored output (weight = retrieval/expansion score).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ItemScore {
    scores: IndexMap<ItemId, f64>,
}

impl ItemScore {
    /// Create an empty score map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a uniform-weight map over the given items.
    pub fn uniform(items: impl IntoIterator<Item = ItemId>, weight: f64) -> Self {
        let scores = items.into_iter().map(|item| (item, weight)).collect();
        Self { scores }
    }

    /// Insert or overwrite one item's weight.
    pub fn insert(&mut self, item: ItemId, weight: f64) {
        self.scores.insert(item, weight);
    }

    /// Weight recorded for an item, if present.
    pub fn get(&self, item: &str) -> Option<f64> {
        self.scores.get(item).copied()
    }

    /// Whether an item is present.
    pub fn contains(&self, item: &str) -> bool {
        self.scores.contains_key(item)
    }

    /// Number of scored items.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether the map holds no items.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Item identifiers in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &ItemId> {
        self.scores.keys()
    }

    /// `(item, weight)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, f64)> {
        self.scores.iter().map(|(item, weight)| (item, *weight))
    }

    /// Pairs ranked by descending weight, ties broken by item id.
    pub fn ranked(&self) -> Vec<(&ItemId, f64)> {
        let mut pairs: Vec<_> = self.scores.iter().map(|(item, w)| (item, *w)).collect();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        pairs
    }
}

impl FromIterator<(ItemId, f64)> for ItemScore {
    fn from_iter<I: IntoIterator<Item = (ItemId, f64)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// Scored item set produced by a recommendation strategy.
///
/// An empty result is how a strategy reports a failed index run; callers
/// must not read it as "nothing to recommend".
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecommendationResult {
    item_score: ItemScore,
}

impl RecommendationResult {
    /// Wrap a scored item set.
    pub fn new(item_score: ItemScore) -> Self {
        Self { item_score }
    }

    /// The empty result used to signal a failed strategy run.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The underlying score map.
    pub fn item_score(&self) -> &ItemScore {
        &self.item_score
    }

    /// Whether the result carries no items.
    pub fn is_empty(&self) -> bool {
        self.item_score.is_empty()
    }

    /// Number of recommended items.
    pub fn len(&self) -> usize {
        self.item_score.len()
    }

    /// Whether an item was recommended.
    pub fn contains(&self, item: &str) -> bool {
        self.item_score.contains(item)
    }

    /// Item identifiers ranked by descending score.
    pub fn ranked_items(&self) -> Vec<&ItemId> {
        self.item_score
            .ranked()
            .into_iter()
            .map(|(item, _)| item)
            .collect()
    }
}

impl fmt::Display for RecommendationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, (item, weight)) in self.item_score.ranked().iter().enumerate() {
            writeln!(f, "{:2}: {item} ({weight:.4})", rank + 1)?;
        }
        Ok(())
    }
}
