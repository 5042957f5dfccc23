//! Search index interface and the in-memory reference backend.
//!
//! Ownership model:
//! - `SearchIndex` is the strategy-facing interface for ranked retrieval
//!   and term expansion.
//! - `MemoryIndex` owns a small weighted-term corpus for tests, demos, and
//!   small catalogs.
//!
//! Both package corpora and user-profile corpora go through the same
//! interface; only the document contents differ.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexMap;

use crate::config::Weighting;
use crate::constants::terms::{PACKAGE_PREFIX, TAG_PREFIX};
use crate::errors::RecommenderError;
use crate::types::{DocId, ItemId, Term};

/// Match-time acceptance predicate for ranked retrieval.
///
/// Rejected documents never occupy a result slot, so the index fills the
/// result with the next-best accepted matches instead of truncating.
pub type MatchFilter<'a> = &'a dyn Fn(&str) -> bool;

/// One ranked retrieval hit.
#[derive(Clone, Debug)]
pub struct SearchHit {
    /// Document identifier within the queried index.
    pub doc: DocId,
    /// Item carried by the document (package name, or user id rendering).
    pub item: ItemId,
    /// Retrieval weight under the active weighting scheme.
    pub weight: f64,
}

/// One ranked expansion term.
#[derive(Clone, Debug)]
pub struct TermWeight {
    /// Vocabulary term, still carrying its class prefix if it has one.
    pub term: Term,
    /// Expansion weight across the relevance set.
    pub weight: f64,
}

/// Term class predicates used to filter expansion output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TermClass {
    /// Tag terms, `XT`-prefixed.
    Tag,
    /// Bare lowercase description keywords.
    Description,
    /// Package-identity terms, `XP`-prefixed.
    Package,
}

impl TermClass {
    /// Whether a term belongs to this class.
    pub fn accepts(&self, term: &str) -> bool {
        match self {
            TermClass::Tag => TAG_PREFIX.matches(term),
            TermClass::Package => PACKAGE_PREFIX.matches(term),
            TermClass::Description => is_description_keyword(term),
        }
    }
}

/// A description keyword has at least one cased character and none uppercase.
/// Class-prefixed terms fail this because their prefix is uppercase.
fn is_description_keyword(term: &str) -> bool {
    let mut has_lower = false;
    for ch in term.chars() {
        if ch.is_uppercase() {
            return false;
        }
        if ch.is_lowercase() {
            has_lower = true;
        }
    }
    has_lower
}

/// Documents treated as positive examples for a term expansion.
#[derive(Clone, Debug, Default)]
pub struct RelevanceSet {
    docs: BTreeSet<DocId>,
}

impl RelevanceSet {
    /// Create an empty relevance set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the document ids of a ranked hit list.
    pub fn from_hits(hits: &[SearchHit]) -> Self {
        let docs = hits.iter().map(|hit| hit.doc).collect();
        Self { docs }
    }

    /// Mark one document as relevant.
    pub fn add(&mut self, doc: DocId) {
        self.docs.insert(doc);
    }

    /// Whether a document is marked relevant.
    pub fn contains(&self, doc: DocId) -> bool {
        self.docs.contains(&doc)
    }

    /// Number of relevant documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether no documents are marked.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Relevant document ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.docs.iter().copied()
    }
}

/// Strategy-facing term index interface.
///
/// Handles are opened once per process and read-only from this crate's
/// perspective. For a fixed corpus, query and expansion output should be
/// deterministic.
pub trait SearchIndex: Send + Sync {
    /// Ranked retrieval over a disjunctive term query.
    ///
    /// Returns up to `limit` hits in descending weight order. When `accept`
    /// is given it is consulted per candidate item at match time.
    fn query(
        &self,
        terms: &[Term],
        scheme: Weighting,
        limit: usize,
        accept: Option<MatchFilter<'_>>,
    ) -> Result<Vec<SearchHit>, RecommenderError>;

    /// Ranked expansion terms drawn from a relevance set.
    ///
    /// Returns up to `limit` terms of the requested class in descending
    /// weight order. Ranking quality is entirely the index's business;
    /// callers only supply the relevance set and the class filter.
    fn expand(
        &self,
        relevance: &RelevanceSet,
        limit: usize,
        filter: TermClass,
    ) -> Result<Vec<TermWeight>, RecommenderError>;

    /// Number of documents in the index. Doubles as the evaluation universe
    /// when the index covers the whole catalog.
    fn doc_count(&self) -> usize;
}

/// One indexed document: an item plus its weighted terms.
#[derive(Clone, Debug)]
struct IndexedDoc {
    item: ItemId,
    terms: IndexMap<Term, f64>,
}

/// In-memory term index for tests and small corpora.
///
/// Document ids are assigned in insertion order. A query scores a document
/// by the summed weight of its matched terms; under [`Weighting::Bm25`] each
/// term weight is scaled by its inverse document frequency, under
/// [`Weighting::Trad`] weights are taken as stored. Expansion scores a term
/// by its summed weight across the relevance documents with the same
/// scaling, always under the BM25 rule.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    docs: Vec<IndexedDoc>,
    doc_freq: HashMap<Term, usize>,
}

impl MemoryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index one document with explicit term weights. Returns its id.
    ///
    /// Repeated terms accumulate weight instead of overwriting.
    pub fn add_document(
        &mut self,
        item: impl Into<ItemId>,
        terms: impl IntoIterator<Item = (Term, f64)>,
    ) -> DocId {
        let mut doc = IndexedDoc {
            item: item.into(),
            terms: IndexMap::new(),
        };
        for (term, weight) in terms {
            *doc.terms.entry(term).or_insert(0.0) += weight;
        }
        for term in doc.terms.keys() {
            *self.doc_freq.entry(term.clone()).or_insert(0) += 1;
        }
        let id = self.docs.len() as DocId;
        self.docs.push(doc);
        id
    }

    /// Index a package document: identity term, tag terms, and lowercase
    /// description keywords.
    pub fn add_package(&mut self, item: &str, tags: &[&str], description: &str) -> DocId {
        let mut terms: Vec<(Term, f64)> = Vec::new();
        terms.push((PACKAGE_PREFIX.encode(item), 1.0));
        for tag in tags {
            terms.push((TAG_PREFIX.encode(tag), 1.0));
        }
        for word in description.split_whitespace() {
            let keyword: String = word
                .trim_matches(|ch: char| !ch.is_alphanumeric())
                .to_lowercase();
            if !keyword.is_empty() {
                terms.push((keyword, 1.0));
            }
        }
        self.add_document(item, terms)
    }

    /// Index a user-profile document over the user's installed items.
    ///
    /// Each item is indexed both as its bare identifier and as its
    /// package-identity term, so item-id queries and package-class
    /// expansions both resolve against the same document.
    pub fn add_user<S: AsRef<str>>(&mut self, user: &str, items: &[S]) -> DocId {
        let mut terms: Vec<(Term, f64)> = Vec::new();
        for item in items {
            terms.push((item.as_ref().to_string(), 1.0));
            terms.push((PACKAGE_PREFIX.encode(item.as_ref()), 1.0));
        }
        self.add_document(user, terms)
    }

    /// Inverse document frequency of a term over the current corpus.
    fn idf(&self, term: &str) -> f64 {
        let df = self.doc_freq.get(term).copied().unwrap_or(0);
        if df == 0 {
            return 0.0;
        }
        (1.0 + self.docs.len() as f64 / df as f64).ln()
    }

    fn term_scale(&self, scheme: Weighting, term: &str) -> f64 {
        match scheme {
            Weighting::Bm25 => self.idf(term),
            Weighting::Trad => 1.0,
        }
    }
}

impl SearchIndex for MemoryIndex {
    fn query(
        &self,
        terms: &[Term],
        scheme: Weighting,
        limit: usize,
        accept: Option<MatchFilter<'_>>,
    ) -> Result<Vec<SearchHit>, RecommenderError> {
        let mut hits: Vec<SearchHit> = Vec::new();
        for (doc_id, doc) in self.docs.iter().enumerate() {
            if let Some(accept) = accept
                && !accept(&doc.item)
            {
                continue;
            }
            let mut weight = 0.0;
            for term in terms {
                if let Some(stored) = doc.terms.get(term) {
                    weight += stored * self.term_scale(scheme, term);
                }
            }
            if weight > 0.0 {
                hits.push(SearchHit {
                    doc: doc_id as DocId,
                    item: doc.item.clone(),
                    weight,
                });
            }
        }
        hits.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.item.cmp(&b.item)));
        hits.truncate(limit);
        Ok(hits)
    }

    fn expand(
        &self,
        relevance: &RelevanceSet,
        limit: usize,
        filter: TermClass,
    ) -> Result<Vec<TermWeight>, RecommenderError> {
        let mut weights: IndexMap<Term, f64> = IndexMap::new();
        for doc_id in relevance.iter() {
            let Some(doc) = self.docs.get(doc_id as usize) else {
                return Err(RecommenderError::IndexQuery(format!(
                    "relevance set references unknown document {doc_id}"
                )));
            };
            for (term, stored) in &doc.terms {
                if filter.accepts(term) {
                    *weights.entry(term.clone()).or_insert(0.0) +=
                        stored * self.term_scale(Weighting::Bm25, term);
                }
            }
        }
        let mut ranked: Vec<TermWeight> = weights
            .into_iter()
            .map(|(term, weight)| TermWeight { term, weight })
            .collect();
        ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.term.cmp(&b.term)));
        ranked.truncate(limit);
        Ok(ranked)
    }

    fn doc_count(&self) -> usize {
        self.docs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> MemoryIndex {
        let mut index = MemoryIndex::new();
        index.add_package("vim", &["role::program", "use::editing"], "terminal text editor");
        index.add_package("emacs", &["role::program", "use::editing"], "extensible text editor");
        index.add_package("gimp", &["role::program", "use::image"], "image editor");
        index
    }

    #[test]
    fn query_ranks_by_summed_matched_weight() {
        let index = sample_index();
        let terms = vec!["text".to_string(), "editor".to_string()];
        let hits = index.query(&terms, Weighting::Trad, 10, None).unwrap();

        assert_eq!(hits.len(), 3);
        // vim and emacs match both terms, gimp only one.
        assert_eq!(hits[2].item, "gimp");
        assert!(hits[0].weight > hits[2].weight);
    }

    #[test]
    fn accept_predicate_fills_with_next_best_matches() {
        let index = sample_index();
        let terms = vec!["editor".to_string()];
        let skip_vim = |item: &str| item != "vim";
        let hits = index
            .query(&terms, Weighting::Trad, 2, Some(&skip_vim))
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|hit| hit.item != "vim"));
    }

    #[test]
    fn bm25_scaling_discounts_ubiquitous_terms() {
        let index = sample_index();
        // "editor" appears in every document, "terminal" in one.
        let rare = index
            .query(&["terminal".to_string()], Weighting::Bm25, 10, None)
            .unwrap();
        let common = index
            .query(&["editor".to_string()], Weighting::Bm25, 10, None)
            .unwrap();
        assert!(rare[0].weight > common[0].weight);
    }

    #[test]
    fn expansion_honours_the_term_class_filter() {
        let index = sample_index();
        let mut relevance = RelevanceSet::new();
        relevance.add(0);
        relevance.add(1);

        let tags = index.expand(&relevance, 10, TermClass::Tag).unwrap();
        assert!(!tags.is_empty());
        assert!(tags.iter().all(|tw| tw.term.starts_with("XT")));

        let keywords = index.expand(&relevance, 10, TermClass::Description).unwrap();
        assert!(keywords.iter().all(|tw| !tw.term.starts_with("XT")));
        assert!(keywords.iter().any(|tw| tw.term == "text"));

        let packages = index.expand(&relevance, 10, TermClass::Package).unwrap();
        assert!(packages.iter().all(|tw| tw.term.starts_with("XP")));
    }

    #[test]
    fn expansion_rejects_unknown_documents() {
        let index = sample_index();
        let mut relevance = RelevanceSet::new();
        relevance.add(99);
        let err = index.expand(&relevance, 10, TermClass::Tag).unwrap_err();
        assert!(matches!(err, RecommenderError::IndexQuery(_)));
    }

    #[test]
    fn description_keywords_exclude_prefixed_and_uncased_terms() {
        assert!(is_description_keyword("editor"));
        assert!(is_description_keyword("x11"));
        assert!(!is_description_keyword("XTgame"));
        assert!(!is_description_keyword("XPvim"));
        assert!(!is_description_keyword("1234"));
        assert!(!is_description_keyword(""));
    }

    #[test]
    fn user_documents_answer_item_queries_and_package_expansion() {
        let mut index = MemoryIndex::new();
        index.add_user("user-1", &["vim", "git"]);
        index.add_user("user-2", &["vim", "gimp"]);

        let hits = index
            .query(&["vim".to_string()], Weighting::Trad, 10, None)
            .unwrap();
        assert_eq!(hits.len(), 2);

        let relevance = RelevanceSet::from_hits(&hits);
        let expanded = index.expand(&relevance, 10, TermClass::Package).unwrap();
        let terms: Vec<&str> = expanded.iter().map(|tw| tw.term.as_str()).collect();
        assert!(terms.contains(&"XPvim"));
        assert!(terms.contains(&"XPgit"));
        assert!(terms.iter().all(|term| term.starts_with("XP")));
    }
}
