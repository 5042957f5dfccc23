use std::fmt::Display;

use crate::types::Term;

/// Canonical class prefix for index vocabulary terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TermPrefix {
    prefix: &'static str,
}

impl TermPrefix {
    /// Create a term prefix with a canonical static spelling.
    pub const fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }

    /// Return the raw prefix string.
    pub const fn as_str(&self) -> &'static str {
        self.prefix
    }

    /// Encode a bare value as a prefixed term (e.g., "XPvim").
    pub fn encode(&self, value: impl Display) -> Term {
        format!("{}{}", self.prefix, value)
    }

    /// Whether a term carries this class prefix.
    pub fn matches(&self, term: &str) -> bool {
        term.starts_with(self.prefix)
    }

    /// Strip the class prefix from a term.
    pub fn strip<'a>(&self, term: &'a str) -> Option<&'a str> {
        term.strip_prefix(self.prefix)
    }
}

/// Constants used by term classification and encoding.
pub mod terms {
    use super::TermPrefix;

    /// Class prefix for tag terms (e.g., "XTrole::program").
    pub const TAG_PREFIX: TermPrefix = TermPrefix::new("XT");
    /// Class prefix for package-identity terms (e.g., "XPvim").
    pub const PACKAGE_PREFIX: TermPrefix = TermPrefix::new("XP");
}

/// Constants used by profile extraction and recommendation sizing.
pub mod profile {
    /// Default number of expansion terms drawn for a user term profile.
    pub const DEFAULT_PROFILE_SIZE: usize = 50;
    /// Default number of items in a recommendation.
    pub const DEFAULT_RESULT_SIZE: usize = 20;
    /// Weight assigned to every item seeded from a catalog's installed set.
    pub const INSTALLED_ITEM_WEIGHT: f64 = 1.0;
}

/// Constants used by the collaborative neighbor search.
pub mod collaborative {
    /// Default neighborhood size (k) for user similarity retrieval.
    pub const DEFAULT_NEIGHBOURS: usize = 10;
}

/// Constants used by the cross-validation harness.
pub mod evaluation {
    /// Default fraction of the profile kept for training in each trial.
    pub const DEFAULT_HOLDOUT_RATIO: f64 = 0.9;
    /// Default number of holdout trials per run.
    pub const DEFAULT_ROUNDS: usize = 10;
    /// Default beta for the F-score metric (weights precision over recall).
    pub const DEFAULT_FSCORE_BETA: f64 = 0.5;
}

/// Fixed demographic mapping from profile labels to index tag sets.
pub mod demographics {
    /// Tags associated with the `admin` demographic label.
    pub const ADMIN_TAGS: &[&str] = &[
        "admin",
        "hardware",
        "mail",
        "protocol",
        "network",
        "security",
        "web",
        "interface::web",
    ];
    /// Tags associated with the `devel` demographic label.
    pub const DEVEL_TAGS: &[&str] = &["devel", "role::devel-lib", "role::shared-lib"];
    /// Tags associated with the `desktop` demographic label.
    pub const DESKTOP_TAGS: &[&str] = &[
        "x11",
        "accessibility",
        "game",
        "junior",
        "office",
        "interface::x11",
    ];
    /// Tags associated with the `art` demographic label.
    pub const ART_TAGS: &[&str] = &["field::arts", "sound"];
    /// Tags associated with the `science` demographic label.
    pub const SCIENCE_TAGS: &[&str] = &[
        "science",
        "biology",
        "field::astronomy",
        "field::aviation",
        "field::biology",
        "field::chemistry",
        "field::electronics",
        "field::finance",
        "field::geography",
        "field::geology",
        "field::linguistics",
        "field::mathematics",
        "field::medicine",
        "field::meteorology",
        "field::physics",
        "field::statistics",
    ];

    /// Default demographic label set for a freshly built profile.
    pub const DEFAULT_LABELS: &[&str] = &["desktop"];

    /// Expand one demographic label into its index tag set.
    /// Unknown labels expand to themselves.
    pub fn tags_for_label(label: &str) -> Vec<String> {
        let tags: &[&str] = match label {
            "admin" => ADMIN_TAGS,
            "devel" => DEVEL_TAGS,
            "desktop" => DESKTOP_TAGS,
            "art" => ART_TAGS,
            "science" => SCIENCE_TAGS,
            other => return vec![other.to_string()],
        };
        tags.iter().map(|tag| tag.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_prefix_encodes_and_strips() {
        let encoded = terms::PACKAGE_PREFIX.encode("vim");
        assert_eq!(encoded, "XPvim");
        assert!(terms::PACKAGE_PREFIX.matches(&encoded));
        assert_eq!(terms::PACKAGE_PREFIX.strip(&encoded), Some("vim"));
        assert_eq!(terms::PACKAGE_PREFIX.strip("XTgame"), None);
    }

    #[test]
    fn tag_and_package_prefixes_are_disjoint() {
        let tag = terms::TAG_PREFIX.encode("role::program");
        assert!(terms::TAG_PREFIX.matches(&tag));
        assert!(!terms::PACKAGE_PREFIX.matches(&tag));
    }

    #[test]
    fn demographic_labels_expand_through_the_fixed_mapping() {
        let desktop = demographics::tags_for_label("desktop");
        assert!(desktop.contains(&"x11".to_string()));
        assert!(desktop.contains(&"interface::x11".to_string()));
        assert_eq!(demographics::tags_for_label("haskell"), vec!["haskell"]);
    }
}
