//! Semantic inference: best-effort labeling of a detected transition.
//!
//! The precedence (button-text keyword match before node-count-delta
//! direction) is encoded as an explicit ranked rule table rather than left
//! emergent from code order, so it is a testable property of the table.
//!
//! There is no confidence score and no validation against the probed page's
//! actual algorithm; this is a guess.

use crate::diff::ChangeRecord;
use serde::{Deserialize, Serialize};

/// Semantic label for a detected transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Semantic {
    /// Something was added to the structure
    Insert,
    /// Something was removed from the structure
    Delete,
    /// A lookup/highlight operation
    Search,
    /// No rule matched
    Unknown,
}

impl Semantic {
    /// Label as emitted in the FSM artifact
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Search => "search",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Semantic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a rule matches a trial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMatcher {
    /// Case-insensitive substring match of the button text against any keyword
    Keyword(&'static [&'static str]),
    /// Node count grew across the trial
    NodeCountGrew,
    /// Node count shrank across the trial
    NodeCountShrank,
}

/// One entry of the ranked rule table
#[derive(Debug, Clone, Copy)]
pub struct SemanticRule {
    /// Lower value wins first
    pub priority: u8,
    /// Label assigned when the rule matches
    pub label: Semantic,
    /// Predicate
    pub matcher: RuleMatcher,
}

impl SemanticRule {
    fn matches(&self, button_text: &str, change: &ChangeRecord) -> bool {
        match self.matcher {
            RuleMatcher::Keyword(words) => {
                let text = button_text.to_lowercase();
                words.iter().any(|w| text.contains(w))
            }
            RuleMatcher::NodeCountGrew => change
                .node_count_change()
                .is_some_and(|(before, after)| after > before),
            RuleMatcher::NodeCountShrank => change
                .node_count_change()
                .is_some_and(|(before, after)| after < before),
        }
    }
}

/// The rule table. Keyword rules rank ahead of delta-direction rules; within
/// a rank, table order decides.
pub const RULES: [SemanticRule; 5] = [
    SemanticRule {
        priority: 0,
        label: Semantic::Insert,
        matcher: RuleMatcher::Keyword(&["insert", "add"]),
    },
    SemanticRule {
        priority: 0,
        label: Semantic::Delete,
        matcher: RuleMatcher::Keyword(&["delete", "remove"]),
    },
    SemanticRule {
        priority: 0,
        label: Semantic::Search,
        matcher: RuleMatcher::Keyword(&["search", "find"]),
    },
    SemanticRule {
        priority: 1,
        label: Semantic::Insert,
        matcher: RuleMatcher::NodeCountGrew,
    },
    SemanticRule {
        priority: 1,
        label: Semantic::Delete,
        matcher: RuleMatcher::NodeCountShrank,
    },
];

/// Infer a semantic label from the button text and the observed change.
///
/// First matching rule in (priority, table-order) wins; no match yields
/// [`Semantic::Unknown`].
#[must_use]
pub fn infer_semantic(button_text: &str, change: &ChangeRecord) -> Semantic {
    let mut best: Option<(u8, Semantic)> = None;
    for rule in &RULES {
        if best.is_some_and(|(p, _)| p <= rule.priority) {
            continue;
        }
        if rule.matches(button_text, change) {
            best = Some((rule.priority, rule.label));
        }
    }
    best.map_or(Semantic::Unknown, |(_, label)| label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::ChangeDetail;

    fn change_with_nodes(before: usize, after: usize) -> ChangeRecord {
        ChangeRecord {
            has_significant_change: true,
            details: vec![ChangeDetail::NodeCountChange { before, after }],
        }
    }

    fn change_without_nodes() -> ChangeRecord {
        ChangeRecord {
            has_significant_change: true,
            details: vec![ChangeDetail::ElementCountChange {
                before: 10,
                after: 11,
            }],
        }
    }

    // =========================================================================
    // Keyword matching
    // =========================================================================

    #[test]
    fn test_keyword_matrix() {
        let change = change_without_nodes();
        for (text, expected) in [
            ("Insert", Semantic::Insert),
            ("Add Item", Semantic::Insert),
            ("ADD", Semantic::Insert),
            ("Delete Node", Semantic::Delete),
            ("remove", Semantic::Delete),
            ("Search", Semantic::Search),
            ("Find Value", Semantic::Search),
            ("Push", Semantic::Unknown),
        ] {
            assert_eq!(infer_semantic(text, &change), expected, "text: {text}");
        }
    }

    #[test]
    fn test_keyword_is_substring_match() {
        let change = change_without_nodes();
        assert_eq!(
            infer_semantic("Re-insert element", &change),
            Semantic::Insert
        );
    }

    // =========================================================================
    // Precedence: text match beats delta direction
    // =========================================================================

    #[test]
    fn test_text_match_takes_precedence_over_shrinking_delta() {
        // "Add Item" with a node-count decrease must still classify as insert
        let change = change_with_nodes(5, 3);
        assert_eq!(infer_semantic("Add Item", &change), Semantic::Insert);
    }

    #[test]
    fn test_delete_keyword_beats_growing_delta() {
        let change = change_with_nodes(3, 5);
        assert_eq!(infer_semantic("Remove", &change), Semantic::Delete);
    }

    // =========================================================================
    // Delta fallback
    // =========================================================================

    #[test]
    fn test_delta_growth_infers_insert() {
        assert_eq!(
            infer_semantic("Go", &change_with_nodes(3, 4)),
            Semantic::Insert
        );
    }

    #[test]
    fn test_delta_shrink_infers_delete() {
        assert_eq!(
            infer_semantic("Go", &change_with_nodes(4, 3)),
            Semantic::Delete
        );
    }

    #[test]
    fn test_no_match_is_unknown() {
        assert_eq!(
            infer_semantic("Go", &change_without_nodes()),
            Semantic::Unknown
        );
        assert_eq!(
            infer_semantic("Go", &change_with_nodes(3, 3)),
            Semantic::Unknown
        );
    }

    // =========================================================================
    // Rule table shape
    // =========================================================================

    #[test]
    fn test_keyword_rules_outrank_delta_rules() {
        for rule in &RULES {
            match rule.matcher {
                RuleMatcher::Keyword(_) => assert_eq!(rule.priority, 0),
                _ => assert_eq!(rule.priority, 1),
            }
        }
    }

    #[test]
    fn test_labels_serialize_lowercase() {
        assert_eq!(
            serde_json::to_value(Semantic::Insert).unwrap(),
            serde_json::json!("insert")
        );
        assert_eq!(Semantic::Unknown.to_string(), "unknown");
    }
}
