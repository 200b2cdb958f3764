//! Delta classification: compare two page snapshots and judge significance.
//!
//! Three independent checks, each appending a typed detail and raising the
//! significance flag: tree-node count delta, total element count delta, and
//! new visible text. There are no numeric thresholds and no debouncing; a
//! single extra text node registers as a change. Low precision is intentional.

use crate::snapshot::PageSnapshot;
use serde::{Deserialize, Serialize};

/// One typed entry justifying a detected change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeDetail {
    /// Tree-node array length differs
    NodeCountChange {
        /// Count before the action
        before: usize,
        /// Count after the action
        after: usize,
    },
    /// Total element count differs
    ElementCountChange {
        /// Count before the action
        before: usize,
        /// Count after the action
        after: usize,
    },
    /// Strings present after the action but absent before it
    TextContentChange {
        /// Newly appeared text
        added: Vec<String>,
    },
}

/// Result of comparing two snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    /// Whether any check fired
    pub has_significant_change: bool,
    /// The checks that fired, in check order
    pub details: Vec<ChangeDetail>,
}

impl ChangeRecord {
    /// Find the node-count detail, if that check fired
    #[must_use]
    pub fn node_count_change(&self) -> Option<(usize, usize)> {
        self.details.iter().find_map(|d| match d {
            ChangeDetail::NodeCountChange { before, after } => Some((*before, *after)),
            _ => None,
        })
    }
}

/// Compare two snapshots. Pure function; consumes nothing, mutates nothing.
#[must_use]
pub fn classify_change(before: &PageSnapshot, after: &PageSnapshot) -> ChangeRecord {
    let mut record = ChangeRecord::default();

    if before.tree_nodes.len() != after.tree_nodes.len() {
        record.has_significant_change = true;
        record.details.push(ChangeDetail::NodeCountChange {
            before: before.tree_nodes.len(),
            after: after.tree_nodes.len(),
        });
    }

    if before.element_counts.total_elements != after.element_counts.total_elements {
        record.has_significant_change = true;
        record.details.push(ChangeDetail::ElementCountChange {
            before: before.element_counts.total_elements,
            after: after.element_counts.total_elements,
        });
    }

    // Set difference by string equality, not by position. Text beyond the
    // snapshot's sampling window is invisible here.
    let added: Vec<String> = after
        .visible_text
        .iter()
        .filter(|t| !before.visible_text.contains(t))
        .cloned()
        .collect();
    if !added.is_empty() {
        record.has_significant_change = true;
        record
            .details
            .push(ChangeDetail::TextContentChange { added });
    }

    record
}
