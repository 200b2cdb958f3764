//! Page snapshots: lightweight structural summaries of a live page.
//!
//! A snapshot is an ephemeral value object. It exists to be diffed against the
//! next snapshot by [`crate::diff::classify_change`] and then discarded; it is
//! never persisted on its own (the initial snapshot rides along in the FSM
//! result's debug payload only).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Heuristic selector for "tree node" elements.
///
/// Assumes the visualization renders its data structure with one of these
/// conventions; any other rendering yields zero detected nodes and silently
/// degrades significance detection.
pub const TREE_NODE_SELECTOR: &str = ".node, circle, rect, [class*=\"node\"]";

/// Maximum number of visible text nodes sampled per snapshot.
///
/// Text appearing beyond this window is invisible to the delta classifier.
/// Known blind spot of the heuristic, kept deliberately.
pub const VISIBLE_TEXT_LIMIT: usize = 20;

/// Per-category element counts for a page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementCounts {
    /// Number of `<button>` elements
    pub buttons: usize,
    /// Number of `<input>` elements
    pub inputs: usize,
    /// Total number of elements in the document
    pub total_elements: usize,
}

/// A matched tree-node element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    /// Trimmed text content
    pub text: String,
    /// Lowercased tag name
    pub tag_name: String,
    /// Raw class attribute value
    pub class_name: String,
}

/// Point-in-time structural summary of a page's DOM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    /// When the snapshot was captured
    pub timestamp: DateTime<Utc>,
    /// Element counts
    pub element_counts: ElementCounts,
    /// Elements matching [`TREE_NODE_SELECTOR`]
    pub tree_nodes: Vec<TreeNode>,
    /// First [`VISIBLE_TEXT_LIMIT`] non-blank text nodes in document order
    pub visible_text: Vec<String>,
}

impl PageSnapshot {
    /// Create an empty snapshot stamped now
    #[must_use]
    pub fn empty() -> Self {
        Self {
            timestamp: Utc::now(),
            element_counts: ElementCounts::default(),
            tree_nodes: Vec::new(),
            visible_text: Vec::new(),
        }
    }

    /// Structural equality, ignoring the capture timestamp.
    ///
    /// Two snapshots of an unchanged page must compare equal under this even
    /// though their timestamps differ.
    #[must_use]
    pub fn structurally_eq(&self, other: &Self) -> bool {
        self.element_counts == other.element_counts
            && self.tree_nodes == other.tree_nodes
            && self.visible_text == other.visible_text
    }
}

/// In-page capture script. Evaluated in the target page; returns the snapshot
/// fields as a JSON-compatible object with camelCase keys matching
/// [`PageSnapshot`]'s serde names.
pub const SNAPSHOT_SCRIPT: &str = r#"
(() => {
    const nodes = [];
    for (const el of document.querySelectorAll('.node, circle, rect, [class*="node"]')) {
        nodes.push({
            text: (el.textContent || '').trim(),
            tagName: el.tagName.toLowerCase(),
            className: typeof el.className === 'string' ? el.className : (el.className.baseVal || ''),
        });
    }
    const texts = [];
    const walker = document.createTreeWalker(document.body, NodeFilter.SHOW_TEXT);
    while (texts.length < 20) {
        const node = walker.nextNode();
        if (!node) break;
        const t = node.textContent.trim();
        if (t.length > 0) texts.push(t);
    }
    return {
        elementCounts: {
            buttons: document.querySelectorAll('button').length,
            inputs: document.querySelectorAll('input').length,
            totalElements: document.querySelectorAll('*').length,
        },
        treeNodes: nodes,
        visibleText: texts,
    };
})()
"#;
