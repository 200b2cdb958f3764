//! Element probing: enumerate candidate interactive elements on a page.
//!
//! Button candidates are gathered from a fixed ordered list of selectors and
//! the per-selector matches concatenated. The same physical element commonly
//! matches more than one selector (a `<button class="btn">` matches both
//! `button` and `.btn`), so every element is stamped with a stable node key
//! in the page and the concatenated list is deduplicated by that key here.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ordered button selectors, probed in this order
pub const BUTTON_SELECTORS: [&str; 6] = [
    "button",
    "input[type=\"submit\"]",
    "input[type=\"button\"]",
    "[role=\"button\"]",
    ".btn",
    "[onclick]",
];

/// Selector for input candidates
pub const INPUT_SELECTOR: &str = "input, textarea";

/// Maximum retained length of a button's trimmed text
pub const BUTTON_TEXT_CAP: usize = 50;

/// Fallback label for buttons with no text
pub const UNNAMED_BUTTON: &str = "unnamed_button";

/// Attribute stamped on probed elements so later clicks/fills can address
/// them without holding a live handle
pub const NODE_KEY_ATTR: &str = "data-sondear-key";

/// A transient input element candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputCandidate {
    /// Element id, or `input_<index>` when absent
    pub id: String,
    /// Placeholder text, empty when absent
    #[serde(default)]
    pub placeholder: String,
    /// Input type attribute
    #[serde(default)]
    pub input_type: String,
    /// Stable key stamped on the element at probe time
    pub node_key: String,
    /// Position in the probe order
    pub index: usize,
}

/// A transient button element candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonCandidate {
    /// Element id, or `button_<index>` when absent
    pub id: String,
    /// Trimmed text, capped at [`BUTTON_TEXT_CAP`] chars
    pub text: String,
    /// Whether the element was visible at probe time
    pub visible: bool,
    /// Stable key stamped on the element at probe time
    pub node_key: String,
    /// Position in the deduplicated probe order
    pub index: usize,
}

/// Combined output of one probing pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    /// Input candidates, in document order
    pub inputs: Vec<InputCandidate>,
    /// Button candidates, deduplicated, in first-match order
    pub buttons: Vec<ButtonCandidate>,
}

/// Normalize raw button text: trim, cap at [`BUTTON_TEXT_CAP`] characters,
/// fall back to [`UNNAMED_BUTTON`] when empty.
#[must_use]
pub fn normalize_button_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return UNNAMED_BUTTON.to_string();
    }
    trimmed.chars().take(BUTTON_TEXT_CAP).collect()
}

/// Deduplicate concatenated button candidates by element identity.
///
/// First occurrence wins; indices are reassigned to the deduplicated order.
/// Buttons without a node key cannot be addressed later and are dropped with
/// a debug log (partial data over aborting the probe).
#[must_use]
pub fn dedup_buttons(raw: Vec<ButtonCandidate>) -> Vec<ButtonCandidate> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(raw.len());
    for mut button in raw {
        if button.node_key.is_empty() {
            debug!(id = %button.id, "skipping button candidate without node key");
            continue;
        }
        if seen.insert(button.node_key.clone()) {
            button.index = out.len();
            out.push(button);
        }
    }
    out
}

/// In-page probe script. Stamps every matched element with a
/// `data-sondear-key` attribute and returns `{inputs, buttons}` where the
/// button list is the raw per-selector concatenation (deduplication happens
/// on the Rust side via [`dedup_buttons`]).
pub const PROBE_SCRIPT: &str = r#"
(() => {
    let nextKey = 0;
    const keyOf = (el) => {
        if (!el.hasAttribute('data-sondear-key')) {
            el.setAttribute('data-sondear-key', 'k' + (nextKey++));
        }
        return el.getAttribute('data-sondear-key');
    };
    const inputs = [];
    document.querySelectorAll('input, textarea').forEach((el, i) => {
        inputs.push({
            id: el.id || ('input_' + i),
            placeholder: el.placeholder || '',
            inputType: el.type || '',
            nodeKey: keyOf(el),
            index: i,
        });
    });
    const selectors = ['button', 'input[type="submit"]', 'input[type="button"]',
                       '[role="button"]', '.btn', '[onclick]'];
    const buttons = [];
    for (const sel of selectors) {
        document.querySelectorAll(sel).forEach((el) => {
            const text = (el.textContent || el.value || '').trim();
            buttons.push({
                id: el.id || ('button_' + buttons.length),
                text: text,
                visible: !!(el.offsetParent || el.getClientRects().length),
                nodeKey: keyOf(el),
                index: buttons.length,
            });
        });
    }
    return { inputs: inputs, buttons: buttons };
})()
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn button(id: &str, key: &str) -> ButtonCandidate {
        ButtonCandidate {
            id: id.to_string(),
            text: id.to_string(),
            visible: true,
            node_key: key.to_string(),
            index: 0,
        }
    }

    // =========================================================================
    // Deduplication
    // =========================================================================

    #[test]
    fn test_dedup_same_element_matched_by_two_selectors() {
        // <button class="btn"> matches both `button` and `.btn` and shows up
        // twice in the concatenated list, under the same node key
        let raw = vec![button("insertBtn", "k0"), button("insertBtn", "k0")];
        let out = dedup_buttons(raw);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].node_key, "k0");
    }

    #[test]
    fn test_dedup_preserves_first_match_order() {
        let raw = vec![
            button("a", "k0"),
            button("b", "k1"),
            button("a", "k0"),
            button("c", "k2"),
        ];
        let out = dedup_buttons(raw);
        let ids: Vec<_> = out.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_dedup_reassigns_indices() {
        let raw = vec![button("a", "k0"), button("a", "k0"), button("b", "k1")];
        let out = dedup_buttons(raw);
        assert_eq!(out[0].index, 0);
        assert_eq!(out[1].index, 1);
    }

    #[test]
    fn test_dedup_drops_keyless_candidates() {
        let raw = vec![button("a", ""), button("b", "k1")];
        let out = dedup_buttons(raw);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "b");
    }

    // =========================================================================
    // Text normalization
    // =========================================================================

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize_button_text("  Insert \n"), "Insert");
    }

    #[test]
    fn test_normalize_empty_falls_back() {
        assert_eq!(normalize_button_text("   "), UNNAMED_BUTTON);
        assert_eq!(normalize_button_text(""), UNNAMED_BUTTON);
    }

    #[test]
    fn test_normalize_caps_length() {
        let long = "x".repeat(200);
        assert_eq!(normalize_button_text(&long).len(), BUTTON_TEXT_CAP);
    }

    #[test]
    fn test_normalize_cap_is_char_based() {
        // multi-byte chars must not be split
        let long = "é".repeat(80);
        let out = normalize_button_text(&long);
        assert_eq!(out.chars().count(), BUTTON_TEXT_CAP);
    }

    // =========================================================================
    // Candidate serde
    // =========================================================================

    #[test]
    fn test_probe_report_deserializes_from_page_payload() {
        let payload = serde_json::json!({
            "inputs": [
                { "id": "input_0", "placeholder": "value", "inputType": "text",
                  "nodeKey": "k0", "index": 0 }
            ],
            "buttons": [
                { "id": "insertBtn", "text": "Insert", "visible": true,
                  "nodeKey": "k1", "index": 0 }
            ],
        });
        let report: ProbeReport = serde_json::from_value(payload).unwrap();
        assert_eq!(report.inputs.len(), 1);
        assert_eq!(report.buttons[0].text, "Insert");
    }
}
