//! The FSM result artifact: states, transitions, and run diagnostics.
//!
//! Built incrementally during a single exploration run as an explicit
//! accumulator owned by the driver, then serialized once at the end. There is
//! no incremental persistence; a crash mid-run loses the accumulated result.

use crate::diff::ChangeDetail;
use crate::semantic::Semantic;
use crate::snapshot::PageSnapshot;
use serde::{Deserialize, Serialize};

/// Id of the synthetic state recorded before any button is tried
pub const INITIAL_STATE_ID: &str = "initial";

/// A discovered state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDescriptor {
    /// Unique state id
    pub id: String,
    /// `"initial"` for the synthetic start state, `"discovered"` otherwise
    #[serde(rename = "type")]
    pub state_type: String,
    /// Free-text description
    pub description: String,
    /// Inferred semantic of the action that produced this state, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic: Option<Semantic>,
}

/// A discovered transition edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    /// Source state id
    pub from: String,
    /// Destination state id
    pub to: String,
    /// Triggering event label (e.g. `click:<buttonId>`)
    pub event: String,
    /// Source element text
    pub text: String,
    /// Inferred semantic label
    pub semantic: Semantic,
    /// Raw change details that justified the transition
    pub changes: Vec<ChangeDetail>,
}

/// Summary counts of detected interactive components
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSummary {
    /// Detected input candidates
    pub inputs: usize,
    /// Detected button candidates (after deduplication)
    pub buttons: usize,
}

/// Opaque diagnostic payload carried alongside the FSM proper
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    /// Snapshot captured right after the initial settle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_state: Option<PageSnapshot>,
    /// Buttons skipped because they were not visible at probe time
    pub skipped_buttons: Vec<String>,
    /// Free-form per-run log lines
    pub log: Vec<String>,
}

/// The overall output record of one exploration run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FsmResult {
    /// Discovered states, in discovery order; always starts with `"initial"`
    pub states: Vec<StateDescriptor>,
    /// Discovered transition edges
    pub transitions: Vec<Transition>,
    /// Detected component counts
    pub components: ComponentSummary,
    /// Anomalies encountered during the run
    pub issues: Vec<String>,
    /// Diagnostic payload
    pub debug: DebugInfo,
}

impl Default for FsmResult {
    fn default() -> Self {
        Self::new()
    }
}

impl FsmResult {
    /// Create a result seeded with the synthetic initial state
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: vec![StateDescriptor {
                id: INITIAL_STATE_ID.to_string(),
                state_type: "initial".to_string(),
                description: "Page loaded, before any interaction".to_string(),
                semantic: None,
            }],
            transitions: Vec::new(),
            components: ComponentSummary::default(),
            issues: Vec::new(),
            debug: DebugInfo::default(),
        }
    }

    /// Whether a state with this id has been recorded
    #[must_use]
    pub fn has_state(&self, id: &str) -> bool {
        self.states.iter().any(|s| s.id == id)
    }

    /// Record a discovered state. Duplicate ids are ignored.
    pub fn add_state(&mut self, state: StateDescriptor) {
        if !self.has_state(&state.id) {
            self.states.push(state);
        }
    }

    /// Record a transition. Returns `false` (and records nothing) if either
    /// endpoint is not a known state, preserving the referential invariant.
    pub fn add_transition(&mut self, transition: Transition) -> bool {
        if !self.has_state(&transition.from) || !self.has_state(&transition.to) {
            return false;
        }
        self.transitions.push(transition);
        true
    }

    /// Record an anomaly
    pub fn add_issue(&mut self, issue: impl Into<String>) {
        self.issues.push(issue.into());
    }

    /// Check both structural invariants: the initial state is present and
    /// every transition endpoint references a recorded state.
    #[must_use]
    pub fn validate(&self) -> bool {
        self.has_state(INITIAL_STATE_ID)
            && self
                .transitions
                .iter()
                .all(|t| self.has_state(&t.from) && self.has_state(&t.to))
    }

    /// Serialize as the pretty-printed JSON artifact
    pub fn to_pretty_json(&self) -> crate::result::SondearResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
