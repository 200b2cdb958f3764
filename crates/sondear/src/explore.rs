//! Exploration driver: the probe-and-diff loop.
//!
//! Strictly sequential over a single page. The FSM result is an explicit
//! accumulator built inside [`Explorer::run`] and returned; nothing is
//! shared or mutated outside the loop.
//!
//! Error containment mirrors the three tiers the tool promises: per-element
//! failures are absorbed during probing, a failing button becomes an issue
//! string and the loop moves on, and anything that breaks the loop itself is
//! recorded as an issue on the result that still gets returned.

use crate::diff::classify_change;
use crate::driver::PageDriver;
use crate::fsm::{ComponentSummary, FsmResult, StateDescriptor, Transition, INITIAL_STATE_ID};
use crate::probe::{dedup_buttons, normalize_button_text, ButtonCandidate, InputCandidate};
use crate::result::SondearResult;
use crate::semantic::infer_semantic;
use crate::settle::{settle_best_effort, SettleOptions};
use crate::snapshot::PageSnapshot;
use tracing::{debug, info, warn};

/// Default value typed into the first input before each click
pub const DEFAULT_FILL_VALUE: &str = "50";

/// Options for one exploration run
#[derive(Debug, Clone)]
pub struct ExploreOptions {
    /// Value typed into the first input candidate before each click
    pub fill_value: String,
    /// Settle polling configuration, shared by every wait in the run
    pub settle: SettleOptions,
}

impl Default for ExploreOptions {
    fn default() -> Self {
        Self {
            fill_value: DEFAULT_FILL_VALUE.to_string(),
            settle: SettleOptions::default(),
        }
    }
}

impl ExploreOptions {
    /// Create options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the input fill value
    #[must_use]
    pub fn with_fill_value(mut self, value: impl Into<String>) -> Self {
        self.fill_value = value.into();
        self
    }

    /// Set settle polling options
    #[must_use]
    pub fn with_settle(mut self, settle: SettleOptions) -> Self {
        self.settle = settle;
        self
    }
}

/// Snapshots bracketing one button trial
struct Trial {
    before: PageSnapshot,
    after: PageSnapshot,
}

/// The exploration driver
#[derive(Debug, Clone, Default)]
pub struct Explorer {
    options: ExploreOptions,
}

impl Explorer {
    /// Create an explorer with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an explorer with the given options
    #[must_use]
    pub fn with_options(options: ExploreOptions) -> Self {
        Self { options }
    }

    /// Run one exploration pass against an already-navigated page.
    ///
    /// Always returns a result; failures inside the run are folded into its
    /// `issues` list instead of propagating. Closing the browser is the
    /// caller's responsibility.
    pub async fn run<D: PageDriver + ?Sized>(&self, driver: &D) -> FsmResult {
        let mut fsm = FsmResult::new();

        if let Err(e) = self.explore(driver, &mut fsm).await {
            warn!(error = %e, "exploration aborted");
            fsm.add_issue(format!("Exploration aborted: {e}"));
        }

        if fsm.transitions.is_empty() {
            fsm.add_issue("No interactive transitions detected");
        }

        fsm
    }

    async fn explore<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        fsm: &mut FsmResult,
    ) -> SondearResult<()> {
        // Let the page finish its load-time animation before looking at it
        settle_best_effort(driver, &self.options.settle).await?;

        match driver.snapshot().await {
            Ok(snapshot) => fsm.debug.initial_state = Some(snapshot),
            Err(e) => fsm.add_issue(format!("Initial snapshot unavailable: {e}")),
        }

        // One probe for the whole run. Buttons discovered later (or replaced
        // by destructive clicks) are not re-probed; a stale candidate fails
        // its trial and is contained below.
        let report = driver.probe().await?;
        let inputs = report.inputs;
        let buttons: Vec<ButtonCandidate> = dedup_buttons(report.buttons)
            .into_iter()
            .map(|mut b| {
                b.text = normalize_button_text(&b.text);
                b
            })
            .collect();

        fsm.components = ComponentSummary {
            inputs: inputs.len(),
            buttons: buttons.len(),
        };
        info!(
            inputs = inputs.len(),
            buttons = buttons.len(),
            "probe complete"
        );

        for button in &buttons {
            if !button.visible {
                debug!(id = %button.id, "skipping invisible button");
                fsm.debug
                    .skipped_buttons
                    .push(format!("{} ({})", button.text, button.id));
                continue;
            }

            match self.try_button(driver, button, &inputs).await {
                Ok(trial) => self.record_trial(fsm, button, &trial),
                Err(e) => {
                    warn!(id = %button.id, error = %e, "button trial failed");
                    fsm.add_issue(format!(
                        "Button '{}' ({}) failed: {e}",
                        button.text, button.id
                    ));
                }
            }

            // Reset to a clean DOM before the next button; tolerates
            // destructive or duplicate-creating actions
            driver.reload().await?;
            settle_best_effort(driver, &self.options.settle).await?;
        }

        Ok(())
    }

    async fn try_button<D: PageDriver + ?Sized>(
        &self,
        driver: &D,
        button: &ButtonCandidate,
        inputs: &[InputCandidate],
    ) -> SondearResult<Trial> {
        if let Some(input) = inputs.first() {
            driver.fill(input, &self.options.fill_value).await?;
            settle_best_effort(driver, &self.options.settle).await?;
        }

        let before = driver.snapshot().await?;
        driver.click(button).await?;
        settle_best_effort(driver, &self.options.settle).await?;
        let after = driver.snapshot().await?;

        Ok(Trial { before, after })
    }

    fn record_trial(&self, fsm: &mut FsmResult, button: &ButtonCandidate, trial: &Trial) {
        let change = classify_change(&trial.before, &trial.after);
        if !change.has_significant_change {
            debug!(id = %button.id, "no detectable changes");
            fsm.add_issue(format!(
                "Button '{}' ({}) produced no detectable changes",
                button.text, button.id
            ));
            return;
        }

        let semantic = infer_semantic(&button.text, &change);
        let state_id = format!("state_after_{}", button.id);
        info!(id = %button.id, semantic = %semantic, "transition discovered");

        fsm.add_state(StateDescriptor {
            id: state_id.clone(),
            state_type: "discovered".to_string(),
            description: format!("State after clicking '{}'", button.text),
            semantic: Some(semantic),
        });
        fsm.add_transition(Transition {
            from: INITIAL_STATE_ID.to_string(),
            to: state_id,
            event: format!("click:{}", button.id),
            text: button.text.clone(),
            semantic,
            changes: change.details,
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeReport;
    use crate::semantic::Semantic;
    use crate::snapshot::{ElementCounts, TreeNode};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;

    /// What a fixture button does when clicked
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Behavior {
        AppendNode,
        RemoveNode,
        Noop,
        Broken,
    }

    #[derive(Debug, Clone)]
    struct FixtureButton {
        candidate: ButtonCandidate,
        behavior: Behavior,
    }

    #[derive(Debug, Clone)]
    struct FixtureDom {
        node_count: usize,
        total_elements: usize,
        visible_text: Vec<String>,
    }

    /// In-memory page standing in for a loaded HTML fixture
    struct FixturePage {
        initial: FixtureDom,
        dom: Mutex<FixtureDom>,
        inputs: Vec<InputCandidate>,
        buttons: Vec<FixtureButton>,
        mutations: AtomicU64,
        filled: Mutex<Vec<String>>,
    }

    impl FixturePage {
        fn new(inputs: usize, buttons: Vec<FixtureButton>) -> Self {
            let dom = FixtureDom {
                node_count: 0,
                total_elements: 10 + inputs + buttons.len(),
                visible_text: vec!["Visualizer".to_string()],
            };
            Self {
                initial: dom.clone(),
                dom: Mutex::new(dom),
                inputs: (0..inputs)
                    .map(|i| InputCandidate {
                        id: format!("input_{i}"),
                        placeholder: "value".to_string(),
                        input_type: "text".to_string(),
                        node_key: format!("ki{i}"),
                        index: i,
                    })
                    .collect(),
                buttons,
                mutations: AtomicU64::new(0),
                filled: Mutex::new(Vec::new()),
            }
        }
    }

    fn fixture_button(id: &str, text: &str, visible: bool, behavior: Behavior) -> FixtureButton {
        FixtureButton {
            candidate: ButtonCandidate {
                id: id.to_string(),
                text: text.to_string(),
                visible,
                node_key: format!("kb_{id}"),
                index: 0,
            },
            behavior,
        }
    }

    #[async_trait]
    impl PageDriver for FixturePage {
        async fn snapshot(&self) -> SondearResult<PageSnapshot> {
            let dom = self.dom.lock().unwrap();
            Ok(PageSnapshot {
                timestamp: Utc::now(),
                element_counts: ElementCounts {
                    buttons: self.buttons.len(),
                    inputs: self.inputs.len(),
                    total_elements: dom.total_elements,
                },
                tree_nodes: (0..dom.node_count)
                    .map(|i| TreeNode {
                        text: i.to_string(),
                        tag_name: "div".to_string(),
                        class_name: "node".to_string(),
                    })
                    .collect(),
                visible_text: dom.visible_text.clone(),
            })
        }

        async fn probe(&self) -> SondearResult<ProbeReport> {
            Ok(ProbeReport {
                inputs: self.inputs.clone(),
                buttons: self.buttons.iter().map(|b| b.candidate.clone()).collect(),
            })
        }

        async fn fill(&self, _input: &InputCandidate, value: &str) -> SondearResult<()> {
            self.filled.lock().unwrap().push(value.to_string());
            Ok(())
        }

        async fn click(&self, button: &ButtonCandidate) -> SondearResult<()> {
            let behavior = self
                .buttons
                .iter()
                .find(|b| b.candidate.node_key == button.node_key)
                .map(|b| b.behavior)
                .ok_or_else(|| {
                    crate::result::SondearError::interaction(&button.id, "element not found")
                })?;
            match behavior {
                Behavior::AppendNode => {
                    let mut dom = self.dom.lock().unwrap();
                    dom.node_count += 1;
                    dom.total_elements += 1;
                    self.mutations.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
                Behavior::RemoveNode => {
                    let mut dom = self.dom.lock().unwrap();
                    dom.node_count = dom.node_count.saturating_sub(1);
                    dom.total_elements -= 1;
                    self.mutations.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
                Behavior::Noop => Ok(()),
                Behavior::Broken => Err(crate::result::SondearError::interaction(
                    &button.id,
                    "onclick handler threw",
                )),
            }
        }

        async fn reload(&self) -> SondearResult<()> {
            *self.dom.lock().unwrap() = self.initial.clone();
            self.mutations.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn mutation_count(&self) -> SondearResult<u64> {
            Ok(self.mutations.load(Ordering::SeqCst))
        }
    }

    fn fast_explorer() -> Explorer {
        Explorer::with_options(ExploreOptions::new().with_settle(
            SettleOptions::new()
                .with_poll_interval(1)
                .with_stable_checks(2)
                .with_timeout(200),
        ))
    }

    // =========================================================================
    // Snapshot idempotence on an unchanged page
    // =========================================================================

    #[tokio::test]
    async fn test_snapshot_idempotent_on_unchanged_page() {
        let page = FixturePage::new(1, vec![fixture_button("b", "Insert", true, Behavior::Noop)]);
        let a = page.snapshot().await.unwrap();
        let b = page.snapshot().await.unwrap();
        assert!(a.structurally_eq(&b));
    }

    // =========================================================================
    // End-to-end fixture scenario
    // =========================================================================

    #[tokio::test]
    async fn test_insert_fixture_yields_one_transition() {
        let page = FixturePage::new(
            1,
            vec![fixture_button(
                "insertBtn",
                "Insert",
                true,
                Behavior::AppendNode,
            )],
        );
        let fsm = fast_explorer().run(&page).await;

        assert_eq!(fsm.states.len(), 2);
        assert_eq!(fsm.states[1].id, "state_after_insertBtn");
        assert_eq!(fsm.transitions.len(), 1);
        let t = &fsm.transitions[0];
        assert_eq!(t.from, INITIAL_STATE_ID);
        assert_eq!(t.to, "state_after_insertBtn");
        assert_eq!(t.semantic, Semantic::Insert);
        assert!(fsm.issues.is_empty());
        assert!(fsm.validate());

        // the input was filled with the configured test value before the click
        assert_eq!(page.filled.lock().unwrap().as_slice(), ["50"]);
        // the initial snapshot rode along in the debug payload
        assert!(fsm.debug.initial_state.is_some());
        assert_eq!(fsm.components.buttons, 1);
        assert_eq!(fsm.components.inputs, 1);
    }

    // =========================================================================
    // Resilience: a broken button must not abort the run
    // =========================================================================

    #[tokio::test]
    async fn test_broken_button_recorded_as_issue_and_run_continues() {
        let page = FixturePage::new(
            0,
            vec![
                fixture_button("brokenBtn", "Crash", true, Behavior::Broken),
                fixture_button("insertBtn", "Insert", true, Behavior::AppendNode),
            ],
        );
        let fsm = fast_explorer().run(&page).await;

        assert_eq!(fsm.transitions.len(), 1);
        assert_eq!(fsm.transitions[0].to, "state_after_insertBtn");
        assert_eq!(fsm.issues.len(), 1);
        assert!(fsm.issues[0].contains("brokenBtn"));
        assert!(fsm.validate());
    }

    // =========================================================================
    // Skips, no-change issues, reload isolation
    // =========================================================================

    #[tokio::test]
    async fn test_invisible_button_skipped_without_issue() {
        let page = FixturePage::new(
            0,
            vec![fixture_button(
                "hiddenBtn",
                "Insert",
                false,
                Behavior::AppendNode,
            )],
        );
        let fsm = fast_explorer().run(&page).await;

        assert_eq!(fsm.transitions.len(), 0);
        assert_eq!(fsm.debug.skipped_buttons.len(), 1);
        assert!(fsm.debug.skipped_buttons[0].contains("hiddenBtn"));
        // only the end-of-run "nothing found" issue, not a per-button one
        assert_eq!(fsm.issues, vec!["No interactive transitions detected"]);
    }

    #[tokio::test]
    async fn test_noop_button_yields_no_change_issue() {
        let page = FixturePage::new(0, vec![fixture_button("noop", "Reset", true, Behavior::Noop)]);
        let fsm = fast_explorer().run(&page).await;

        assert_eq!(fsm.states.len(), 1);
        assert!(fsm
            .issues
            .iter()
            .any(|i| i.contains("noop") && i.contains("no detectable changes")));
        assert!(fsm
            .issues
            .iter()
            .any(|i| i.contains("No interactive transitions detected")));
    }

    #[tokio::test]
    async fn test_reload_isolates_buttons_from_each_other() {
        // both buttons see the same baseline because of the reload in between
        let page = FixturePage::new(
            0,
            vec![
                fixture_button("addA", "Add A", true, Behavior::AppendNode),
                fixture_button("delB", "Delete B", true, Behavior::RemoveNode),
            ],
        );
        let fsm = fast_explorer().run(&page).await;

        assert_eq!(fsm.transitions.len(), 2);
        assert_eq!(fsm.transitions[0].semantic, Semantic::Insert);
        // keyword beats delta direction: "Delete B" stays delete even though
        // removing from an empty baseline cannot shrink the node count
        assert_eq!(fsm.transitions[1].semantic, Semantic::Delete);
    }

    #[tokio::test]
    async fn test_duplicate_probe_entries_tested_once() {
        // same element reported under two selectors: one trial, one transition
        let button = fixture_button("dup", "Insert", true, Behavior::AppendNode);
        let page = FixturePage::new(0, vec![button.clone(), button]);
        let fsm = fast_explorer().run(&page).await;

        assert_eq!(fsm.components.buttons, 1);
        assert_eq!(fsm.transitions.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_page_reports_no_transitions() {
        let page = FixturePage::new(0, vec![]);
        let fsm = fast_explorer().run(&page).await;

        assert_eq!(fsm.states.len(), 1);
        assert_eq!(fsm.issues, vec!["No interactive transitions detected"]);
        assert!(fsm.validate());
    }

    #[tokio::test]
    async fn test_long_button_text_normalized_in_result() {
        let long_label = "Insert ".to_string() + &"x".repeat(100);
        let page = FixturePage::new(
            0,
            vec![fixture_button("big", &long_label, true, Behavior::AppendNode)],
        );
        let fsm = fast_explorer().run(&page).await;

        assert_eq!(fsm.transitions.len(), 1);
        assert_eq!(fsm.transitions[0].text.chars().count(), 50);
    }
}
