//! Sondear: heuristic UI exploration for interactive HTML pages.
//!
//! Sondear (Spanish: "to probe/sound out") loads an HTML page, probes its
//! interactive elements, clicks them one by one, and distills the observed
//! DOM deltas into a best-effort finite-state-machine description of the
//! page's UI transitions.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌────────────┐   ┌────────────┐
//! │ Element  │──►│ Snapshot   │──►│ Delta      │──►│ Semantic   │
//! │ Prober   │   │ before/    │   │ Classifier │   │ Inferencer │
//! │          │   │ after      │   │            │   │            │
//! └──────────┘   └────────────┘   └────────────┘   └────────────┘
//!       ▲              click + settle                     │
//!       └──────────── Exploration Driver ◄────────────────┘
//!                     (accumulates FsmResult)
//! ```
//!
//! The exploration loop is generic over [`PageDriver`]; the CDP-backed
//! implementation in [`browser`] requires the `browser` cargo feature, while
//! the pure heuristics (snapshot diffing, semantic inference, dedup) work on
//! plain values and need no browser at all.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "browser")]
//! # async fn run() -> sondear::SondearResult<()> {
//! use sondear::{Browser, BrowserConfig, Explorer};
//!
//! let browser = Browser::launch(BrowserConfig::default()).await?;
//! let mut page = browser.new_page().await?;
//! page.goto("file:///tmp/bst-visualizer.html").await?;
//!
//! let fsm = Explorer::new().run(&page).await;
//! println!("{}", fsm.to_pretty_json()?);
//!
//! browser.close().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod browser;
pub mod diff;
pub mod driver;
pub mod explore;
pub mod fsm;
pub mod probe;
pub mod result;
pub mod semantic;
pub mod settle;
pub mod snapshot;

pub use browser::BrowserConfig;
#[cfg(feature = "browser")]
pub use browser::{Browser, Page};
pub use diff::{classify_change, ChangeDetail, ChangeRecord};
pub use driver::PageDriver;
pub use explore::{ExploreOptions, Explorer, DEFAULT_FILL_VALUE};
pub use fsm::{
    ComponentSummary, DebugInfo, FsmResult, StateDescriptor, Transition, INITIAL_STATE_ID,
};
pub use probe::{dedup_buttons, ButtonCandidate, InputCandidate, ProbeReport};
pub use result::{SondearError, SondearResult};
pub use semantic::{infer_semantic, Semantic, SemanticRule};
pub use settle::{settle_best_effort, wait_for_settle, SettleOptions};
pub use snapshot::{ElementCounts, PageSnapshot, TreeNode};
