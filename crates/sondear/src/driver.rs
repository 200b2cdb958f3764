//! Abstract page driver: the seam between the exploration loop and a page.
//!
//! The loop never talks to a browser directly. The CDP implementation (behind
//! the `browser` feature) and the in-memory fixture pages used in tests both
//! implement this trait, so the same exploration protocol is exercised in
//! unit tests without a running Chromium.

use crate::probe::{ButtonCandidate, InputCandidate, ProbeReport};
use crate::result::SondearResult;
use crate::snapshot::PageSnapshot;
use async_trait::async_trait;

/// Operations the exploration loop needs from a live page
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Capture a structural snapshot of the current DOM.
    ///
    /// An error means "snapshot unavailable"; callers must degrade rather
    /// than abort the run.
    async fn snapshot(&self) -> SondearResult<PageSnapshot>;

    /// Enumerate interactive element candidates.
    ///
    /// The returned button list is the raw per-selector concatenation; the
    /// caller deduplicates via [`crate::probe::dedup_buttons`].
    async fn probe(&self) -> SondearResult<ProbeReport>;

    /// Fill an input candidate with a value
    async fn fill(&self, input: &InputCandidate, value: &str) -> SondearResult<()>;

    /// Click a button candidate
    async fn click(&self, button: &ButtonCandidate) -> SondearResult<()>;

    /// Reload the page, restoring a clean DOM
    async fn reload(&self) -> SondearResult<()>;

    /// Monotonic count of DOM mutations observed since load.
    ///
    /// Backs the settle polling in [`crate::settle`]: the page is considered
    /// quiet once this count holds steady across consecutive reads.
    async fn mutation_count(&self) -> SondearResult<u64>;
}
