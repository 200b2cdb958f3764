//! Settle polling: wait for a page to go quiet instead of sleeping blind.
//!
//! The page is considered settled once its DOM mutation count holds steady
//! for a configured number of consecutive checks, under a bounded timeout.
//! This replaces fixed-duration sleeps as the synchronization mechanism, so
//! wall-clock cost tracks actual page responsiveness.

use crate::driver::PageDriver;
use crate::result::{SondearError, SondearResult};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Default number of consecutive stable checks required
pub const DEFAULT_STABLE_CHECKS: u32 = 3;

/// Default settle timeout (5 seconds)
pub const DEFAULT_SETTLE_TIMEOUT_MS: u64 = 5_000;

/// Options for settle polling
#[derive(Debug, Clone)]
pub struct SettleOptions {
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
    /// Consecutive unchanged reads required before the page counts as quiet
    pub stable_checks: u32,
    /// Bounded timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for SettleOptions {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            stable_checks: DEFAULT_STABLE_CHECKS,
            timeout_ms: DEFAULT_SETTLE_TIMEOUT_MS,
        }
    }
}

impl SettleOptions {
    /// Create options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set required consecutive stable checks
    #[must_use]
    pub const fn with_stable_checks(mut self, checks: u32) -> Self {
        self.stable_checks = checks;
        self
    }

    /// Set bounded timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }
}

/// Outcome of a successful settle wait
#[derive(Debug, Clone, Copy)]
pub struct SettleOutcome {
    /// Time spent polling
    pub elapsed: Duration,
    /// Mutation count at the moment the page settled
    pub mutation_count: u64,
}

/// Poll the driver's mutation counter until it is stable for
/// `options.stable_checks` consecutive reads.
///
/// Returns [`SondearError::Timeout`] when the deadline expires first; driver
/// read failures propagate unchanged.
pub async fn wait_for_settle<D: PageDriver + ?Sized>(
    driver: &D,
    options: &SettleOptions,
) -> SondearResult<SettleOutcome> {
    let start = Instant::now();
    let timeout = Duration::from_millis(options.timeout_ms);
    let poll = Duration::from_millis(options.poll_interval_ms);

    let mut last = driver.mutation_count().await?;
    let mut stable = 0u32;

    loop {
        if start.elapsed() >= timeout {
            return Err(SondearError::Timeout {
                ms: options.timeout_ms,
            });
        }
        tokio::time::sleep(poll).await;

        let current = driver.mutation_count().await?;
        if current == last {
            stable += 1;
            if stable >= options.stable_checks {
                return Ok(SettleOutcome {
                    elapsed: start.elapsed(),
                    mutation_count: current,
                });
            }
        } else {
            stable = 0;
            last = current;
        }
    }
}

/// Settle, treating timeout expiry as "good enough".
///
/// The fixed sleeps this mechanism replaced could not fail, so the polling
/// replacement must not introduce a new per-button failure mode. Driver read
/// failures still propagate.
pub async fn settle_best_effort<D: PageDriver + ?Sized>(
    driver: &D,
    options: &SettleOptions,
) -> SondearResult<()> {
    match wait_for_settle(driver, options).await {
        Ok(outcome) => {
            debug!(elapsed_ms = outcome.elapsed.as_millis() as u64, "page settled");
            Ok(())
        }
        Err(SondearError::Timeout { ms }) => {
            debug!(timeout_ms = ms, "settle timed out, proceeding with current state");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
