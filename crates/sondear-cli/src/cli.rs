//! Command-line argument definitions

use clap::Parser;
use std::path::PathBuf;

/// Probe an HTML page and extract a best-effort FSM of its UI transitions
#[derive(Debug, Parser)]
#[command(name = "sondear", version, about)]
pub struct Cli {
    /// Path to the HTML file to explore (loaded via file://)
    pub target: PathBuf,

    /// Where to write the FSM JSON artifact (overwritten on every run)
    #[arg(long, short, default_value = "extracted-fsm-debug.json")]
    pub output: PathBuf,

    /// Run the browser with a visible window
    #[arg(long)]
    pub headed: bool,

    /// Value typed into the first input before each click
    #[arg(long, default_value = sondear::DEFAULT_FILL_VALUE)]
    pub fill_value: String,

    /// Settle polling timeout per wait, in milliseconds
    #[arg(long, default_value_t = sondear::settle::DEFAULT_SETTLE_TIMEOUT_MS)]
    pub settle_timeout_ms: u64,

    /// Path to the chromium binary (auto-detected when unset)
    #[arg(long, env = "CHROMIUM_PATH")]
    pub chromium_path: Option<String>,

    /// Disable the chromium sandbox (containers/CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Tracing filter directive derived from the verbosity flags
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            "sondear=error"
        } else {
            match self.verbose {
                0 => "sondear=warn",
                1 => "sondear=info",
                _ => "sondear=debug",
            }
        }
    }
}
