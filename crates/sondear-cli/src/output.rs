//! Console output for exploration runs

use console::{style, Term};
use sondear::FsmResult;

/// Progress and summary reporter
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl Reporter {
    /// Create a new reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            use_color,
            quiet,
        }
    }

    /// Print a stage marker
    pub fn stage(&self, message: &str) {
        if self.quiet {
            return;
        }
        let line = if self.use_color {
            format!("{} {message}", style("»").cyan().bold())
        } else {
            format!("» {message}")
        };
        let _ = self.term.write_line(&line);
    }

    /// Print a discovered-transition line
    pub fn transition(&self, message: &str) {
        if self.quiet {
            return;
        }
        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print an issue line. Issues always print, even in quiet mode.
    pub fn issue(&self, message: &str) {
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };
        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print the end-of-run summary for an FSM result
    pub fn summary(&self, fsm: &FsmResult) {
        for t in &fsm.transitions {
            self.transition(&format!(
                "'{}' -> {} ({})",
                t.text, t.to, t.semantic
            ));
        }
        for issue in &fsm.issues {
            self.issue(issue);
        }
        if self.quiet {
            return;
        }
        let line = format!(
            "{} states, {} transitions, {} issues ({} inputs, {} buttons probed)",
            fsm.states.len(),
            fsm.transitions.len(),
            fsm.issues.len(),
            fsm.components.inputs,
            fsm.components.buttons,
        );
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&if self.use_color {
            style(line).bold().to_string()
        } else {
            line
        });
    }
}
