//! Result and error types for Sondear.

use thiserror::Error;

/// Result type for Sondear operations
pub type SondearResult<T> = Result<T, SondearError>;

/// Errors that can occur in Sondear
#[derive(Debug, Error)]
pub enum SondearError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// In-page script evaluation error
    #[error("Script evaluation failed: {message}")]
    Evaluation {
        /// Error message
        message: String,
    },

    /// Element interaction error (click, fill)
    #[error("Interaction with {element} failed: {message}")]
    Interaction {
        /// Element id or description
        element: String,
        /// Error message
        message: String,
    },

    /// Page snapshot could not be captured
    #[error("Snapshot unavailable: {message}")]
    SnapshotUnavailable {
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Target file is missing or not loadable
    #[error("Target not loadable: {path}")]
    InvalidTarget {
        /// Path that was rejected
        path: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SondearError {
    /// Create a page error
    #[must_use]
    pub fn page(message: impl Into<String>) -> Self {
        Self::Page {
            message: message.into(),
        }
    }

    /// Create an evaluation error
    #[must_use]
    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation {
            message: message.into(),
        }
    }

    /// Create an interaction error
    #[must_use]
    pub fn interaction(element: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Interaction {
            element: element.into(),
            message: message.into(),
        }
    }
}
