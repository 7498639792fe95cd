//! Error types for the render module.
//!
//! Session- and context-level implementations box their underlying errors so
//! the [`RenderSession`](super::RenderSession) seam stays backend-agnostic.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed source error used across the rendering seam.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while rendering pages.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The shared rendering session could not be established. Fatal: aborts
    /// the entire run before any task is processed.
    #[error("failed to launch rendering session: {message}")]
    Launch {
        /// Description of the launch failure.
        message: String,
    },

    /// The shared rendering session failed outside of any single task
    /// (e.g. during teardown).
    #[error("rendering session error: {source}")]
    Session {
        /// The underlying session error.
        #[source]
        source: BoxError,
    },

    /// An isolated rendering context could not be opened for a task.
    #[error("failed to open rendering context: {source}")]
    Context {
        /// The underlying context error.
        #[source]
        source: BoxError,
    },

    /// Navigation to the task's URL failed.
    #[error("navigation failed for {url}: {source}")]
    Navigation {
        /// The URL that failed to load.
        url: String,
        /// The underlying navigation error.
        #[source]
        source: BoxError,
    },

    /// The content-settle scroll pass failed.
    #[error("content settle failed for {url}: {source}")]
    Settle {
        /// The URL being settled.
        url: String,
        /// The underlying settle error.
        #[source]
        source: BoxError,
    },

    /// PDF emission failed.
    #[error("PDF emission failed for {path}: {source}")]
    Pdf {
        /// The destination path that could not be written.
        path: PathBuf,
        /// The underlying emission error.
        #[source]
        source: BoxError,
    },

    /// The task exceeded its render timeout.
    #[error("timed out after {seconds}s rendering {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
        /// The timeout that was exceeded, in seconds.
        seconds: u64,
    },
}

impl RenderError {
    /// Creates a launch error.
    pub fn launch(message: impl Into<String>) -> Self {
        Self::Launch {
            message: message.into(),
        }
    }

    /// Creates a session error.
    pub fn session(source: impl Into<BoxError>) -> Self {
        Self::Session {
            source: source.into(),
        }
    }

    /// Creates a context error.
    pub fn context(source: impl Into<BoxError>) -> Self {
        Self::Context {
            source: source.into(),
        }
    }

    /// Creates a navigation error.
    pub fn navigation(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Navigation {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Creates a content-settle error.
    pub fn settle(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Settle {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Creates a PDF emission error.
    pub fn pdf(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::Pdf {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            url: url.into(),
            seconds,
        }
    }
}
