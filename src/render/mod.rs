//! Page rendering: session abstraction, Chromium backend, and the worker pool.
//!
//! This module provides the scheduler that converts a [`TaskQueue`] into PDF
//! files using a shared browser-automation session:
//!
//! - [`RenderSession`] / [`RenderContext`] - Async traits over the headless
//!   rendering engine, so the scheduler can be exercised without a browser
//! - [`ChromiumSession`] - The Chromium-backed implementation
//! - [`RenderEngine`] - Fixed pool of workers racing a shared task cursor
//! - [`RenderError`] - Typed errors across the rendering seam
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use url2pdf_core::{ChromiumSession, RenderEngine, RenderTask, TaskQueue};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Arc::new(ChromiumSession::launch().await?);
//! let engine = RenderEngine::new(4, Duration::from_secs(120))?;
//! let queue = TaskQueue::new(vec![RenderTask::new(
//!     "Example",
//!     "https://example.com",
//!     "Example.pdf",
//!     "",
//! )]);
//! let outcome = engine.process_queue(session, queue).await?;
//! println!("Completed: {}, Failed: {}", outcome.stats.completed(), outcome.stats.failed());
//! # Ok(())
//! # }
//! ```

mod chromium;
mod engine;
mod error;
mod settle;

pub use chromium::ChromiumSession;
pub use engine::{
    DEFAULT_CONCURRENCY, DEFAULT_TASK_TIMEOUT_SECS, EngineError, RenderEngine, RenderStats,
    RunOutcome,
};
pub use error::{BoxError, RenderError};

use std::time::Duration;

use async_trait::async_trait;

use crate::queue::RenderTask;

/// A shared rendering session supporting multiple concurrent isolated
/// contexts.
///
/// The session is established once per run, shared across all workers, and
/// torn down exactly once after the last worker finishes.
#[async_trait]
pub trait RenderSession: Send + Sync {
    /// Opens a fresh isolated rendering context for a single task.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be opened. The scheduler
    /// records this as a task failure; the run continues.
    async fn open_context(&self) -> Result<Box<dyn RenderContext>, RenderError>;

    /// Tears the shared session down.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be shut down cleanly.
    async fn close(&self) -> Result<(), RenderError>;
}

/// An isolated rendering context processing exactly one task.
#[async_trait]
pub trait RenderContext: Send {
    /// Navigates to the task's URL, settles lazy-loaded content, and emits a
    /// PDF at the task's destination path, all bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error on navigation, settle, or emission failure, or when
    /// the timeout is exceeded.
    async fn render(&mut self, task: &RenderTask, timeout: Duration) -> Result<(), RenderError>;

    /// Releases the context.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be released cleanly.
    async fn close(self: Box<Self>) -> Result<(), RenderError>;
}
