//! Worker-pool scheduler driving render tasks against a shared session.
//!
//! The engine spawns a fixed number of workers that race a shared cursor
//! into the task queue. Each worker claims the next unclaimed task, fully
//! processes it in a fresh isolated rendering context, and only then claims
//! another. Per-task failures are captured and recorded; they never abort
//! sibling workers. The shared session is torn down exactly once, after
//! every worker has terminated.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use url2pdf_core::{ChromiumSession, RenderEngine, TaskQueue};
//!
//! # async fn example(queue: TaskQueue) -> Result<(), Box<dyn std::error::Error>> {
//! let session = Arc::new(ChromiumSession::launch().await?);
//! let engine = RenderEngine::new(4, Duration::from_secs(120))?;
//! let outcome = engine.process_queue(session, queue).await?;
//! println!(
//!     "Completed: {}, Failed: {}",
//!     outcome.stats.completed(),
//!     outcome.stats.failed()
//! );
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::{RenderError, RenderSession};
use crate::queue::{RenderTask, TaskFailure, TaskQueue};

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
const MAX_CONCURRENCY: usize = 16;

/// Default number of concurrent workers.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default per-task render timeout in seconds.
pub const DEFAULT_TASK_TIMEOUT_SECS: u64 = 120;

/// Error type for engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// The shared rendering session failed to shut down after the run.
    #[error("failed to close rendering session: {source}")]
    SessionClose {
        /// The underlying session error.
        #[source]
        source: RenderError,
    },
}

/// Statistics from a render run.
///
/// Tracks completed and failed task counts. Uses atomic counters for
/// thread-safe updates from concurrent workers.
#[derive(Debug, Default)]
pub struct RenderStats {
    completed: AtomicUsize,
    failed: AtomicUsize,
}

impl RenderStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of successfully rendered tasks.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Returns the number of failed tasks.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Returns the total number of tasks that reached a terminal state.
    #[must_use]
    pub fn total(&self) -> usize {
        self.completed() + self.failed()
    }

    /// Increments the completed counter.
    fn increment_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    /// Increments the failed counter.
    fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Result of a completed render run: counters plus the failure collection
/// consumed by the error reporter.
#[derive(Debug)]
pub struct RunOutcome {
    /// Completed/failed counters for the run.
    pub stats: RenderStats,
    /// Every task that failed, in detection order.
    pub failures: Vec<TaskFailure>,
}

/// Worker-pool scheduler for concurrent page rendering.
///
/// # Concurrency Model
///
/// - Exactly N workers are spawned, each in its own Tokio task
/// - Workers share one atomic cursor into the task queue; each task is
///   claimed by exactly one worker
/// - A worker fully processes its claimed task (open context, render, close
///   context) before claiming another
/// - The scheduler waits for all N workers, then closes the shared session
#[derive(Debug)]
pub struct RenderEngine {
    /// Number of concurrent workers.
    concurrency: usize,
    /// Per-task render timeout.
    task_timeout: Duration,
}

impl RenderEngine {
    /// Creates a new engine with the given worker count and per-task timeout.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-16).
    #[instrument]
    pub fn new(concurrency: usize, task_timeout: Duration) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(
            concurrency,
            task_timeout_secs = task_timeout.as_secs(),
            "creating render engine"
        );

        Ok(Self {
            concurrency,
            task_timeout,
        })
    }

    /// Returns the configured worker count.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the configured per-task timeout.
    #[must_use]
    pub fn task_timeout(&self) -> Duration {
        self.task_timeout
    }

    /// Processes every task in the queue and tears the session down.
    ///
    /// Each task is attempted exactly once. Per-task failures are captured
    /// in the returned outcome, never propagated; the session is closed
    /// exactly once after all workers finish, regardless of how many tasks
    /// failed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SessionClose`] if the session fails to shut
    /// down. Individual render failures do NOT cause this method to error.
    #[instrument(skip(self, session, queue), fields(tasks = queue.len()))]
    pub async fn process_queue(
        &self,
        session: Arc<dyn RenderSession>,
        queue: TaskQueue,
    ) -> Result<RunOutcome, EngineError> {
        let queue = Arc::new(queue);
        let stats = Arc::new(RenderStats::new());
        let failures = Arc::new(Mutex::new(Vec::new()));

        info!(
            tasks = queue.len(),
            workers = self.concurrency,
            "starting render run"
        );

        let mut handles = Vec::with_capacity(self.concurrency);
        for worker in 0..self.concurrency {
            handles.push(tokio::spawn(run_worker(
                worker,
                Arc::clone(&queue),
                Arc::clone(&session),
                self.task_timeout,
                Arc::clone(&stats),
                Arc::clone(&failures),
            )));
        }

        for handle in handles {
            // A panicked worker is logged; its unclaimed share of the queue
            // has already been drained by the surviving workers.
            if let Err(error) = handle.await {
                warn!(%error, "render worker panicked");
            }
        }

        session
            .close()
            .await
            .map_err(|source| EngineError::SessionClose { source })?;

        let stats = unwrap_stats(stats);
        let failures = unwrap_failures(failures);

        info!(
            completed = stats.completed(),
            failed = stats.failed(),
            total = stats.total(),
            "render run complete"
        );

        Ok(RunOutcome { stats, failures })
    }
}

/// One worker: repeatedly claims the next unclaimed task and fully processes
/// it until the queue is exhausted.
async fn run_worker(
    worker: usize,
    queue: Arc<TaskQueue>,
    session: Arc<dyn RenderSession>,
    task_timeout: Duration,
    stats: Arc<RenderStats>,
    failures: Arc<Mutex<Vec<TaskFailure>>>,
) {
    while let Some(task) = queue.claim() {
        info!(worker, url = %task.url, "rendering page");

        match process_task(session.as_ref(), task, task_timeout).await {
            Ok(()) => {
                info!(worker, path = %task.file_path.display(), "render complete");
                stats.increment_completed();
            }
            Err(error) => {
                warn!(worker, url = %task.url, %error, "render failed");
                failures
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(TaskFailure::new(task.clone(), error.to_string()));
                stats.increment_failed();
            }
        }
    }

    debug!(worker, "queue exhausted, worker finished");
}

/// Processes a single task in a fresh isolated context.
///
/// The context is released on every exit path. A close failure after a
/// successful render is logged and does not fail the task: the PDF is
/// already on disk.
async fn process_task(
    session: &dyn RenderSession,
    task: &RenderTask,
    timeout: Duration,
) -> Result<(), RenderError> {
    let mut context = session.open_context().await?;
    let outcome = context.render(task, timeout).await;

    if let Err(error) = context.close().await {
        warn!(url = %task.url, %error, "failed to close rendering context");
    }

    outcome
}

/// Recovers owned stats from the shared handle once all workers are done.
fn unwrap_stats(stats: Arc<RenderStats>) -> RenderStats {
    match Arc::try_unwrap(stats) {
        Ok(stats) => stats,
        Err(shared) => {
            // All workers have been joined, so this should not happen; fall
            // back to copying the atomic values.
            let stats = RenderStats::new();
            stats.completed.store(shared.completed(), Ordering::SeqCst);
            stats.failed.store(shared.failed(), Ordering::SeqCst);
            stats
        }
    }
}

/// Recovers the owned failure collection from the shared handle.
fn unwrap_failures(failures: Arc<Mutex<Vec<TaskFailure>>>) -> Vec<TaskFailure> {
    match Arc::try_unwrap(failures) {
        Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
        Err(shared) => shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone(),
    }
}
