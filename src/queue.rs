//! Render task data model and the shared-cursor task queue.
//!
//! A [`TaskQueue`] is an ordered, read-only list of [`RenderTask`]s plus a
//! single shared cursor that every worker advances atomically. Each task is
//! claimed by exactly one worker: no task is processed twice, and none is
//! skipped while others remain unclaimed.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One unit of work mapping a source URL to a destination PDF path.
///
/// Created by the manifest module, consumed by the scheduler, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTask {
    /// Logical name, used for the default filename.
    pub title: String,
    /// Source address. Non-empty by construction.
    pub url: String,
    /// Destination path, unique per task by construction.
    pub file_path: PathBuf,
    /// Logical containing directory, used only for error grouping.
    /// Empty string for tasks at the manifest root.
    pub dir: String,
}

impl RenderTask {
    /// Creates a new render task.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        file_path: impl Into<PathBuf>,
        dir: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            file_path: file_path.into(),
            dir: dir.into(),
        }
    }
}

/// A render task together with a human-readable description of why it failed.
///
/// Appended to the run's failure collection by the scheduler; read once at
/// the end of the run to produce the error report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    /// The task that failed.
    pub task: RenderTask,
    /// Human-readable failure description.
    pub error: String,
}

impl TaskFailure {
    /// Creates a new task failure record.
    #[must_use]
    pub fn new(task: RenderTask, error: impl Into<String>) -> Self {
        Self {
            task,
            error: error.into(),
        }
    }
}

/// An ordered sequence of render tasks shared read-only across workers,
/// except for a single cursor that every worker atomically advances.
#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: Vec<RenderTask>,
    cursor: AtomicUsize,
}

impl TaskQueue {
    /// Creates a queue over the given tasks, preserving their order.
    #[must_use]
    pub fn new(tasks: Vec<RenderTask>) -> Self {
        Self {
            tasks,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Atomically claims the next unclaimed task.
    ///
    /// Returns `None` once the queue is exhausted. Tasks are claimed in
    /// queue order; each index is handed out exactly once.
    pub fn claim(&self) -> Option<&RenderTask> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.tasks.get(index)
    }

    /// Returns the total number of tasks in the queue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if the queue holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
