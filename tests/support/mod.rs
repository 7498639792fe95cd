//! Shared test support: a scripted mock rendering session.
//!
//! The mock "renders" a task by writing a placeholder file at the task's
//! destination, so pipeline tests can assert on-disk outcomes without a
//! browser. URLs containing a configured marker fail instead.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use url2pdf_core::{RenderContext, RenderError, RenderSession, RenderTask};

/// Observable state shared between a [`MockSession`] and its contexts.
#[derive(Debug, Default)]
pub struct MockState {
    pub contexts_opened: AtomicUsize,
    pub contexts_closed: AtomicUsize,
    pub session_closes: AtomicUsize,
    pub rendered: Mutex<Vec<String>>,
}

impl MockState {
    pub fn contexts_opened(&self) -> usize {
        self.contexts_opened.load(Ordering::SeqCst)
    }

    pub fn contexts_closed(&self) -> usize {
        self.contexts_closed.load(Ordering::SeqCst)
    }

    pub fn session_closes(&self) -> usize {
        self.session_closes.load(Ordering::SeqCst)
    }

    pub fn rendered_urls(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }
}

/// Scripted mock rendering session.
pub struct MockSession {
    state: Arc<MockState>,
    fail_marker: Option<String>,
    fail_open_contexts: bool,
    render_delay: Option<Duration>,
}

impl MockSession {
    /// Session where every render succeeds.
    pub fn succeeding() -> Self {
        Self {
            state: Arc::new(MockState::default()),
            fail_marker: None,
            fail_open_contexts: false,
            render_delay: None,
        }
    }

    /// Session where renders of URLs containing `marker` time out.
    pub fn failing_for(marker: impl Into<String>) -> Self {
        Self {
            fail_marker: Some(marker.into()),
            ..Self::succeeding()
        }
    }

    /// Session where no rendering context can be opened.
    pub fn failing_to_open_contexts() -> Self {
        Self {
            fail_open_contexts: true,
            ..Self::succeeding()
        }
    }

    /// Adds an artificial render delay, to keep several workers in flight.
    pub fn with_render_delay(mut self, delay: Duration) -> Self {
        self.render_delay = Some(delay);
        self
    }

    /// Handle onto the observable state, for assertions after the run.
    pub fn state(&self) -> Arc<MockState> {
        Arc::clone(&self.state)
    }
}

#[async_trait]
impl RenderSession for MockSession {
    async fn open_context(&self) -> Result<Box<dyn RenderContext>, RenderError> {
        self.state.contexts_opened.fetch_add(1, Ordering::SeqCst);
        if self.fail_open_contexts {
            return Err(RenderError::context("scripted context failure"));
        }
        Ok(Box::new(MockContext {
            state: Arc::clone(&self.state),
            fail_marker: self.fail_marker.clone(),
            render_delay: self.render_delay,
        }))
    }

    async fn close(&self) -> Result<(), RenderError> {
        self.state.session_closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct MockContext {
    state: Arc<MockState>,
    fail_marker: Option<String>,
    render_delay: Option<Duration>,
}

#[async_trait]
impl RenderContext for MockContext {
    async fn render(&mut self, task: &RenderTask, timeout: Duration) -> Result<(), RenderError> {
        if let Some(delay) = self.render_delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(marker) = &self.fail_marker
            && task.url.contains(marker.as_str())
        {
            return Err(RenderError::timeout(&task.url, timeout.as_secs()));
        }

        std::fs::write(&task.file_path, b"%PDF-1.4\nmock\n")
            .map_err(|source| RenderError::pdf(&task.file_path, source))?;
        self.state.rendered.lock().unwrap().push(task.url.clone());
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        self.state.contexts_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
