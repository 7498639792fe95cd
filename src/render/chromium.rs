//! Chromium-backed rendering session over the Chrome DevTools Protocol.
//!
//! One headless browser process is shared by the whole run; each task gets a
//! fresh page as its isolated rendering context. The CDP event handler must
//! be polled for the lifetime of the session, so launch spawns a dedicated
//! task that drains it until the browser websocket closes.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use super::settle::settle_page;
use super::{RenderContext, RenderError, RenderSession};
use crate::queue::RenderTask;

/// A4 paper width in inches, the unit the CDP expects.
const A4_WIDTH_IN: f64 = 8.27;

/// A4 paper height in inches.
const A4_HEIGHT_IN: f64 = 11.69;

/// Page margin on all four sides: 10 mm expressed in inches.
const MARGIN_IN: f64 = 0.39;

/// The shared headless Chromium session.
///
/// Establishing the session is the run's single fatal acquisition point: a
/// launch failure aborts the whole run before any task is processed.
pub struct ChromiumSession {
    browser: Mutex<Browser>,
    handler_task: Mutex<Option<JoinHandle<()>>>,
}

impl ChromiumSession {
    /// Launches a headless Chromium and starts draining its CDP event stream.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Launch`] if no usable browser executable is
    /// found or the process fails to start.
    #[instrument]
    pub async fn launch() -> Result<Self, RenderError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .build()
            .map_err(RenderError::launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|source| RenderError::launch(source.to_string()))?;

        // The handler stream ends when the browser websocket closes.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(error) = event {
                    debug!(%error, "browser handler event error");
                }
            }
        });

        debug!("browser session established");

        Ok(Self {
            browser: Mutex::new(browser),
            handler_task: Mutex::new(Some(handler_task)),
        })
    }
}

#[async_trait]
impl RenderSession for ChromiumSession {
    async fn open_context(&self) -> Result<Box<dyn RenderContext>, RenderError> {
        let page = self
            .browser
            .lock()
            .await
            .new_page("about:blank")
            .await
            .map_err(RenderError::context)?;
        Ok(Box::new(ChromiumContext { page }))
    }

    async fn close(&self) -> Result<(), RenderError> {
        let mut browser = self.browser.lock().await;
        browser.close().await.map_err(RenderError::session)?;
        browser.wait().await.map_err(RenderError::session)?;

        if let Some(task) = self.handler_task.lock().await.take()
            && let Err(error) = task.await
        {
            debug!(%error, "browser handler task ended abnormally");
        }

        debug!("browser session closed");
        Ok(())
    }
}

/// A single page within the shared browser, processing exactly one task.
struct ChromiumContext {
    page: Page,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn render(&mut self, task: &RenderTask, timeout: Duration) -> Result<(), RenderError> {
        match tokio::time::timeout(timeout, render_page(&self.page, task)).await {
            Ok(result) => result,
            Err(_) => Err(RenderError::timeout(&task.url, timeout.as_secs())),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        self.page.close().await.map_err(RenderError::context)
    }
}

/// Navigate, settle, and emit the PDF for one task.
async fn render_page(page: &Page, task: &RenderTask) -> Result<(), RenderError> {
    page.goto(task.url.as_str())
        .await
        .map_err(|source| RenderError::navigation(&task.url, source))?;
    page.wait_for_navigation()
        .await
        .map_err(|source| RenderError::navigation(&task.url, source))?;

    settle_page(page)
        .await
        .map_err(|source| RenderError::settle(&task.url, source))?;

    save_pdf(page, &task.file_path).await
}

/// Emits the page as an A4 PDF with printed backgrounds and 10 mm margins.
async fn save_pdf(page: &Page, file_path: &Path) -> Result<(), RenderError> {
    let params = PrintToPdfParams {
        print_background: Some(true),
        paper_width: Some(A4_WIDTH_IN),
        paper_height: Some(A4_HEIGHT_IN),
        margin_top: Some(MARGIN_IN),
        margin_bottom: Some(MARGIN_IN),
        margin_left: Some(MARGIN_IN),
        margin_right: Some(MARGIN_IN),
        ..PrintToPdfParams::default()
    };

    page.save_pdf(params, file_path)
        .await
        .map_err(|source| RenderError::pdf(file_path, source))?;
    Ok(())
}
