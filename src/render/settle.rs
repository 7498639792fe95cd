//! Content-settle step: progressive scrolling to trigger lazy-loaded content.

use std::time::Duration;

use chromiumoxide::Page;
use chromiumoxide::error::CdpError;

/// Distance scrolled per tick, in CSS pixels.
const SCROLL_STEP: i64 = 100;

/// Delay between scroll ticks.
const SCROLL_INTERVAL: Duration = Duration::from_millis(100);

/// Scrolls the page in fixed increments until the total distance covered
/// reaches the measured scrollable height.
///
/// The height is re-read on every tick, so content appended by lazy loaders
/// extends the walk. There is no iteration cap: the loop is bounded only by
/// the caller's per-task timeout.
pub(crate) async fn settle_page(page: &Page) -> Result<(), CdpError> {
    let mut scrolled: i64 = 0;
    loop {
        let height: i64 = page
            .evaluate("document.body.scrollHeight")
            .await?
            .into_value()
            .map_err(CdpError::from)?;
        if scrolled >= height {
            break;
        }
        page.evaluate(format!("window.scrollBy(0, {SCROLL_STEP})"))
            .await?;
        scrolled += SCROLL_STEP;
        tokio::time::sleep(SCROLL_INTERVAL).await;
    }

    // Capture starts from the top of the document.
    page.evaluate("window.scrollTo(0, 0)").await?;
    Ok(())
}
