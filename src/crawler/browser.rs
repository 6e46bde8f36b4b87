//! Browser-rendering page fetcher
//!
//! Result pages that build their listing client-side are rendered in a
//! headless Chrome (chromiumoxide, CDP) before their markup is captured.
//! Each fetch owns its own browser process; the page, the process and the
//! CDP handler task are released on every exit path.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::{Stream, StreamExt};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::FetcherConfig;
use crate::crawler::PageFetcher;
use crate::FetchError;

/// Interval between checks for the marker element
const MARKER_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Renders pages in a headless browser
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    user_agent: String,
    headless: bool,
    wait_selector: String,
    marker_timeout: Duration,
    render_timeout: Duration,
}

impl BrowserFetcher {
    pub fn from_config(config: &FetcherConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            headless: config.headless,
            wait_selector: config.wait_selector.clone(),
            marker_timeout: Duration::from_secs(config.per_request_timeout),
            render_timeout: Duration::from_secs(config.render_timeout),
        }
    }

    fn browser_config(&self, url: &str) -> Result<BrowserConfig, FetchError> {
        let mut builder = BrowserConfig::builder();

        // with_head means NOT headless
        if !self.headless {
            builder = builder.with_head();
        }

        builder
            .window_size(1920, 1080)
            .request_timeout(self.marker_timeout)
            .arg(format!("--user-agent={}", self.user_agent))
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-http2")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .build()
            .map_err(|message| FetchError::Browser {
                url: url.to_string(),
                message,
            })
    }

    /// Navigates, waits for the marker and captures the outer HTML
    async fn render(&self, browser: &Browser, url: &str) -> Result<String, FetchError> {
        let page = browser
            .new_page(url)
            .await
            .map_err(|e| browser_error(url, e))?;

        let content = async {
            page.wait_for_navigation()
                .await
                .map_err(|e| browser_error(url, e))?;
            self.wait_for_marker(&page, url).await?;
            page.content().await.map_err(|e| browser_error(url, e))
        }
        .await;

        if let Err(e) = page.close().await {
            debug!("Failed to close page for {}: {}", url, e);
        }

        content
    }

    /// Polls until the marker element exists and is visible
    async fn wait_for_marker(&self, page: &Page, url: &str) -> Result<(), FetchError> {
        let selector = serde_json::to_string(&self.wait_selector).map_err(|e| browser_error(url, e))?;
        let script = format!(
            "(() => {{ const el = document.querySelector({}); \
             return !!el && !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length); }})()",
            selector
        );

        let start = Instant::now();
        loop {
            let visible = match page.evaluate(script.clone()).await {
                Ok(result) => result.into_value::<bool>().unwrap_or(false),
                Err(e) => {
                    debug!("Marker check failed on {}: {}", url, e);
                    false
                }
            };

            if visible {
                debug!(
                    "Marker '{}' visible on {} after {:?}",
                    self.wait_selector,
                    url,
                    start.elapsed()
                );
                return Ok(());
            }

            if start.elapsed() >= self.marker_timeout {
                return Err(FetchError::MarkerTimeout {
                    url: url.to_string(),
                    selector: self.wait_selector.clone(),
                });
            }

            tokio::time::sleep(MARKER_POLL_INTERVAL).await;
        }
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let config = self.browser_config(url)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| browser_error(url, e))?;

        let handler_task = tokio::spawn(async move {
            drain_events(&mut handler).await;
        });

        let rendered = tokio::time::timeout(self.render_timeout, self.render(&browser, url)).await;

        // Cleanup runs whether the render succeeded, failed or timed out
        if let Err(e) = browser.close().await {
            debug!("Failed to close browser after {}: {}", url, e);
        }
        if let Err(e) = browser.wait().await {
            warn!("Browser process for {} did not exit cleanly: {}", url, e);
        }
        handler_task.abort();

        match rendered {
            Ok(result) => result,
            Err(_) => Err(FetchError::RenderTimeout {
                url: url.to_string(),
                seconds: self.render_timeout.as_secs(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}

/// Drives the CDP event stream until it ends, returning the number of events seen
///
/// Decode errors on unknown CDP events are routine; they are logged and the
/// stream keeps being polled.
async fn drain_events<S, E>(events: &mut S) -> usize
where
    S: Stream<Item = Result<(), E>> + Unpin,
    E: std::fmt::Debug,
{
    let mut seen = 0;
    while let Some(event) = events.next().await {
        seen += 1;
        if let Err(e) = event {
            debug!("Browser handler error: {:?}", e);
        }
    }
    seen
}

fn browser_error(url: &str, error: impl std::fmt::Display) -> FetchError {
    FetchError::Browser {
        url: url.to_string(),
        message: error.to_string(),
    }
}
