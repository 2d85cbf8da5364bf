use fantoccini::{Client, ClientBuilder};
use std::time::Duration;
use tokio::time::timeout;

use crate::config::CrawlerConfig;
use crate::error::RenderError;

/// Source of rendered page HTML.
///
/// The production implementation drives a headless browser; tests substitute
/// scripted fakes.
#[allow(async_fn_in_trait)]
pub trait Render {
    async fn render(&self, url: &str) -> Result<String, RenderError>;
}

/// Renders pages through a WebDriver-controlled headless browser.
///
/// Each attempt opens a fresh session and closes it unconditionally before the
/// result propagates, so no browser session outlives a render attempt.
pub struct Renderer {
    webdriver_url: String,
    nav_timeout: Duration,
    settle: Duration,
    attempts: u32,
}

impl Renderer {
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            nav_timeout: Duration::from_millis(config.render_timeout_ms),
            settle: Duration::from_millis(config.settle_ms),
            attempts: config.render_attempts.max(1),
        }
    }

    /// One end-to-end render attempt: open a session, load, tear down.
    async fn attempt(&self, url: &str) -> Result<String, RenderError> {
        let client = ClientBuilder::native()
            .connect(&self.webdriver_url)
            .await
            .map_err(|source| RenderError::Session {
                webdriver_url: self.webdriver_url.clone(),
                source,
            })?;

        let result = self.load(&client, url).await;

        // Session teardown on every exit path, including failures
        if let Err(e) = client.close().await {
            ::log::warn!("Failed to close browser session: {}", e);
        }

        result
    }

    async fn load(&self, client: &Client, url: &str) -> Result<String, RenderError> {
        match timeout(self.nav_timeout, client.goto(url)).await {
            Ok(Ok(())) => {}
            Ok(Err(source)) => {
                return Err(RenderError::Navigation {
                    url: url.to_string(),
                    source,
                });
            }
            Err(_) => {
                return Err(RenderError::Timeout {
                    url: url.to_string(),
                    timeout_ms: self.nav_timeout.as_millis() as u64,
                });
            }
        }

        // Navigation only waits for DOM construction; give client-side
        // rendering a fixed pause to settle before taking the source.
        tokio::time::sleep(self.settle).await;

        client
            .source()
            .await
            .map_err(|source| RenderError::Navigation {
                url: url.to_string(),
                source,
            })
    }
}

impl Render for Renderer {
    async fn render(&self, url: &str) -> Result<String, RenderError> {
        for attempt in 1..=self.attempts {
            ::log::info!("Loading page: {} (attempt {}/{})", url, attempt, self.attempts);

            match self.attempt(url).await {
                Ok(html) => {
                    ::log::info!("Page loaded ({} chars of HTML)", html.len());
                    return Ok(html);
                }
                Err(e) => {
                    if attempt == self.attempts {
                        ::log::error!(
                            "Giving up on {} after {} attempts: {}",
                            url,
                            self.attempts,
                            e
                        );
                        return Err(e);
                    }
                    ::log::warn!(
                        "Attempt {}/{} failed for {}: {}",
                        attempt,
                        self.attempts,
                        url,
                        e
                    );
                }
            }
        }

        unreachable!("retry loop always returns on the last attempt")
    }
}
