//! Chrome-backed implementation of the core `BrowserSession` trait.
//!
//! Candidate elements are tagged in-page with a `data-ps-node` attribute
//! carrying a monotonically increasing id, so a node keeps its handle across
//! scans for as long as it survives in the DOM.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use postscout_core::{Candidate, WaitCondition};
use serde::Deserialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::chrome::find_chrome;
use crate::error::{Error, Result};

/// Realistic desktop user agent; headless Chrome's default one gets feeds
/// served a bot interstitial instead of content.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

/// One scroll increment, in pixels.
const SCROLL_STEP_PX: u32 = 1500;

/// Polling interval for bounded waits.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Settle time after navigation so the first feed items render.
const NAVIGATE_SETTLE: Duration = Duration::from_secs(2);

/// How a [`ChromeSession`] is launched.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    /// Explicit Chrome binary; discovered automatically when `None`.
    pub chrome_path: Option<PathBuf>,
    /// Chrome user-data directory. Cookies persist here, which is what
    /// carries the login session between runs.
    pub profile_dir: Option<PathBuf>,
    pub user_agent: String,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_path: None,
            profile_dir: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// An exclusive browser session: one Chrome process, one page.
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl ChromeSession {
    /// Launch Chrome and open a blank page.
    pub async fn launch(options: &BrowserOptions) -> Result<Self> {
        let chrome = find_chrome(options.chrome_path.as_deref())?;
        debug!(path = %chrome.display(), headless = options.headless, "launching Chrome");

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome)
            .window_size(1280, 800)
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--lang=en-US")
            .arg(format!("--user-agent={}", options.user_agent));

        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(dir) = &options.profile_dir {
            builder = builder.user_data_dir(dir);
        }

        let config = builder
            .build()
            .map_err(|e| Error::Browser(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            Error::Browser(format!(
                "failed to launch Chrome: {e}. Is Chrome or Chromium installed?"
            ))
        })?;

        // The handler stream must be pumped for any CDP command to resolve.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler event error (continuing): {e}");
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    /// Close the page and shut Chrome down.
    pub async fn close(mut self) -> Result<()> {
        if let Err(e) = self.browser.close().await {
            warn!("browser close failed: {e}");
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        Ok(())
    }

    async fn eval<T: serde::de::DeserializeOwned>(&self, script: String) -> postscout_core::Result<T> {
        self.page
            .evaluate(script)
            .await
            .map_err(session_err)?
            .into_value::<T>()
            .map_err(|e| postscout_core::Error::Session(format!("unexpected script result: {e}")))
    }

    async fn url(&self) -> postscout_core::Result<String> {
        self.page
            .url()
            .await
            .map_err(session_err)?
            .ok_or_else(|| postscout_core::Error::Session("page has no URL".into()))
    }
}

fn session_err(e: chromiumoxide::error::CdpError) -> postscout_core::Error {
    postscout_core::Error::Session(e.to_string())
}

#[derive(Debug, Deserialize)]
struct TaggedNode {
    id: u64,
    text: String,
}

/// Walks rendered elements and returns the leaf-most text blocks of at
/// least `__MIN__` characters, tagging each with a stable id. Per-element
/// failures (nodes detached mid-walk) skip that element only.
const COLLECT_JS: &str = r#"
((min) => {
  if (!window.__psNodeSeq) { window.__psNodeSeq = 1; }
  const out = [];
  for (const el of document.body.querySelectorAll('*')) {
    try {
      if (!(el instanceof HTMLElement)) continue;
      const rect = el.getBoundingClientRect();
      if (rect.width === 0 || rect.height === 0) continue;
      const text = (el.innerText || '').trim();
      if (text.length < min) continue;
      let leafmost = true;
      for (const child of el.children) {
        if (((child.innerText || '').trim()).length >= text.length) { leafmost = false; break; }
      }
      if (!leafmost) continue;
      if (!el.dataset.psNode) { el.dataset.psNode = String(window.__psNodeSeq++); }
      out.push({ id: Number(el.dataset.psNode), text: text });
    } catch (e) { /* stale node: skip it */ }
  }
  return out;
})(__MIN__)
"#;

const VISIBLE_JS: &str = r#"
((needle) => {
  for (const el of document.body.querySelectorAll('*')) {
    try {
      if (!(el instanceof HTMLElement)) continue;
      const rect = el.getBoundingClientRect();
      if (rect.width === 0 || rect.height === 0) continue;
      if ((el.innerText || '').trim() === needle) return true;
    } catch (e) { /* stale node: skip it */ }
  }
  return false;
})(__NEEDLE__)
"#;

const CLICK_JS: &str = r#"
((id) => {
  const el = document.querySelector('[data-ps-node="' + id + '"]');
  if (!el) return false;
  el.scrollIntoView({ block: 'center' });
  el.click();
  return true;
})(__ID__)
"#;

const HEIGHT_JS: &str =
    "(document.scrollingElement || document.body).scrollHeight";

#[async_trait]
impl postscout_core::BrowserSession for ChromeSession {
    type Node = u64;

    async fn navigate(&self, url: &str) -> postscout_core::Result<()> {
        debug!(url, "navigating");
        self.page.goto(url).await.map_err(session_err)?;
        self.page.wait_for_navigation().await.map_err(session_err)?;
        tokio::time::sleep(NAVIGATE_SETTLE).await;
        Ok(())
    }

    async fn find_text_nodes(
        &self,
        min_len: usize,
    ) -> postscout_core::Result<Vec<Candidate<u64>>> {
        let script = COLLECT_JS.replace("__MIN__", &min_len.to_string());
        let nodes: Vec<TaggedNode> = self.eval(script).await?;
        Ok(nodes
            .into_iter()
            .map(|n| Candidate { node: n.id, text: n.text })
            .collect())
    }

    async fn is_visible(&self, exact_text: &str) -> postscout_core::Result<bool> {
        let needle = serde_json::to_string(exact_text)
            .map_err(|e| postscout_core::Error::Session(e.to_string()))?;
        self.eval(VISIBLE_JS.replace("__NEEDLE__", &needle)).await
    }

    async fn scroll_to_bottom(&self) -> postscout_core::Result<()> {
        self.page
            .evaluate(format!("window.scrollBy(0, {SCROLL_STEP_PX})"))
            .await
            .map_err(session_err)?;
        Ok(())
    }

    async fn content_height(&self) -> postscout_core::Result<u64> {
        self.eval(HEIGHT_JS.to_string()).await
    }

    async fn wait_for(
        &self,
        condition: WaitCondition,
        timeout: Duration,
    ) -> postscout_core::Result<bool> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let holds = match &condition {
                WaitCondition::ContentHeightAbove(h) => self.content_height().await? > *h,
                WaitCondition::UrlChangedFrom(url) => &self.url().await? != url,
            };
            if holds {
                return Ok(true);
            }
            if tokio::time::Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, node: &u64) -> postscout_core::Result<()> {
        let clicked: bool = self.eval(CLICK_JS.replace("__ID__", &node.to_string())).await?;
        if !clicked {
            return Err(postscout_core::Error::ClickFailed(format!(
                "element {node} is no longer in the DOM"
            )));
        }
        Ok(())
    }

    async fn current_url(&self) -> postscout_core::Result<String> {
        self.url().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = BrowserOptions::default();
        assert!(options.headless);
        assert!(options.chrome_path.is_none());
        assert!(options.profile_dir.is_none());
        assert!(options.user_agent.contains("Mozilla/5.0"));
    }

    #[test]
    fn test_scripts_use_the_shared_tag_attribute() {
        // The collector assigns the tag the click script looks up.
        assert!(COLLECT_JS.contains("dataset.psNode"));
        assert!(CLICK_JS.contains("data-ps-node"));
    }

    #[test]
    fn test_script_placeholders_substitute_cleanly() {
        let collect = COLLECT_JS.replace("__MIN__", "20");
        assert!(collect.contains("})(20)"));
        assert!(!collect.contains("__MIN__"));

        let needle = serde_json::to_string("he said \"hi\"").unwrap();
        let visible = VISIBLE_JS.replace("__NEEDLE__", &needle);
        assert!(visible.contains(r#"})("he said \"hi\"")"#));
    }

    // Live-Chrome behavior (navigation, scrolling, clicking) is exercised
    // against scripted sessions in postscout-core's tests; driving a real
    // browser requires an installed Chrome.
}
