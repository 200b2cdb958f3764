//! Browser control for page probing.
//!
//! Real browser control via the Chrome DevTools Protocol, using chromiumoxide
//! when compiled with the `browser` feature. The exploration loop itself only
//! sees the [`crate::driver::PageDriver`] trait, which [`Page`] implements by
//! evaluating the probing scripts in the target page.

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 900,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// Idempotent in-page install of the DOM mutation counter that backs settle
/// polling. Re-run after every navigation.
pub const MUTATION_OBSERVER_SCRIPT: &str = r#"
(() => {
    if (window.__sondearObserver) return true;
    window.__sondearMutations = 0;
    window.__sondearObserver = new MutationObserver((records) => {
        window.__sondearMutations += records.length;
    });
    window.__sondearObserver.observe(document.documentElement, {
        childList: true,
        subtree: true,
        attributes: true,
        characterData: true,
    });
    return true;
})()
"#;

#[cfg(feature = "browser")]
mod cdp {
    use super::{BrowserConfig, MUTATION_OBSERVER_SCRIPT};
    use crate::result::{SondearError, SondearResult};
    use crate::driver::PageDriver;
    use crate::probe::{ButtonCandidate, InputCandidate, ProbeReport, NODE_KEY_ATTR, PROBE_SCRIPT};
    use crate::snapshot::{PageSnapshot, SNAPSHOT_SCRIPT};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Browser instance with a live CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        #[allow(dead_code)]
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new browser instance
        pub async fn launch(config: BrowserConfig) -> SondearResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder.build().map_err(|e| SondearError::BrowserLaunch {
                message: e.to_string(),
            })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| SondearError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            // Drive the CDP event stream for the browser's lifetime
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Create a new page
        pub async fn new_page(&self) -> SondearResult<Page> {
            let browser = self.inner.lock().await;
            let cdp_page =
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| SondearError::Page {
                        message: e.to_string(),
                    })?;

            Ok(Page {
                url: String::from("about:blank"),
                inner: Arc::new(Mutex::new(cdp_page)),
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        pub async fn close(self) -> SondearResult<()> {
            let mut browser = self.inner.lock().await;
            browser
                .close()
                .await
                .map_err(|e| SondearError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }

    /// A browser page with a live CDP connection
    #[derive(Debug)]
    pub struct Page {
        url: String,
        inner: Arc<Mutex<CdpPage>>,
    }

    impl Page {
        /// Navigate to a URL and install the mutation counter
        pub async fn goto(&mut self, url: &str) -> SondearResult<()> {
            {
                let page = self.inner.lock().await;
                page.goto(url)
                    .await
                    .map_err(|e| SondearError::Navigation {
                        url: url.to_string(),
                        message: e.to_string(),
                    })?;
                page.wait_for_navigation()
                    .await
                    .map_err(|e| SondearError::Navigation {
                        url: url.to_string(),
                        message: e.to_string(),
                    })?;
            }
            self.url = url.to_string();
            self.install_observer().await
        }

        /// Get current URL
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }

        async fn install_observer(&self) -> SondearResult<()> {
            self.eval_value::<bool>(MUTATION_OBSERVER_SCRIPT).await?;
            Ok(())
        }

        async fn eval_value<T: serde::de::DeserializeOwned>(
            &self,
            expr: &str,
        ) -> SondearResult<T> {
            let page = self.inner.lock().await;
            let result = page
                .evaluate(expr)
                .await
                .map_err(|e| SondearError::Evaluation {
                    message: e.to_string(),
                })?;
            result.into_value().map_err(|e| SondearError::Evaluation {
                message: e.to_string(),
            })
        }
    }

    #[async_trait]
    impl PageDriver for Page {
        async fn snapshot(&self) -> SondearResult<PageSnapshot> {
            let mut payload: serde_json::Value = self
                .eval_value(SNAPSHOT_SCRIPT)
                .await
                .map_err(|e| SondearError::SnapshotUnavailable {
                    message: e.to_string(),
                })?;
            payload["timestamp"] = serde_json::json!(chrono::Utc::now());
            serde_json::from_value(payload).map_err(|e| SondearError::SnapshotUnavailable {
                message: e.to_string(),
            })
        }

        async fn probe(&self) -> SondearResult<ProbeReport> {
            self.eval_value(PROBE_SCRIPT).await
        }

        async fn fill(&self, input: &InputCandidate, value: &str) -> SondearResult<()> {
            // address by the stamped key; JSON-encode the value into a JS literal
            let literal = serde_json::to_string(value)?;
            let script = format!(
                r#"(() => {{
                    const el = document.querySelector('[{attr}="{key}"]');
                    if (!el) throw new Error('input not found');
                    el.value = {literal};
                    el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                    return true;
                }})()"#,
                attr = NODE_KEY_ATTR,
                key = input.node_key,
            );
            self.eval_value::<bool>(&script)
                .await
                .map_err(|e| SondearError::interaction(&input.id, e.to_string()))?;
            Ok(())
        }

        async fn click(&self, button: &ButtonCandidate) -> SondearResult<()> {
            let script = format!(
                r#"(() => {{
                    const el = document.querySelector('[{attr}="{key}"]');
                    if (!el) throw new Error('element not found');
                    el.click();
                    return true;
                }})()"#,
                attr = NODE_KEY_ATTR,
                key = button.node_key,
            );
            self.eval_value::<bool>(&script)
                .await
                .map_err(|e| SondearError::interaction(&button.id, e.to_string()))?;
            Ok(())
        }

        async fn reload(&self) -> SondearResult<()> {
            {
                let page = self.inner.lock().await;
                page.reload().await.map_err(|e| SondearError::Page {
                    message: e.to_string(),
                })?;
                page.wait_for_navigation()
                    .await
                    .map_err(|e| SondearError::Page {
                        message: e.to_string(),
                    })?;
            }
            // navigation wiped the counter; reinstall before anyone polls it
            self.install_observer().await
        }

        async fn mutation_count(&self) -> SondearResult<u64> {
            self.eval_value("window.__sondearMutations || 0").await
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::{Browser, Page};
