// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::domain::models::session::SessionKey;
use crate::engines::content::render_page;
use crate::engines::session_gate::SessionGate;
use crate::engines::traits::{CrawlerInstance, EngineError, FetchEngine, PageResult, RunOptions};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 浏览器抓取引擎
///
/// 基于chromiumoxide实现的无头浏览器引擎，每次爬取调用启动一个浏览器实例
pub struct BrowserEngine {
    settings: BrowserSettings,
}

impl BrowserEngine {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }

    fn browser_config(&self) -> Result<BrowserConfig, EngineError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(Duration::from_secs(self.settings.request_timeout_secs));

        if !self.settings.headless {
            builder = builder.with_head();
        }
        for arg in &self.settings.extra_args {
            builder = builder.arg(arg.as_str());
        }

        builder.build().map_err(EngineError::Launch)
    }
}

#[async_trait]
impl FetchEngine for BrowserEngine {
    async fn launch(&self) -> Result<Arc<dyn CrawlerInstance>, EngineError> {
        let (browser, mut handler) = if let Some(url) = &self.settings.remote_debugging_url {
            info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url).await.map_err(|e| {
                EngineError::Launch(format!("Failed to connect to remote Chrome: {}", e))
            })?
        } else {
            Browser::launch(self.browser_config()?)
                .await
                .map_err(|e| EngineError::Launch(e.to_string()))?
        };

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        debug!("Browser launched");
        Ok(Arc::new(BrowserCrawler {
            browser: RwLock::new(Some(browser)),
            handler_task: parking_lot::Mutex::new(Some(handler_task)),
            pages: parking_lot::Mutex::new(HashMap::new()),
            gate: SessionGate::new(),
        }))
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}

/// 浏览器爬取实例
///
/// 每个会话对应一个标签页，同一会话内的抓取复用该标签页。
/// 标签页同一时刻只承载一个文档，同会话的抓取经由闸门依次执行。
pub struct BrowserCrawler {
    browser: RwLock<Option<Browser>>,
    handler_task: parking_lot::Mutex<Option<JoinHandle<()>>>,
    pages: parking_lot::Mutex<HashMap<SessionKey, Page>>,
    gate: SessionGate,
}

impl BrowserCrawler {
    async fn page_for(&self, session: &SessionKey) -> Result<Page, EngineError> {
        if let Some(page) = self.pages.lock().get(session) {
            return Ok(page.clone());
        }

        let page = {
            let browser = self.browser.read().await;
            let browser = browser
                .as_ref()
                .ok_or_else(|| EngineError::Other("Browser already closed".to_string()))?;
            browser
                .new_page("about:blank")
                .await
                .map_err(|e| EngineError::Other(e.to_string()))?
        };

        let existing = {
            let mut pages = self.pages.lock();
            match pages.get(session) {
                Some(existing) => Some(existing.clone()),
                None => {
                    pages.insert(session.clone(), page.clone());
                    None
                }
            }
        };

        match existing {
            // Lost a creation race, keep the first page
            Some(existing) => {
                if let Err(e) = page.close().await {
                    warn!("Failed to close duplicate page for {}: {}", session, e);
                }
                Ok(existing)
            }
            None => {
                debug!("Opened browser session {}", session);
                Ok(page)
            }
        }
    }
}

#[async_trait]
impl CrawlerInstance for BrowserCrawler {
    async fn fetch(
        &self,
        url: &str,
        session: &SessionKey,
        options: &RunOptions,
    ) -> Result<PageResult, EngineError> {
        // Held across goto and content; the tab holds one document
        let _turn = self.gate.enter(session).await;
        let page = self.page_for(session).await?;
        let start = Instant::now();

        let html = tokio::time::timeout(options.page_timeout, async {
            if let Err(e) = page.goto(url).await {
                return Ok::<_, EngineError>(Err(e.to_string()));
            }
            let content = page
                .content()
                .await
                .map_err(|e| EngineError::Other(e.to_string()))?;
            Ok(Ok(content))
        })
        .await
        .map_err(|_| EngineError::Timeout)??;

        match html {
            Ok(html) => {
                debug!(
                    "Rendered {} ({} bytes) in {}ms",
                    url,
                    html.len(),
                    start.elapsed().as_millis()
                );
                Ok(render_page(&html, options))
            }
            Err(error_message) => Ok(PageResult::Failed { error_message }),
        }
    }

    async fn release_session(&self, session: &SessionKey) {
        self.gate.forget(session);
        let page = self.pages.lock().remove(session);
        if let Some(page) = page {
            if let Err(e) = page.close().await {
                warn!("Failed to close page for session {}: {}", session, e);
            } else {
                debug!("Released browser session {}", session);
            }
        }
    }

    async fn close(&self) {
        self.gate.clear();
        let pages: Vec<(SessionKey, Page)> = self.pages.lock().drain().collect();
        for (session, page) in pages {
            if let Err(e) = page.close().await {
                warn!("Failed to close page for session {}: {}", session, e);
            }
        }

        if let Some(mut browser) = self.browser.write().await.take() {
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser: {}", e);
            }
            if let Err(e) = browser.wait().await {
                warn!("Failed to wait for browser exit: {}", e);
            }
        }

        if let Some(task) = self.handler_task.lock().take() {
            task.abort();
        }
        debug!("Browser closed");
    }
}
