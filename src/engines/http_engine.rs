// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::session::SessionKey;
use crate::engines::content::render_page;
use crate::engines::traits::{CrawlerInstance, EngineError, FetchEngine, PageResult, RunOptions};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; crawldigest/0.1)";

/// HTTP抓取引擎
///
/// 基于reqwest实现，不执行JavaScript。每个会话对应一个带独立Cookie存储的客户端。
pub struct HttpEngine;

#[async_trait]
impl FetchEngine for HttpEngine {
    async fn launch(&self) -> Result<Arc<dyn CrawlerInstance>, EngineError> {
        Ok(Arc::new(HttpCrawler::new()))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// HTTP爬取实例
pub struct HttpCrawler {
    /// 会话到客户端的映射
    sessions: Mutex<HashMap<SessionKey, reqwest::Client>>,
}

impl HttpCrawler {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// 当前打开的会话数
    pub fn open_sessions(&self) -> usize {
        self.sessions.lock().len()
    }

    fn client_for(
        &self,
        session: &SessionKey,
        options: &RunOptions,
    ) -> Result<reqwest::Client, EngineError> {
        let mut sessions = self.sessions.lock();
        if let Some(client) = sessions.get(session) {
            return Ok(client.clone());
        }

        // Each session gets its own client for cookie isolation
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(options.page_timeout)
            .cookie_store(true)
            .build()?;
        debug!("Opened http session {}", session);
        sessions.insert(session.clone(), client.clone());
        Ok(client)
    }
}

impl Default for HttpCrawler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CrawlerInstance for HttpCrawler {
    async fn fetch(
        &self,
        url: &str,
        session: &SessionKey,
        options: &RunOptions,
    ) -> Result<PageResult, EngineError> {
        let client = self.client_for(session, options)?;

        let start = Instant::now();
        let response = client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                EngineError::Timeout
            } else {
                EngineError::RequestFailed(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Ok(PageResult::Failed {
                error_message: format!("HTTP {}", status),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();
        if !content_type.trim().is_empty()
            && !content_type.contains("html")
            && !content_type.starts_with("text/")
        {
            return Ok(PageResult::Failed {
                error_message: format!("Unsupported content type: {}", content_type),
            });
        }

        let html = response.text().await?;
        debug!(
            "Fetched {} ({} bytes) in {}ms",
            url,
            html.len(),
            start.elapsed().as_millis()
        );

        Ok(render_page(&html, options))
    }

    async fn release_session(&self, session: &SessionKey) {
        if self.sessions.lock().remove(session).is_some() {
            debug!("Released http session {}", session);
        }
    }

    async fn close(&self) {
        let released = {
            let mut sessions = self.sessions.lock();
            let count = sessions.len();
            sessions.clear();
            count
        };
        debug!("Closed http crawler ({} sessions released)", released);
    }
}

#[cfg(test)]
#[path = "http_engine_test.rs"]
mod tests;
