// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use crawldigest::domain::models::session::SessionKey;
use crawldigest::engines::traits::{
    CrawlerInstance, EngineError, FetchEngine, PageResult, RunOptions,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 模拟爬取实例
///
/// 路径以 `/broken` 结尾的URL返回页面失败，其余返回固定markdown
#[derive(Default)]
pub struct MockInstance {
    pub fetched: Mutex<Vec<String>>,
    pub released: AtomicUsize,
    pub closed: AtomicUsize,
}

#[async_trait]
impl CrawlerInstance for MockInstance {
    async fn fetch(
        &self,
        url: &str,
        _session: &SessionKey,
        _options: &RunOptions,
    ) -> Result<PageResult, EngineError> {
        self.fetched.lock().push(url.to_string());
        if url.ends_with("/broken") {
            return Ok(PageResult::Failed {
                error_message: "net::ERR_ABORTED".to_string(),
            });
        }
        Ok(PageResult::Fetched {
            raw_markdown: format!("# Page\n\n{}", url),
            fit_markdown: format!("md:{}", url),
        })
    }

    async fn release_session(&self, _session: &SessionKey) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }

    async fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// 模拟引擎
pub struct MockEngine {
    pub instance: Arc<MockInstance>,
    pub launches: AtomicUsize,
    launch_error: Option<String>,
}

impl MockEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            instance: Arc::new(MockInstance::default()),
            launches: AtomicUsize::new(0),
            launch_error: None,
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            instance: Arc::new(MockInstance::default()),
            launches: AtomicUsize::new(0),
            launch_error: Some(message.to_string()),
        })
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FetchEngine for MockEngine {
    async fn launch(&self) -> Result<Arc<dyn CrawlerInstance>, EngineError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        match &self.launch_error {
            Some(message) => Err(EngineError::Launch(message.clone())),
            None => Ok(self.instance.clone()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
