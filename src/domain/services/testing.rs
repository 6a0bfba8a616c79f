// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 爬取服务单元测试使用的模拟引擎与内存探针

use crate::domain::models::session::SessionKey;
use crate::engines::session_gate::SessionGate;
use crate::engines::traits::{CrawlerInstance, EngineError, FetchEngine, PageResult, RunOptions};
use crate::infrastructure::observability::memory::MemoryProbe;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 模拟爬取实例
///
/// URL中包含 `panic`/`error`/`fail`/`slow` 时分别模拟panic、引擎错误、
/// 页面失败和长时间挂起，其余URL返回 `content of {url}`
#[derive(Default)]
pub struct MockInstance {
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub fetches: Mutex<Vec<(String, SessionKey)>>,
    pub released: Mutex<Vec<SessionKey>>,
    pub closed: AtomicUsize,
}

impl MockInstance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn released(&self) -> Vec<SessionKey> {
        self.released.lock().clone()
    }

    pub fn sessions_used(&self) -> Vec<SessionKey> {
        self.fetches.lock().iter().map(|(_, s)| s.clone()).collect()
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CrawlerInstance for MockInstance {
    async fn fetch(
        &self,
        url: &str,
        session: &SessionKey,
        _options: &RunOptions,
    ) -> Result<PageResult, EngineError> {
        self.fetches.lock().push((url.to_string(), session.clone()));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if url.contains("slow") {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if url.contains("panic") {
            panic!("fetch exploded on {}", url);
        }
        if url.contains("error") {
            return Err(EngineError::Other("connection reset".to_string()));
        }
        if url.contains("fail") {
            return Ok(PageResult::Failed {
                error_message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }

        Ok(PageResult::Fetched {
            raw_markdown: format!("raw {}", url),
            fit_markdown: format!("content of {}", url),
        })
    }

    async fn release_session(&self, session: &SessionKey) {
        self.released.lock().push(session.clone());
    }

    async fn close(&self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// 单文档模拟实例
///
/// 与浏览器标签页一样，每个会话同时只持有一个当前文档。
/// 导航后让出执行权再读取，同会话的并发抓取若未经闸门排队会读到别人的文档
#[derive(Default)]
pub struct TabInstance {
    documents: Mutex<HashMap<SessionKey, String>>,
    gate: SessionGate,
}

impl TabInstance {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CrawlerInstance for TabInstance {
    async fn fetch(
        &self,
        url: &str,
        session: &SessionKey,
        _options: &RunOptions,
    ) -> Result<PageResult, EngineError> {
        let _turn = self.gate.enter(session).await;
        self.documents
            .lock()
            .insert(session.clone(), url.to_string());
        tokio::time::sleep(Duration::from_millis(5)).await;
        let document = self
            .documents
            .lock()
            .get(session)
            .cloned()
            .unwrap_or_default();

        Ok(PageResult::Fetched {
            raw_markdown: format!("raw {}", document),
            fit_markdown: format!("content of {}", document),
        })
    }

    async fn release_session(&self, session: &SessionKey) {
        self.gate.forget(session);
        self.documents.lock().remove(session);
    }

    async fn close(&self) {
        self.gate.clear();
        self.documents.lock().clear();
    }
}

/// 模拟引擎，每次启动返回同一个实例以便检查
pub struct MockEngine {
    pub instance: Arc<MockInstance>,
    pub launches: AtomicUsize,
    pub fail_launch: bool,
}

impl MockEngine {
    pub fn new(instance: MockInstance) -> Self {
        Self {
            instance: Arc::new(instance),
            launches: AtomicUsize::new(0),
            fail_launch: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_launch: true,
            ..Self::new(MockInstance::new())
        }
    }
}

#[async_trait]
impl FetchEngine for MockEngine {
    async fn launch(&self) -> Result<Arc<dyn CrawlerInstance>, EngineError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail_launch {
            return Err(EngineError::Launch("no chrome".to_string()));
        }
        Ok(self.instance.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// 按顺序返回预设采样值的内存探针
pub struct ScriptedProbe {
    values: Vec<u64>,
    next: AtomicUsize,
    pub observed: Mutex<Vec<u64>>,
}

impl ScriptedProbe {
    pub fn new(values: Vec<u64>) -> Self {
        Self {
            values,
            next: AtomicUsize::new(0),
            observed: Mutex::new(Vec::new()),
        }
    }
}

impl MemoryProbe for ScriptedProbe {
    fn sample(&self) -> u64 {
        let i = self.next.fetch_add(1, Ordering::SeqCst);
        let value = if self.values.is_empty() {
            0
        } else {
            self.values[i % self.values.len()]
        };
        self.observed.lock().push(value);
        value
    }
}
