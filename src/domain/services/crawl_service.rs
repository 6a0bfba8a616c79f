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

use crate::domain::models::outcome::CrawlReport;
use crate::domain::models::session::{CrawlMode, SessionStrategy};
use crate::domain::services::batch_scheduler::ParallelBatchScheduler;
use crate::domain::services::sequential_crawler::SequentialCrawler;
use crate::domain::services::sitemap_resolver::SitemapResolver;
use crate::engines::traits::{CrawlerInstance, EngineError, FetchEngine, RunOptions};
use crate::infrastructure::observability::memory::MemoryProbe;
use futures::FutureExt;
use metrics::counter;
use std::future::Future;
use std::num::NonZeroUsize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

/// 爬取错误类型
///
/// 只有请求校验失败和引擎启动失败会返回给调用方，
/// 单个页面的失败体现为结果中的空字符串
#[derive(Error, Debug)]
pub enum CrawlError {
    /// 请求参数无效
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// 引擎错误
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

/// 爬取服务配置
#[derive(Debug, Clone)]
pub struct CrawlServiceConfig {
    /// 抓取选项
    pub run_options: RunOptions,
    /// 默认并发数
    pub max_concurrent: usize,
    /// 并行模式会话策略
    pub session_strategy: SessionStrategy,
    /// 批次超时
    pub batch_timeout: Option<Duration>,
    /// 站点爬取默认模式
    pub default_mode: CrawlMode,
}

impl Default for CrawlServiceConfig {
    fn default() -> Self {
        Self {
            run_options: RunOptions::default(),
            max_concurrent: 3,
            session_strategy: SessionStrategy::PerItem,
            batch_timeout: None,
            default_mode: CrawlMode::Sequential,
        }
    }
}

/// 爬取服务
///
/// 编排站点地图解析、爬取实例生命周期以及顺序/并行爬取
pub struct CrawlService {
    /// 抓取引擎
    engine: Arc<dyn FetchEngine>,
    /// 站点地图解析器
    resolver: SitemapResolver,
    /// 内存探针
    probe: Arc<dyn MemoryProbe>,
    /// 服务配置
    config: CrawlServiceConfig,
}

impl CrawlService {
    /// 创建新的爬取服务实例
    ///
    /// # 参数
    ///
    /// * `engine` - 抓取引擎
    /// * `resolver` - 站点地图解析器
    /// * `probe` - 内存探针
    /// * `config` - 服务配置
    pub fn new(
        engine: Arc<dyn FetchEngine>,
        resolver: SitemapResolver,
        probe: Arc<dyn MemoryProbe>,
        config: CrawlServiceConfig,
    ) -> Self {
        Self {
            engine,
            resolver,
            probe,
            config,
        }
    }

    pub fn default_mode(&self) -> CrawlMode {
        self.config.default_mode
    }

    /// 爬取显式URL列表（顺序）
    pub async fn crawl_urls(&self, urls: &[String]) -> Result<Vec<String>, CrawlError> {
        self.crawl_sequential(urls).await
    }

    /// 顺序爬取
    pub async fn crawl_sequential(&self, urls: &[String]) -> Result<Vec<String>, CrawlError> {
        validate_urls(urls)?;
        self.run_sequential(urls).await
    }

    async fn run_sequential(&self, urls: &[String]) -> Result<Vec<String>, CrawlError> {
        if urls.is_empty() {
            return Ok(Vec::new());
        }
        counter!("crawl_runs_total", "mode" => "sequential").increment(1);

        let crawler = SequentialCrawler::new(self.config.run_options.clone());
        self.with_instance(|instance| async move { crawler.crawl(instance.as_ref(), urls).await })
            .await
    }

    /// 并行爬取
    ///
    /// # 参数
    ///
    /// * `urls` - 待爬取URL
    /// * `max_concurrent` - 批大小，未指定时使用配置值
    pub async fn crawl_parallel(
        &self,
        urls: &[String],
        max_concurrent: Option<usize>,
    ) -> Result<CrawlReport, CrawlError> {
        let max_concurrent = self.batch_size(max_concurrent)?;
        validate_urls(urls)?;
        self.run_parallel(urls, max_concurrent).await
    }

    async fn run_parallel(
        &self,
        urls: &[String],
        max_concurrent: NonZeroUsize,
    ) -> Result<CrawlReport, CrawlError> {
        if urls.is_empty() {
            return Ok(CrawlReport::empty());
        }
        counter!("crawl_runs_total", "mode" => "parallel").increment(1);

        let scheduler = ParallelBatchScheduler::new(
            max_concurrent,
            self.config.run_options.clone(),
            self.probe.clone(),
        )
        .with_strategy(self.config.session_strategy)
        .with_batch_timeout(self.config.batch_timeout);

        self.with_instance(|instance| async move { scheduler.crawl(instance.as_ref(), urls).await })
            .await
    }

    /// 解析站点地图并爬取全部页面
    ///
    /// # 参数
    ///
    /// * `sitemap_url` - 站点地图URL
    /// * `mode` - 爬取模式，未指定时使用配置的默认模式
    /// * `max_concurrent` - 并行模式的批大小
    ///
    /// # 返回值
    ///
    /// 与解析出的URL等长同序的内容列表
    pub async fn crawl_website(
        &self,
        sitemap_url: &str,
        mode: Option<CrawlMode>,
        max_concurrent: Option<usize>,
    ) -> Result<Vec<String>, CrawlError> {
        validate_url(sitemap_url)?;
        let mode = mode.unwrap_or(self.config.default_mode);
        // Reject a bad batch size before doing any network work
        let batch_size = self.batch_size(max_concurrent)?;

        let urls = self.resolver.resolve(sitemap_url).await;
        info!("Resolved {} urls from {}", urls.len(), sitemap_url);
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        match mode {
            CrawlMode::Sequential => self.run_sequential(&urls).await,
            CrawlMode::Parallel => Ok(self.run_parallel(&urls, batch_size).await?.contents),
        }
    }

    /// 仅解析站点地图
    pub async fn sitemap_urls(&self, sitemap_url: &str) -> Result<Vec<String>, CrawlError> {
        validate_url(sitemap_url)?;
        Ok(self.resolver.resolve(sitemap_url).await)
    }

    fn batch_size(&self, requested: Option<usize>) -> Result<NonZeroUsize, CrawlError> {
        let value = requested.unwrap_or(self.config.max_concurrent);
        NonZeroUsize::new(value)
            .ok_or_else(|| CrawlError::InvalidRequest("max_concurrent must be at least 1".into()))
    }

    /// 启动爬取实例并执行任务，任务panic或请求被取消时同样关闭实例
    async fn with_instance<F, Fut, T>(&self, run: F) -> Result<T, CrawlError>
    where
        F: FnOnce(Arc<dyn CrawlerInstance>) -> Fut,
        Fut: Future<Output = T>,
    {
        let instance = self.engine.launch().await.map_err(|e| {
            error!("Failed to launch {} crawler: {}", self.engine.name(), e);
            e
        })?;

        let guard = CloseOnDrop::new(instance.clone());
        let result = AssertUnwindSafe(run(instance)).catch_unwind().await;
        if let Some(instance) = guard.disarm() {
            instance.close().await;
        }

        match result {
            Ok(value) => Ok(value),
            Err(_) => {
                error!("Crawl run panicked; crawler instance was closed");
                Err(CrawlError::Engine(EngineError::Other(
                    "crawl run panicked".to_string(),
                )))
            }
        }
    }
}

/// 调用方放弃请求时仍关闭爬取实例
///
/// 正常结束时通过 `disarm` 取回实例并就地关闭；若在运行中被丢弃，
/// 则在当前运行时上派生任务完成关闭
struct CloseOnDrop {
    instance: Option<Arc<dyn CrawlerInstance>>,
}

impl CloseOnDrop {
    fn new(instance: Arc<dyn CrawlerInstance>) -> Self {
        Self {
            instance: Some(instance),
        }
    }

    fn disarm(mut self) -> Option<Arc<dyn CrawlerInstance>> {
        self.instance.take()
    }
}

impl Drop for CloseOnDrop {
    fn drop(&mut self) {
        let Some(instance) = self.instance.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!("Crawl run cancelled; closing crawler instance in background");
                handle.spawn(async move {
                    instance.close().await;
                });
            }
            Err(_) => warn!("Crawl run cancelled outside a runtime; crawler instance left open"),
        }
    }
}

fn validate_url(raw: &str) -> Result<(), CrawlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CrawlError::InvalidRequest("url must not be empty".into()));
    }
    let parsed = Url::parse(trimmed)
        .map_err(|e| CrawlError::InvalidRequest(format!("invalid url '{}': {}", raw, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CrawlError::InvalidRequest(format!(
            "unsupported url scheme '{}' in '{}'",
            parsed.scheme(),
            raw
        )));
    }
    Ok(())
}

fn validate_urls(urls: &[String]) -> Result<(), CrawlError> {
    urls.iter().try_for_each(|u| validate_url(u))
}

#[cfg(test)]
#[path = "crawl_service_test.rs"]
mod tests;
