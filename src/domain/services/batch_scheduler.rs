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

use crate::domain::models::outcome::{CrawlReport, FetchOutcome};
use crate::domain::models::session::{SessionKey, SessionStrategy};
use crate::domain::services::page_fetch::guarded_fetch;
use crate::domain::services::result_aggregator::OrderedResults;
use crate::engines::traits::{CrawlerInstance, RunOptions};
use crate::infrastructure::observability::memory::{as_megabytes, MemoryProbe, PeakMemoryTracker};
use futures::future::join_all;
use metrics::{counter, gauge, histogram};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// 默认并发数
pub const DEFAULT_MAX_CONCURRENT: usize = 3;

/// 并行批次调度器
///
/// 将URL按 `max_concurrent` 切分为连续批次，批内并发抓取，批间串行。
/// 每个批次前后各采样一次内存并更新峰值。
pub struct ParallelBatchScheduler {
    /// 批大小
    max_concurrent: NonZeroUsize,
    /// 会话策略
    strategy: SessionStrategy,
    /// 批次超时
    batch_timeout: Option<Duration>,
    /// 抓取选项
    options: RunOptions,
    /// 内存探针
    probe: Arc<dyn MemoryProbe>,
}

impl ParallelBatchScheduler {
    pub fn new(
        max_concurrent: NonZeroUsize,
        options: RunOptions,
        probe: Arc<dyn MemoryProbe>,
    ) -> Self {
        Self {
            max_concurrent,
            strategy: SessionStrategy::default(),
            batch_timeout: None,
            options,
            probe,
        }
    }

    pub fn with_strategy(mut self, strategy: SessionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_batch_timeout(mut self, batch_timeout: Option<Duration>) -> Self {
        self.batch_timeout = batch_timeout;
        self
    }

    /// 分批并行爬取
    ///
    /// # 参数
    ///
    /// * `instance` - 本次调用的爬取实例，由调用方负责关闭
    /// * `urls` - 待爬取URL
    ///
    /// # 返回值
    ///
    /// 爬取报告，内容与输入等长同序
    pub async fn crawl(&self, instance: &dyn CrawlerInstance, urls: &[String]) -> CrawlReport {
        if urls.is_empty() {
            return CrawlReport::empty();
        }

        let batch_size = self.max_concurrent.get();
        let tracker = PeakMemoryTracker::new();
        let run_session = SessionKey::new(format!("parallel_run_{}", Uuid::new_v4()));
        let mut results = OrderedResults::with_len(urls.len());
        let mut batches = 0;

        for (batch_index, chunk) in urls.chunks(batch_size).enumerate() {
            let offset = batch_index * batch_size;

            let before = self.probe.sample();
            tracker.record(before);
            let started = Instant::now();

            let outcomes = self.run_batch(instance, offset, chunk, &run_session).await;
            for (i, outcome) in outcomes.into_iter().enumerate() {
                results.place(offset + i, outcome);
            }

            let after = self.probe.sample();
            tracker.record(after);
            histogram!("crawl_batch_duration_seconds").record(started.elapsed().as_secs_f64());
            batches += 1;

            info!(
                "Batch {} ({} urls) done: memory before {:.2} MB, after {:.2} MB",
                batch_index + 1,
                chunk.len(),
                as_megabytes(before),
                as_megabytes(after)
            );
        }

        if self.strategy == SessionStrategy::SharedPerRun {
            instance.release_session(&run_session).await;
        }

        let peak = tracker.peak();
        gauge!("crawl_peak_memory_bytes").set(peak as f64);

        let succeeded = results.succeeded();
        let failed = results.failed();
        info!(
            "Parallel crawl finished: {} succeeded, {} failed, {} batches, peak memory {:.2} MB",
            succeeded,
            failed,
            batches,
            as_megabytes(peak)
        );

        CrawlReport {
            contents: results.into_contents(),
            peak_memory_bytes: peak,
            batches,
            succeeded,
            failed,
        }
    }

    async fn run_batch(
        &self,
        instance: &dyn CrawlerInstance,
        offset: usize,
        chunk: &[String],
        run_session: &SessionKey,
    ) -> Vec<FetchOutcome> {
        let deadline = self.batch_timeout.map(|t| Instant::now() + t);

        let items = chunk.iter().enumerate().map(|(i, url)| {
            let session = match self.strategy {
                SessionStrategy::PerItem => SessionKey::for_item(offset + i),
                SessionStrategy::SharedPerRun => run_session.clone(),
            };

            async move {
                let fetch = guarded_fetch(instance, url, &session, &self.options);
                let outcome = match deadline {
                    Some(deadline) => match tokio::time::timeout_at(deadline, fetch).await {
                        Ok(outcome) => outcome,
                        Err(_) => {
                            warn!("Batch deadline passed before {} finished", url);
                            counter!("crawl_pages_total", "outcome" => "failure").increment(1);
                            FetchOutcome::failure("batch timed out")
                        }
                    },
                    None => fetch.await,
                };

                if self.strategy == SessionStrategy::PerItem {
                    instance.release_session(&session).await;
                }
                outcome
            }
        });

        join_all(items).await
    }
}

#[cfg(test)]
#[path = "batch_scheduler_test.rs"]
mod tests;
