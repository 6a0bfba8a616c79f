// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::session::SessionKey;
use crate::domain::services::page_fetch::guarded_fetch;
use crate::domain::services::result_aggregator::OrderedResults;
use crate::engines::traits::{CrawlerInstance, RunOptions};
use tracing::info;

/// 顺序爬取器
///
/// 整个运行复用同一个会话，按输入顺序逐个抓取
pub struct SequentialCrawler {
    options: RunOptions,
}

impl SequentialCrawler {
    pub fn new(options: RunOptions) -> Self {
        Self { options }
    }

    /// 顺序爬取URL列表
    ///
    /// # 参数
    ///
    /// * `instance` - 本次调用的爬取实例
    /// * `urls` - 待爬取URL
    ///
    /// # 返回值
    ///
    /// 与输入等长、同序的内容列表，失败项为空字符串
    pub async fn crawl(&self, instance: &dyn CrawlerInstance, urls: &[String]) -> Vec<String> {
        let session = SessionKey::new("sequential_session");
        let mut results = OrderedResults::with_len(urls.len());

        for (index, url) in urls.iter().enumerate() {
            let outcome = guarded_fetch(instance, url, &session, &self.options).await;
            results.place(index, outcome);
        }

        // Fetches cannot unwind past guarded_fetch, so this always runs
        instance.release_session(&session).await;

        info!(
            "Sequential crawl finished: {} succeeded, {} failed",
            results.succeeded(),
            results.failed()
        );
        results.into_contents()
    }
}
