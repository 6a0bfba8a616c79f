// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::outcome::FetchOutcome;
use crate::domain::models::session::SessionKey;
use crate::engines::traits::{CrawlerInstance, PageResult, RunOptions};
use futures::FutureExt;
use metrics::counter;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, warn};

/// 在会话中抓取单个URL并转换为结果值
///
/// 引擎错误、页面失败和抓取过程中的panic都会被转换为 `FetchOutcome::Failure`，
/// 不会向调用方传播
pub async fn guarded_fetch(
    instance: &dyn CrawlerInstance,
    url: &str,
    session: &SessionKey,
    options: &RunOptions,
) -> FetchOutcome {
    let outcome = match AssertUnwindSafe(instance.fetch(url, session, options))
        .catch_unwind()
        .await
    {
        Ok(Ok(PageResult::Failed { error_message })) => {
            warn!("Failed to crawl {}: {}", url, error_message);
            FetchOutcome::failure(error_message)
        }
        Ok(Ok(page)) => match page.best_markdown() {
            Some(content) => {
                debug!("Crawled {} ({} chars)", url, content.len());
                FetchOutcome::success(content)
            }
            None => FetchOutcome::failure("no content"),
        },
        Ok(Err(e)) => {
            warn!("Error crawling {}: {}", url, e);
            FetchOutcome::failure(e.to_string())
        }
        Err(panic) => {
            let reason = panic_message(panic.as_ref());
            error!("Crawl of {} panicked: {}", url, reason);
            FetchOutcome::failure(reason)
        }
    };

    let label = if outcome.is_success() {
        "success"
    } else {
        "failure"
    };
    counter!("crawl_pages_total", "outcome" => label).increment(1);
    outcome
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {}", s)
    } else {
        "panic".to_string()
    }
}
