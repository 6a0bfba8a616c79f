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
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 无法启动浏览器或爬取实例
    #[error("Failed to launch crawler: {0}")]
    Launch(String),
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

/// Markdown生成选项
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownOptions {
    /// 只保留链接文本
    pub ignore_links: bool,
    /// 正文折行宽度，0表示不折行
    pub body_width: usize,
    /// 转义文本中的HTML特殊字符
    pub escape_html: bool,
    /// 跳过页内锚点链接
    pub skip_internal_links: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            ignore_links: true,
            body_width: 1000,
            escape_html: true,
            skip_internal_links: true,
        }
    }
}

/// 单次抓取的运行选项
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    /// 内容裁剪阈值
    pub pruning_threshold: f64,
    /// Markdown生成选项
    pub markdown: MarkdownOptions,
    /// 页面超时
    pub page_timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            pruning_threshold: 0.6,
            markdown: MarkdownOptions::default(),
            page_timeout: Duration::from_secs(60),
        }
    }
}

/// 引擎返回的页面结果
///
/// 引擎明确区分抓取成功与页面级失败（导航错误、被拦截等），
/// 传输层错误通过 `EngineError` 返回
#[derive(Debug, Clone, PartialEq)]
pub enum PageResult {
    /// 抓取成功
    Fetched {
        /// 整页markdown
        raw_markdown: String,
        /// 裁剪后的markdown
        fit_markdown: String,
    },
    /// 页面级失败
    Failed {
        /// 失败原因
        error_message: String,
    },
}

impl PageResult {
    /// 优先返回裁剪后的内容，裁剪结果为空时退回整页内容
    pub fn best_markdown(self) -> Option<String> {
        match self {
            PageResult::Fetched {
                raw_markdown,
                fit_markdown,
            } => {
                if fit_markdown.trim().is_empty() {
                    Some(raw_markdown)
                } else {
                    Some(fit_markdown)
                }
            }
            PageResult::Failed { .. } => None,
        }
    }
}

/// 爬取实例特质
///
/// 一次爬取调用内共享的浏览器/客户端实例，会话在实例内部划分状态。
/// 会话在首次抓取时惰性创建。
#[async_trait]
pub trait CrawlerInstance: Send + Sync {
    /// 在指定会话中抓取页面
    async fn fetch(
        &self,
        url: &str,
        session: &SessionKey,
        options: &RunOptions,
    ) -> Result<PageResult, EngineError>;

    /// 释放会话，未创建的会话为空操作
    async fn release_session(&self, session: &SessionKey);

    /// 关闭实例并释放所有资源
    async fn close(&self);
}

/// 抓取引擎特质
#[async_trait]
pub trait FetchEngine: Send + Sync {
    /// 启动一个新的爬取实例
    async fn launch(&self) -> Result<Arc<dyn CrawlerInstance>, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
