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

use crate::domain::models::session::{CrawlMode, SessionStrategy};
use crate::engines::traits::{MarkdownOptions, RunOptions};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含服务器、爬取器、内容处理、浏览器、站点地图和指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 爬取器配置
    pub crawler: CrawlerSettings,
    /// 内容处理配置
    pub content: ContentSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 站点地图配置
    pub sitemap: SitemapSettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 抓取引擎类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// 无头浏览器
    Browser,
    /// 纯HTTP
    Http,
}

/// 爬取器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSettings {
    /// 抓取引擎
    pub engine: EngineKind,
    /// 默认并发数（批大小）
    pub max_concurrent: usize,
    /// 并行模式的会话策略
    pub session_strategy: SessionStrategy,
    /// 站点爬取的默认模式
    pub default_mode: CrawlMode,
    /// 批次超时时间（秒），未设置表示不限
    pub batch_timeout_secs: Option<u64>,
    /// 单页超时时间（秒）
    pub page_timeout_secs: u64,
}

/// 内容处理配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ContentSettings {
    /// 内容裁剪阈值
    pub pruning_threshold: f64,
    /// 只保留链接文本
    pub ignore_links: bool,
    /// 正文折行宽度
    pub body_width: usize,
    /// 转义HTML特殊字符
    pub escape_html: bool,
    /// 跳过页内锚点链接
    pub skip_internal_links: bool,
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 是否无头模式
    pub headless: bool,
    /// 远程Chrome调试地址，设置后连接而非启动
    pub remote_debugging_url: Option<String>,
    /// 额外的启动参数
    pub extra_args: Vec<String>,
    /// CDP请求超时时间（秒）
    pub request_timeout_secs: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            remote_debugging_url: None,
            extra_args: vec![
                "--disable-gpu".to_string(),
                "--disable-dev-shm-usage".to_string(),
            ],
            request_timeout_secs: 30,
        }
    }
}

/// 站点地图配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SitemapSettings {
    /// 获取超时时间（秒）
    pub timeout_secs: u64,
    /// 最大嵌套深度
    pub max_depth: usize,
    /// 输出URL数量上限
    pub max_urls: Option<usize>,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// 是否启用Prometheus导出
    pub enabled: bool,
    /// 导出监听地址
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从默认值、配置文件和环境变量加载配置
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("CRAWLDIGEST").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Server
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            // Crawler
            .set_default("crawler.engine", "browser")?
            .set_default("crawler.max_concurrent", 3)?
            .set_default("crawler.session_strategy", "per_item")?
            .set_default("crawler.default_mode", "sequential")?
            .set_default("crawler.page_timeout_secs", 60)?
            // Content pipeline
            .set_default("content.pruning_threshold", 0.6)?
            .set_default("content.ignore_links", true)?
            .set_default("content.body_width", 1000)?
            .set_default("content.escape_html", true)?
            .set_default("content.skip_internal_links", true)?
            // Browser
            .set_default("browser.headless", true)?
            .set_default(
                "browser.extra_args",
                vec!["--disable-gpu", "--disable-dev-shm-usage"],
            )?
            .set_default("browser.request_timeout_secs", 30)?
            // Sitemap
            .set_default("sitemap.timeout_secs", 30)?
            .set_default("sitemap.max_depth", 8)?
            // Metrics
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }

    /// 仅使用内置默认值构建配置
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    /// 每次抓取的运行选项
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            pruning_threshold: self.content.pruning_threshold,
            markdown: MarkdownOptions {
                ignore_links: self.content.ignore_links,
                body_width: self.content.body_width,
                escape_html: self.content.escape_html,
                skip_internal_links: self.content.skip_internal_links,
            },
            page_timeout: Duration::from_secs(self.crawler.page_timeout_secs),
        }
    }

    /// 批次超时
    pub fn batch_timeout(&self) -> Option<Duration> {
        self.crawler.batch_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
