// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::sitemap::SitemapError;
use crate::domain::repositories::sitemap_source::SitemapSource;
use async_trait::async_trait;
use std::time::Duration;

/// 基于reqwest的站点地图来源
pub struct HttpSitemapSource {
    client: reqwest::Client,
}

impl HttpSitemapSource {
    /// 创建新的站点地图来源
    ///
    /// # 参数
    ///
    /// * `timeout` - 单个文档的请求超时
    pub fn new(timeout: Duration) -> Result<Self, SitemapError> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; crawldigest/0.1)")
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SitemapSource for HttpSitemapSource {
    async fn fetch(&self, url: &str) -> Result<String, SitemapError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitemapError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
