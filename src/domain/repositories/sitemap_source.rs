// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::sitemap::SitemapError;
use async_trait::async_trait;

/// 站点地图来源特质
///
/// 按URL获取站点地图文档的原始文本
#[async_trait]
pub trait SitemapSource: Send + Sync {
    /// 获取站点地图文档
    async fn fetch(&self, url: &str) -> Result<String, SitemapError>;
}
