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

use crate::domain::models::sitemap::SitemapDocument;
use crate::domain::repositories::sitemap_source::SitemapSource;
use metrics::counter;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 默认最大嵌套深度
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// 站点地图解析器
///
/// 获取站点地图并递归展开索引，按文档顺序（深度优先）输出去重后的页面URL。
/// 任何节点的网络或解析失败只会让该节点贡献空结果，不会向上抛出。
pub struct SitemapResolver {
    /// 文档来源
    source: Arc<dyn SitemapSource>,
    /// 最大嵌套深度
    max_depth: usize,
    /// 输出URL数量上限
    max_urls: Option<usize>,
}

impl SitemapResolver {
    /// 创建新的站点地图解析器
    pub fn new(source: Arc<dyn SitemapSource>) -> Self {
        Self {
            source,
            max_depth: DEFAULT_MAX_DEPTH,
            max_urls: None,
        }
    }

    /// 使用指定限制创建站点地图解析器
    ///
    /// # 参数
    ///
    /// * `source` - 文档来源
    /// * `max_depth` - 最大嵌套深度，根文档深度为0
    /// * `max_urls` - 输出URL数量上限
    pub fn with_limits(
        source: Arc<dyn SitemapSource>,
        max_depth: usize,
        max_urls: Option<usize>,
    ) -> Self {
        Self {
            source,
            max_depth,
            max_urls,
        }
    }

    /// 解析站点地图
    ///
    /// 使用显式栈进行深度优先遍历，已访问集合保证自引用或循环索引也能终止。
    /// 每个文档先输出自身的页面URL，再依次展开其子站点地图。
    ///
    /// # 参数
    ///
    /// * `url` - 站点地图URL
    ///
    /// # 返回值
    ///
    /// 扁平化的页面URL列表，失败时为空
    pub async fn resolve(&self, url: &str) -> Vec<String> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut seen_pages: HashSet<String> = HashSet::new();
        let mut urls = Vec::new();
        let mut stack = vec![(url.trim().to_string(), 0usize)];

        while let Some((sitemap_url, depth)) = stack.pop() {
            if !visited.insert(sitemap_url.clone()) {
                debug!("Skipping already visited sitemap: {}", sitemap_url);
                continue;
            }

            let Some(document) = self.load(&sitemap_url).await else {
                continue;
            };

            for page in document.pages() {
                if seen_pages.insert(page.loc.clone()) {
                    urls.push(page.loc.clone());
                    if self.max_urls.is_some_and(|max| urls.len() >= max) {
                        warn!(
                            "Sitemap URL limit {} reached while resolving {}",
                            urls.len(),
                            url
                        );
                        return urls;
                    }
                }
            }

            let children = document.sitemaps();
            if children.is_empty() {
                continue;
            }
            if depth >= self.max_depth {
                warn!(
                    "Sitemap {} exceeds max depth {}, skipping {} nested sitemaps",
                    sitemap_url,
                    self.max_depth,
                    children.len()
                );
                continue;
            }

            debug!(
                "Sitemap index {} references {} sitemaps",
                sitemap_url,
                children.len()
            );
            // Reversed so the first child is popped first
            for child in children.iter().rev() {
                if !visited.contains(child) {
                    stack.push((child.clone(), depth + 1));
                }
            }
        }

        info!("Resolved {} URLs from sitemap {}", urls.len(), url);
        urls
    }

    async fn load(&self, url: &str) -> Option<SitemapDocument> {
        let body = match self.source.fetch(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Error fetching sitemap {}: {}", url, e);
                counter!("sitemap_fetch_failures_total").increment(1);
                return None;
            }
        };

        match SitemapDocument::parse(&body) {
            Ok(document) => Some(document),
            Err(e) => {
                warn!("Error parsing sitemap {}: {}", url, e);
                counter!("sitemap_fetch_failures_total").increment(1);
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "sitemap_resolver_test.rs"]
mod tests;
