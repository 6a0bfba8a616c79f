// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod mock_engine;

use crawldigest::domain::services::crawl_service::{CrawlService, CrawlServiceConfig};
use crawldigest::domain::services::sitemap_resolver::SitemapResolver;
use crawldigest::infrastructure::observability::memory::SysinfoMemoryProbe;
use crawldigest::infrastructure::sitemap::HttpSitemapSource;
use mock_engine::MockEngine;
use std::sync::Arc;
use std::time::Duration;

/// 使用模拟引擎与真实HTTP站点地图来源构建爬取服务
pub fn build_service(engine: Arc<MockEngine>, sitemap_timeout: Duration) -> CrawlService {
    let source = HttpSitemapSource::new(sitemap_timeout).unwrap();
    CrawlService::new(
        engine,
        SitemapResolver::new(Arc::new(source)),
        Arc::new(SysinfoMemoryProbe::new()),
        CrawlServiceConfig::default(),
    )
}

/// 返回一个urlset文档
pub fn urlset(locs: &[String]) -> String {
    let body: String = locs
        .iter()
        .map(|l| format!("<url><loc>{}</loc><lastmod>2024-01-01</lastmod></url>", l))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        body
    )
}

/// 返回一个sitemapindex文档
pub fn sitemap_index(locs: &[String]) -> String {
    let body: String = locs
        .iter()
        .map(|l| format!("<sitemap><loc>{}</loc></sitemap>", l))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        body
    )
}
