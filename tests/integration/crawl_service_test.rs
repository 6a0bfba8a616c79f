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

use super::helpers::mock_engine::MockEngine;
use super::helpers::{build_service, sitemap_index, urlset};
use crawldigest::domain::models::session::CrawlMode;
use std::sync::atomic::Ordering;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn site_with_broken_page() -> MockServer {
    let server = MockServer::start().await;
    let base = server.uri();

    let index = sitemap_index(&[format!("{}/a.xml", base), format!("{}/b.xml", base)]);
    let a = urlset(&[format!("{}/one", base), format!("{}/broken", base)]);
    let b = urlset(&[format!("{}/three", base)]);

    for (at, body) in [("/sitemap.xml", index), ("/a.xml", a), ("/b.xml", b)] {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
    }
    server
}

#[tokio::test]
async fn test_website_crawl_end_to_end_in_both_modes() {
    let server = site_with_broken_page().await;
    let base = server.uri();
    let expected = vec![
        format!("md:{}/one", base),
        String::new(),
        format!("md:{}/three", base),
    ];

    for (mode, k) in [(CrawlMode::Sequential, None), (CrawlMode::Parallel, Some(2))] {
        let engine = MockEngine::new();
        let service = build_service(engine.clone(), Duration::from_secs(5));

        let out = service
            .crawl_website(&format!("{}/sitemap.xml", base), Some(mode), k)
            .await
            .unwrap();

        assert_eq!(out, expected);
        assert_eq!(engine.launches(), 1);
        assert_eq!(engine.instance.closed.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test]
async fn test_parallel_report_counts_batches() {
    let engine = MockEngine::new();
    let service = build_service(engine.clone(), Duration::from_secs(5));
    let urls: Vec<String> = (0..5).map(|i| format!("https://a.test/{}", i)).collect();

    let report = service.crawl_parallel(&urls, Some(2)).await.unwrap();

    assert_eq!(report.contents.len(), 5);
    assert_eq!(report.batches, 3);
    assert_eq!(report.succeeded, 5);
    assert!(report.peak_memory_bytes > 0);
    // One release per item under the default per-item strategy
    assert_eq!(engine.instance.released.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_unreachable_sitemap_does_not_launch() {
    let engine = MockEngine::new();
    let service = build_service(engine.clone(), Duration::from_millis(500));

    let out = service
        .crawl_website("http://127.0.0.1:1/sitemap.xml", None, None)
        .await
        .unwrap();

    assert!(out.is_empty());
    assert_eq!(engine.launches(), 0);
}
