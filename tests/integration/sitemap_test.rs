// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{sitemap_index, urlset};
use crawldigest::domain::repositories::sitemap_source::SitemapSource;
use crawldigest::domain::services::sitemap_resolver::SitemapResolver;
use crawldigest::infrastructure::sitemap::HttpSitemapSource;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver(timeout: Duration) -> SitemapResolver {
    SitemapResolver::new(Arc::new(HttpSitemapSource::new(timeout).unwrap()))
}

async fn mount_xml(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/xml")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_index_with_two_leaves_flattens_in_document_order() {
    let server = MockServer::start().await;
    let base = server.uri();
    let page = |n: u32| format!("{}/page/{}", base, n);

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/posts.xml", base), format!("{}/docs.xml", base)]),
    )
    .await;
    mount_xml(&server, "/posts.xml", urlset(&[page(1), page(2)])).await;
    mount_xml(&server, "/docs.xml", urlset(&[page(3), page(4), page(5)])).await;

    let urls = resolver(Duration::from_secs(5))
        .resolve(&format!("{}/sitemap.xml", base))
        .await;

    assert_eq!(urls, (1..=5).map(page).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_missing_sitemap_resolves_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let urls = resolver(Duration::from_secs(5))
        .resolve(&format!("{}/sitemap.xml", server.uri()))
        .await;
    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_slow_sitemap_times_out_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(urlset(&["https://a.test/1".to_string()]))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let urls = resolver(Duration::from_millis(200))
        .resolve(&format!("{}/sitemap.xml", server.uri()))
        .await;
    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_self_referential_index_terminates() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/sitemap.xml", base),
            format!("{}/leaf.xml", base),
        ]),
    )
    .await;
    mount_xml(&server, "/leaf.xml", urlset(&[format!("{}/only", base)])).await;

    let urls = resolver(Duration::from_secs(5))
        .resolve(&format!("{}/sitemap.xml", base))
        .await;
    assert_eq!(urls, vec![format!("{}/only", base)]);
}

#[tokio::test]
async fn test_non_sitemap_document_is_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/html.xml", base), format!("{}/leaf.xml", base)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/html.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>Not here</body></html>"))
        .mount(&server)
        .await;
    mount_xml(&server, "/leaf.xml", urlset(&[format!("{}/kept", base)])).await;

    let urls = resolver(Duration::from_secs(5))
        .resolve(&format!("{}/sitemap.xml", base))
        .await;
    assert_eq!(urls, vec![format!("{}/kept", base)]);
}

#[tokio::test]
async fn test_http_source_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.xml"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let source = HttpSitemapSource::new(Duration::from_secs(5)).unwrap();
    let err = source
        .fetch(&format!("{}/gone.xml", server.uri()))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("410"));
}
