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
use super::helpers::{build_service, urlset};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use crawldigest::presentation::routes;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(engine: Arc<MockEngine>) -> Router {
    routes::routes(Arc::new(build_service(engine, Duration::from_secs(5))))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_and_root_endpoints() {
    let (status, body) = send(
        app(MockEngine::new()),
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy" }));

    let (status, body) = send(
        app(MockEngine::new()),
        Request::builder().uri("/").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Welcome to the API!" }));
}

#[tokio::test]
async fn crawl_accepts_array_and_object_bodies() {
    let urls = json!(["https://a.test/1", "https://a.test/broken", "https://a.test/3"]);
    let expected = json!(["md:https://a.test/1", "", "md:https://a.test/3"]);

    let (status, body) = send(app(MockEngine::new()), post_json("/crawl", urls.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, expected);

    let (status, body) = send(
        app(MockEngine::new()),
        post_json("/crawl", json!({ "urls": urls })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, expected);
}

#[tokio::test]
async fn crawl_empty_list_returns_empty_array() {
    let engine = MockEngine::new();
    let (status, body) = send(app(engine.clone()), post_json("/crawl", json!([]))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    assert_eq!(engine.launches(), 0);
}

#[tokio::test]
async fn invalid_input_returns_400_with_detail() {
    let (status, body) = send(
        app(MockEngine::new()),
        post_json("/crawl", json!(["ftp://a.test/file"])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("scheme"));

    let (status, body) = send(
        app(MockEngine::new()),
        post_json(
            "/website-url",
            json!({ "url": "https://a.test/sitemap.xml", "max_concurrent": 0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());

    let (status, _) = send(app(MockEngine::new()), post_json("/website-url", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn launch_failure_returns_500() {
    let (status, body) = send(
        app(MockEngine::failing("chrome not found")),
        post_json("/crawl", json!(["https://a.test/1"])),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("chrome not found"));
}

#[tokio::test]
async fn website_url_accepts_query_parameter_and_variants() {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&[
            format!("{}/x", base),
            format!("{}/y", base),
        ])))
        .mount(&server)
        .await;
    let sitemap = format!("{}/sitemap.xml", base);
    let expected = json!([format!("md:{}/x", base), format!("md:{}/y", base)]);

    let by_query = Request::builder()
        .method("POST")
        .uri(format!("/website-url?url={}", sitemap))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(MockEngine::new()), by_query).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, expected);

    for uri in ["/website-url/sequential", "/website-url/parallel"] {
        let (status, body) = send(
            app(MockEngine::new()),
            post_json(uri, json!({ "url": sitemap, "max_concurrent": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body, expected);
    }

    let (status, body) = send(
        app(MockEngine::new()),
        post_json("/sitemap", json!({ "url": sitemap })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([format!("{}/x", base), format!("{}/y", base)]));
}
