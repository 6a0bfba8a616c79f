// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::crawl_service::CrawlService;
use crate::presentation::handlers::{crawl_handler, website_handler};
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// 创建应用路由
///
/// # 参数
///
/// * `service` - 爬取服务
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(service: Arc<CrawlService>) -> Router {
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/version", get(version));

    let crawl_routes = Router::new()
        .route("/crawl", post(crawl_handler::crawl))
        .route("/website-url", post(website_handler::crawl_website))
        .route(
            "/website-url/sequential",
            post(website_handler::crawl_website_sequential),
        )
        .route(
            "/website-url/parallel",
            post(website_handler::crawl_website_parallel),
        )
        .route("/sitemap", post(website_handler::resolve_sitemap))
        .layer(Extension(service));

    Router::new()
        .merge(public_routes)
        .merge(crawl_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// 根端点
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the API!" }))
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回 `{"status": "healthy"}`
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
