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

use axum::{
    extract::{Extension, Query},
    Json,
};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::{
    application::dto::website_request::{SitemapRequestDto, WebsiteRequestDto},
    domain::{models::session::CrawlMode, services::crawl_service::CrawlService},
    presentation::errors::AppError,
};

/// 站点爬取，模式由请求或配置决定
pub async fn crawl_website(
    Extension(service): Extension<Arc<CrawlService>>,
    Query(query): Query<WebsiteRequestDto>,
    body: Option<Json<WebsiteRequestDto>>,
) -> Result<Json<Vec<String>>, AppError> {
    let request = WebsiteRequestDto::merge(query, body.map(|Json(b)| b));
    run(&service, request, None).await
}

/// 站点爬取（顺序）
pub async fn crawl_website_sequential(
    Extension(service): Extension<Arc<CrawlService>>,
    Query(query): Query<WebsiteRequestDto>,
    body: Option<Json<WebsiteRequestDto>>,
) -> Result<Json<Vec<String>>, AppError> {
    let request = WebsiteRequestDto::merge(query, body.map(|Json(b)| b));
    run(&service, request, Some(CrawlMode::Sequential)).await
}

/// 站点爬取（并行）
pub async fn crawl_website_parallel(
    Extension(service): Extension<Arc<CrawlService>>,
    Query(query): Query<WebsiteRequestDto>,
    body: Option<Json<WebsiteRequestDto>>,
) -> Result<Json<Vec<String>>, AppError> {
    let request = WebsiteRequestDto::merge(query, body.map(|Json(b)| b));
    run(&service, request, Some(CrawlMode::Parallel)).await
}

/// 只解析站点地图，返回页面URL列表
pub async fn resolve_sitemap(
    Extension(service): Extension<Arc<CrawlService>>,
    Query(query): Query<SitemapRequestDto>,
    body: Option<Json<SitemapRequestDto>>,
) -> Result<Json<Vec<String>>, AppError> {
    let request = body.map(|Json(b)| b).unwrap_or(query);
    request.validate()?;
    let url = request
        .url
        .ok_or_else(|| AppError::bad_request("url is required"))?;

    Ok(Json(service.sitemap_urls(&url).await?))
}

async fn run(
    service: &CrawlService,
    request: WebsiteRequestDto,
    forced_mode: Option<CrawlMode>,
) -> Result<Json<Vec<String>>, AppError> {
    request.validate()?;
    let url = request
        .url
        .ok_or_else(|| AppError::bad_request("url is required"))?;
    let mode = forced_mode.or(request.mode);
    info!(
        "Website crawl requested for {} (mode {:?}, max_concurrent {:?})",
        url, mode, request.max_concurrent
    );

    let contents = service
        .crawl_website(&url, mode, request.max_concurrent)
        .await?;
    Ok(Json(contents))
}
