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

use axum::{extract::Extension, Json};
use std::sync::Arc;
use tracing::info;

use crate::{
    application::dto::crawl_request::CrawlRequestDto,
    domain::services::crawl_service::CrawlService,
    presentation::errors::AppError,
};

/// 爬取显式URL列表
///
/// 返回与输入等长同序的markdown列表，失败项为空字符串
pub async fn crawl(
    Extension(service): Extension<Arc<CrawlService>>,
    Json(payload): Json<CrawlRequestDto>,
) -> Result<Json<Vec<String>>, AppError> {
    let urls = payload.into_urls();
    info!("Crawl requested for {} urls", urls.len());

    let contents = service.crawl_urls(&urls).await?;
    Ok(Json(contents))
}
