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

use crate::domain::models::session::CrawlMode;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 站点爬取请求
///
/// 字段既可以来自JSON请求体，也可以来自查询参数
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct WebsiteRequestDto {
    /// 站点地图URL
    #[validate(length(min = 1, message = "url must not be empty"))]
    pub url: Option<String>,
    /// 爬取模式
    pub mode: Option<CrawlMode>,
    /// 并行批大小
    #[validate(range(min = 1, message = "max_concurrent must be at least 1"))]
    pub max_concurrent: Option<usize>,
}

impl WebsiteRequestDto {
    /// 合并查询参数与请求体，请求体中的字段优先
    pub fn merge(query: WebsiteRequestDto, body: Option<WebsiteRequestDto>) -> Self {
        match body {
            Some(body) => Self {
                url: body.url.or(query.url),
                mode: body.mode.or(query.mode),
                max_concurrent: body.max_concurrent.or(query.max_concurrent),
            },
            None => query,
        }
    }
}

/// 站点地图解析请求
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct SitemapRequestDto {
    /// 站点地图URL
    #[validate(length(min = 1, message = "url must not be empty"))]
    pub url: Option<String>,
}
