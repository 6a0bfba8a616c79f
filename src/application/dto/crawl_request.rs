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

use serde::{Deserialize, Serialize};

/// URL列表爬取请求
///
/// 接受裸JSON数组或 `{"urls": [...]}` 两种形式
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum CrawlRequestDto {
    /// 裸数组
    List(Vec<String>),
    /// 包装对象
    Wrapped { urls: Vec<String> },
}

impl CrawlRequestDto {
    pub fn into_urls(self) -> Vec<String> {
        match self {
            Self::List(urls) | Self::Wrapped { urls } => urls,
        }
    }
}
