// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 会话键
///
/// 标识爬取实例内可复用的浏览器/连接上下文。
/// 共享同一会话键的抓取复用底层状态。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// 并行模式下按全局索引派生的会话键
    pub fn for_item(global_index: usize) -> Self {
        Self(format!("parallel_session_{}", global_index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 会话策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStrategy {
    /// 每个URL独立会话，抓取后立即释放
    #[default]
    PerItem,
    /// 整个运行共享一个会话，运行结束时释放
    SharedPerRun,
}

impl FromStr for SessionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "per_item" | "peritem" => Ok(Self::PerItem),
            "shared_per_run" | "sharedperrun" | "shared" => Ok(Self::SharedPerRun),
            other => Err(format!("unknown session strategy: {}", other)),
        }
    }
}

/// 站点爬取模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlMode {
    /// 顺序爬取，单会话复用
    #[default]
    Sequential,
    /// 分批并行爬取
    Parallel,
}

impl FromStr for CrawlMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "parallel" => Ok(Self::Parallel),
            other => Err(format!("unknown crawl mode: {}", other)),
        }
    }
}
