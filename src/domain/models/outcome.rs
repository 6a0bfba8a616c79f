// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 单个URL的抓取结果
///
/// 每个提交给爬取器的URL都恰好产生一个结果，
/// 失败在聚合阶段映射为空字符串占位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchOutcome {
    /// 抓取成功，携带清理后的markdown
    Success { content: String },
    /// 抓取失败，携带失败原因
    Failure { reason: String },
}

impl FetchOutcome {
    pub fn success(content: impl Into<String>) -> Self {
        Self::Success {
            content: content.into(),
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// 转换为最终输出文本，失败为空字符串
    pub fn into_content(self) -> String {
        match self {
            Self::Success { content } => content,
            Self::Failure { .. } => String::new(),
        }
    }
}

/// 并行爬取报告
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    /// 按输入顺序排列的内容
    pub contents: Vec<String>,
    /// 运行期间观察到的内存峰值（字节）
    pub peak_memory_bytes: u64,
    /// 执行的批次数
    pub batches: usize,
    /// 成功数
    pub succeeded: usize,
    /// 失败数
    pub failed: usize,
}

impl CrawlReport {
    pub fn empty() -> Self {
        Self {
            contents: Vec::new(),
            peak_memory_bytes: 0,
            batches: 0,
            succeeded: 0,
            failed: 0,
        }
    }
}
