// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::outcome::FetchOutcome;

/// 按索引寻址的结果槽
///
/// 每个输入URL预先分配一个槽位，爬取器按索引写入结果，
/// 因此输出顺序与完成顺序无关，长度恒等于输入长度
#[derive(Debug)]
pub struct OrderedResults {
    slots: Vec<Option<FetchOutcome>>,
}

impl OrderedResults {
    pub fn with_len(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 写入指定槽位，越界写入被忽略
    pub fn place(&mut self, index: usize, outcome: FetchOutcome) {
        match self.slots.get_mut(index) {
            Some(slot) => *slot = Some(outcome),
            None => tracing::warn!("Dropping outcome for out-of-range slot {}", index),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Some(o) if o.is_success()))
            .count()
    }

    /// 失败数，未写入的槽位也计为失败
    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// 转换为最终内容列表，失败与未写入的槽位为空字符串
    pub fn into_contents(self) -> Vec<String> {
        self.slots
            .into_iter()
            .map(|slot| slot.map(FetchOutcome::into_content).unwrap_or_default())
            .collect()
    }
}
