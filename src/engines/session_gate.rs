// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::session::SessionKey;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// 会话闸门
///
/// 同一会话同一时刻只允许一次抓取持有其标签页，不同会话互不阻塞。
/// 持有期间导航与读取内容必须在同一守卫内完成。
#[derive(Default)]
pub struct SessionGate {
    turns: parking_lot::Mutex<HashMap<SessionKey, Arc<Mutex<()>>>>,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// 等待并占用会话，守卫释放前其他同会话抓取保持等待
    pub async fn enter(&self, session: &SessionKey) -> OwnedMutexGuard<()> {
        let turn = self
            .turns
            .lock()
            .entry(session.clone())
            .or_default()
            .clone();
        turn.lock_owned().await
    }

    /// 会话释放后丢弃其闸门
    pub fn forget(&self, session: &SessionKey) {
        self.turns.lock().remove(session);
    }

    pub fn clear(&self) {
        self.turns.lock().clear();
    }
}
