// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use sysinfo::{MemoryRefreshKind, Pid, ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System};

/// 内存探针
///
/// 提供当前进程内存占用的时点采样（字节）
pub trait MemoryProbe: Send + Sync {
    /// 采样一次内存使用量
    fn sample(&self) -> u64;
}

/// 基于sysinfo的进程内存探针
///
/// 优先读取当前进程的常驻内存；无法定位进程时退回系统已用内存
pub struct SysinfoMemoryProbe {
    system: Mutex<System>,
    pid: Option<Pid>,
}

impl SysinfoMemoryProbe {
    pub fn new() -> Self {
        let system = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::nothing().with_ram()),
        );
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!("Cannot resolve current pid, falling back to system memory: {}", e);
                None
            }
        };

        Self {
            system: Mutex::new(system),
            pid,
        }
    }
}

impl Default for SysinfoMemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for SysinfoMemoryProbe {
    fn sample(&self) -> u64 {
        let mut sys = self.system.lock();

        if let Some(pid) = self.pid {
            sys.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[pid]),
                true,
                ProcessRefreshKind::nothing().with_memory(),
            );
            if let Some(process) = sys.process(pid) {
                return process.memory();
            }
        }

        sys.refresh_memory();
        sys.used_memory()
    }
}

/// 内存峰值跟踪器
///
/// 只保留运行期间的最大值，不保存时间序列
#[derive(Debug, Default)]
pub struct PeakMemoryTracker {
    peak: AtomicU64,
    samples: AtomicU64,
}

impl PeakMemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次采样并返回当前峰值
    pub fn record(&self, bytes: u64) -> u64 {
        self.samples.fetch_add(1, Ordering::Relaxed);
        let previous = self.peak.fetch_max(bytes, Ordering::AcqRel);
        previous.max(bytes)
    }

    /// 当前峰值（字节）
    pub fn peak(&self) -> u64 {
        self.peak.load(Ordering::Acquire)
    }

    /// 已记录的采样次数
    pub fn sample_count(&self) -> u64 {
        self.samples.load(Ordering::Relaxed)
    }
}

/// 将字节数格式化为MB
pub fn as_megabytes(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
