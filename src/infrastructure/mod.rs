// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与外部系统的交互。
///
/// 包含的子模块：
/// - 指标（metrics）：Prometheus导出器与指标注册
/// - 可观测性（observability）：进程内存采样与峰值跟踪
/// - 站点地图（sitemap）：站点地图文档的HTTP获取
pub mod metrics;
pub mod observability;
pub mod sitemap;
