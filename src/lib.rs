// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含HTTP请求的数据传输对象
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含站点地图解析、爬取调度和结果聚合
pub mod domain;

/// 引擎模块
///
/// 实现浏览器与HTTP两种抓取引擎
pub mod engines;

/// 基础设施模块
///
/// 提供站点地图获取、指标导出和内存观测
pub mod infrastructure;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由和处理器
pub mod presentation;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
