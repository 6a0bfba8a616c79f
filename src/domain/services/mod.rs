// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 站点地图解析（sitemap_resolver）：递归展开站点地图索引
/// - 顺序爬取（sequential_crawler）：单会话逐个抓取
/// - 并行批次调度（batch_scheduler）：分批并发抓取并观测内存
/// - 结果聚合（result_aggregator）：按输入顺序汇总结果
/// - 爬取服务（crawl_service）：编排上述组件与爬取实例生命周期
pub mod batch_scheduler;
pub mod crawl_service;
pub mod page_fetch;
pub mod result_aggregator;
pub mod sequential_crawler;
pub mod sitemap_resolver;

#[cfg(test)]
pub(crate) mod testing;
