// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 定义爬取结果、会话和站点地图等核心实体
pub mod outcome;
pub mod session;
pub mod sitemap;
