// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：站点地图、会话与抓取结果
/// - 仓库接口（repositories）：站点地图文档来源抽象
/// - 服务（services）：站点地图解析与爬取编排
pub mod models;
pub mod repositories;
pub mod services;
