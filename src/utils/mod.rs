// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供HTML到markdown的转换、内容裁剪和遥测初始化
pub mod content_filter;
pub mod markdown;
pub mod telemetry;
