// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 定义HTTP请求与领域服务之间的数据传输对象
pub mod dto;
