// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 可观测性模块
///
/// 提供进程内存采样和峰值跟踪
pub mod memory;
