// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 搜索网关实现
///
/// 目前只有 Google Custom Search JSON API 一种实现
pub mod google;

pub use google::GoogleSearchGateway;
