// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::search_result::SearchResult;
use async_trait::async_trait;
use thiserror::Error;

/// 单次查询返回的结果上限
pub const MAX_SEARCH_RESULTS: usize = 10;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    /// 缺少 API key 或搜索引擎 ID
    #[error("Search provider not configured: {0}")]
    Configuration(String),
    /// DNS、连接被拒绝等网络错误
    #[error("Search transport error: {0}")]
    Transport(String),
    /// 调用被取消或超时
    #[error("Search timed out after {0}ms")]
    Timeout(u64),
    /// 提供方返回非 2xx
    #[error("Search provider returned {status}: {body}")]
    Provider { status: u16, body: String },
    /// 响应体无法解码
    #[error("Search response could not be decoded: {0}")]
    Decode(String),
}

/// 搜索网关
///
/// 不做重试，不做缓存；结果按提供方相关度排序，最多 [`MAX_SEARCH_RESULTS`] 条。
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// 执行一次查询
    async fn query(&self, text: &str) -> Result<Vec<SearchResult>, SearchError>;

    /// 网关名称，用于日志
    fn name(&self) -> &'static str;
}
