// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 搜索网关返回的单条结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
    /// 来源标签，通常是站点域名
    pub source: String,
    /// 页面发布时间（提供方给出时）
    pub date: Option<String>,
}

impl SearchResult {
    pub fn new(title: String, snippet: String, link: String, source: String) -> Self {
        Self {
            title,
            snippet,
            link,
            source,
            date: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}
