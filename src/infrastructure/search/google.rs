// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::SearchSettings;
use crate::domain::models::search_result::SearchResult;
use crate::domain::search::engine::{SearchError, SearchGateway, MAX_SEARCH_RESULTS};
use crate::utils::text::{describe_http_error, truncate_error_body};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// 页面元数据中可能携带发布时间的字段，按优先级排列
const DATE_META_KEYS: [&str; 3] = ["article:published_time", "og:updated_time", "date"];

/// Google Custom Search JSON API 网关
pub struct GoogleSearchGateway {
    client: Client,
    api_key: String,
    engine_id: String,
    endpoint: String,
    country: String,
    language: String,
    limit: u32,
    request_timeout: Duration,
}

impl GoogleSearchGateway {
    /// 创建网关
    ///
    /// 缺少 API key 或搜索引擎 ID 时直接返回 `Configuration` 错误。
    /// `request_timeout` 是 HTTP 客户端层面的超时，编排器另有自己的预算。
    pub fn new(settings: &SearchSettings, request_timeout: Duration) -> Result<Self, SearchError> {
        let (api_key, engine_id) = settings
            .credentials()
            .map_err(|e| SearchError::Configuration(e.to_string()))?;

        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| SearchError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            engine_id: engine_id.to_string(),
            endpoint: format!("{}/customsearch/v1", settings.base_url.trim_end_matches('/')),
            country: settings.country.clone(),
            language: settings.language.clone(),
            limit: settings.result_limit.clamp(1, MAX_SEARCH_RESULTS as u32),
            request_timeout,
        })
    }
}

impl GoogleSearchGateway {
    fn classify_transport_error(&self, err: reqwest::Error) -> SearchError {
        if err.is_timeout() {
            SearchError::Timeout(self.request_timeout.as_millis() as u64)
        } else {
            SearchError::Transport(describe_http_error(err))
        }
    }
}

#[async_trait]
impl SearchGateway for GoogleSearchGateway {
    #[instrument(skip(self))]
    async fn query(&self, text: &str) -> Result<Vec<SearchResult>, SearchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", text),
                ("num", &self.limit.to_string()),
                ("gl", self.country.as_str()),
                ("hl", self.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Provider {
                status: status.as_u16(),
                body: truncate_error_body(&body),
            });
        }

        let payload: GoogleSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(describe_http_error(e)))?;

        let results: Vec<SearchResult> = payload
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(GoogleSearchItem::into_result)
            .take(MAX_SEARCH_RESULTS)
            .collect();

        debug!(count = results.len(), "Google search returned results");
        Ok(results)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}


#[derive(Debug, Deserialize)]
struct GoogleSearchResponse {
    items: Option<Vec<GoogleSearchItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleSearchItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
    display_link: Option<String>,
    pagemap: Option<Value>,
}

impl GoogleSearchItem {
    /// 没有链接的条目无法作为证据，直接丢弃
    fn into_result(self) -> Option<SearchResult> {
        let link = self.link?;
        let source = self.display_link.unwrap_or_else(|| host_of(&link));
        let date = self.pagemap.as_ref().and_then(published_date);

        let result = SearchResult::new(
            self.title.unwrap_or_default(),
            self.snippet.unwrap_or_default(),
            link,
            source,
        );
        Some(match date {
            Some(date) => result.with_date(date),
            None => result,
        })
    }
}

fn host_of(link: &str) -> String {
    url::Url::parse(link)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

fn published_date(pagemap: &Value) -> Option<String> {
    let metatags = pagemap.get("metatags")?.as_array()?;
    metatags.iter().find_map(|tags| {
        DATE_META_KEYS
            .iter()
            .find_map(|key| tags.get(*key).and_then(Value::as_str))
            .map(str::to_string)
    })
}
