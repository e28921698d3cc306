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

use crate::config::settings::LlmSettings;
use crate::domain::models::entity::ExtractedEntity;
use crate::domain::models::search_result::SearchResult;
use crate::domain::services::extraction_service::{
    build_prompt, entity_schema, EntityExtractor, ExtractionError, SYSTEM_PROMPT,
};
use crate::utils::text::{describe_http_error, truncate_error_body};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// 基于 OpenAI 兼容接口的抽取引擎
///
/// 使用 `json_schema` 结构化输出，温度固定为 0。
pub struct OpenAiExtractor {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    request_timeout: Duration,
}

impl OpenAiExtractor {
    /// 创建抽取引擎
    ///
    /// # 参数
    ///
    /// * `settings` - LLM 配置，必须包含 API key
    /// * `request_timeout` - HTTP 客户端超时
    pub fn new(settings: &LlmSettings, request_timeout: Duration) -> Result<Self, ExtractionError> {
        let api_key = settings
            .credentials()
            .map_err(|e| ExtractionError::Configuration(e.to_string()))?;

        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                ExtractionError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: settings.model.clone(),
            endpoint: format!(
                "{}/chat/completions",
                settings.api_base_url.trim_end_matches('/')
            ),
            request_timeout,
        })
    }

    fn request_body(&self, results: &[SearchResult]) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": build_prompt(results) }
            ],
            "temperature": 0.0,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "company_registration",
                    "strict": true,
                    "schema": entity_schema()
                }
            }
        })
    }
}

#[async_trait]
impl EntityExtractor for OpenAiExtractor {
    #[instrument(skip(self, results), fields(sources = results.len()))]
    async fn extract(&self, results: &[SearchResult]) -> Result<ExtractedEntity, ExtractionError> {
        let start = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.request_body(results))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractionError::Timeout(self.request_timeout.as_millis() as u64)
                } else {
                    ExtractionError::Transport(describe_http_error(e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = truncate_error_body(&response.text().await.unwrap_or_default());
            warn!(status = %status, error = %body, "LLM provider error");
            return Err(ExtractionError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| ExtractionError::Parse(describe_http_error(e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ExtractionError::Parse("Model returned no content".to_string()))?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis() as u64,
            "LLM extraction finished"
        );

        Ok(ExtractedEntity::from_model_output(&content)?)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
