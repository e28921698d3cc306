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

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub const REQUESTER_HEADER: &str = "x-requester-id";
pub const ENV_SCOPE_HEADER: &str = "x-env-scope";

/// 未提供分区头时使用的分区
pub const DEFAULT_ENV_SCOPE: &str = "production";

/// 请求方上下文：提交者与环境分区
///
/// 活跃/最近列表只在同一提交者、同一分区内可见。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequesterContext {
    pub requester_id: String,
    pub env_scope: String,
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl<S> FromRequestParts<S> for RequesterContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(requester_id) = header_value(&parts.headers, REQUESTER_HEADER) else {
            let body = Json(json!({ "error": "Missing or invalid X-Requester-Id header" }));
            return Err((StatusCode::BAD_REQUEST, body).into_response());
        };

        let env_scope = header_value(&parts.headers, ENV_SCOPE_HEADER)
            .unwrap_or_else(|| DEFAULT_ENV_SCOPE.to_string());

        Ok(RequesterContext {
            requester_id,
            env_scope,
        })
    }
}
