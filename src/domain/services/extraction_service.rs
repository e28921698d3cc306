// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::entity::{EntityParseError, ExtractedEntity};
use crate::domain::models::search_result::SearchResult;
use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

/// 抽取错误
///
/// 模型输出无法解析（Parse）与提供方/网络失败是不同的类别。
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("LLM provider not configured: {0}")]
    Configuration(String),
    #[error("LLM transport error: {0}")]
    Transport(String),
    #[error("Extraction timed out after {0}ms")]
    Timeout(u64),
    #[error("LLM provider returned {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("Model output could not be parsed: {0}")]
    Parse(String),
}

impl From<EntityParseError> for ExtractionError {
    fn from(err: EntityParseError) -> Self {
        ExtractionError::Parse(err.to_string())
    }
}

/// 抽取引擎
///
/// 交叉印证（多来源一致性、权威域名优先、冲突时取最新来源）完全交给模型，
/// 这里不做程序化的多数投票。
#[async_trait]
pub trait EntityExtractor: Send + Sync {
    async fn extract(&self, results: &[SearchResult]) -> Result<ExtractedEntity, ExtractionError>;

    fn name(&self) -> &'static str;
}

pub const SYSTEM_PROMPT: &str = "You are a corporate registration analyst. \
You receive numbered web search snippets about one Chinese company and return its registration facts as JSON. \
Cross-check every fact across the snippets. Prefer authoritative sources (government credit portals such as gsxt.gov.cn, \
qcc.com, tianyancha.com, aiqicha.baidu.com, stock exchanges) over news or forums. \
When sources conflict, prefer the most recent one. \
Use \"未找到\" for any field the snippets do not support. Never invent a unified social credit code. \
Set confidence (0-100) to reflect how consistent and authoritative the supporting sources are.";

/// 构造用户提示词：每条摘要带上来源编号
pub fn build_prompt(results: &[SearchResult]) -> String {
    let mut prompt = String::from("Search results:\n\n");
    for (i, r) in results.iter().enumerate() {
        prompt.push_str(&format!("[Source {}] {}\n", i + 1, r.title));
        prompt.push_str(&format!("Site: {}\n", r.source));
        if let Some(date) = &r.date {
            prompt.push_str(&format!("Published: {}\n", date));
        }
        prompt.push_str(&format!("URL: {}\n", r.link));
        prompt.push_str(&format!("Snippet: {}\n\n", r.snippet));
    }
    prompt.push_str(
        "Extract the company's official name, unified social credit code, legal representative, \
registered capital, establishment date, company type, listing status, main business, registered address \
and major shareholder. For each field you fill, cite the supporting source URL in `sources`.",
    );
    prompt
}

/// 要求模型遵循的 JSON Schema
pub fn entity_schema() -> Value {
    let text = json!({ "type": "string" });
    json!({
        "type": "object",
        "properties": {
            "officialName": text,
            "unifiedCode": text,
            "legalRep": text,
            "registeredCapital": text,
            "establishmentDate": text,
            "companyType": text,
            "listingStatus": text,
            "mainBusiness": text,
            "address": text,
            "shareholder": text,
            "confidence": { "type": "integer", "minimum": 0, "maximum": 100 },
            "sources": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "field": { "type": "string" },
                        "url": { "type": "string" }
                    },
                    "required": ["field", "url"],
                    "additionalProperties": false
                }
            }
        },
        "required": [
            "officialName", "unifiedCode", "legalRep", "registeredCapital",
            "establishmentDate", "companyType", "listingStatus", "mainBusiness",
            "address", "shareholder", "confidence", "sources"
        ],
        "additionalProperties": false
    })
}
