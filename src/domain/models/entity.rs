// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// 字段缺失时填入的哨兵值，代替 null
pub const NOT_FOUND: &str = "未找到";

/// 模型未给出置信度时的默认值
pub const DEFAULT_CONFIDENCE: u8 = 50;

/// 模型声明的字段来源
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceCitation {
    pub field: String,
    pub url: String,
}

/// 抽取引擎输出的企业事实
///
/// 每个文本字段都有值：模型没给的字段是 [`NOT_FOUND`]。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedEntity {
    pub official_name: String,
    pub unified_code: String,
    pub legal_rep: String,
    pub registered_capital: String,
    pub establishment_date: String,
    pub company_type: String,
    pub listing_status: String,
    pub main_business: String,
    pub address: String,
    pub shareholder: String,
    /// 0-100，由模型自报
    pub confidence: u8,
    pub sources: Vec<SourceCitation>,
}

#[derive(Error, Debug, PartialEq)]
pub enum EntityParseError {
    #[error("model output is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("model output is not a JSON object")]
    NotAnObject,
}

impl ExtractedEntity {
    /// 解析模型返回的文本
    ///
    /// 兼容被 markdown 代码块包裹的输出。缺失字段填哨兵值，
    /// 置信度缺失时取 [`DEFAULT_CONFIDENCE`]，超界时截断到 0-100。
    pub fn from_model_output(content: &str) -> Result<Self, EntityParseError> {
        let clean = content
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();

        let value: Value =
            serde_json::from_str(clean).map_err(|e| EntityParseError::InvalidJson(e.to_string()))?;
        let obj = value.as_object().ok_or(EntityParseError::NotAnObject)?;

        let text = |camel: &str, snake: &str| -> String {
            obj.get(camel)
                .or_else(|| obj.get(snake))
                .and_then(field_text)
                .unwrap_or_else(|| NOT_FOUND.to_string())
        };

        let confidence = obj
            .get("confidence")
            .and_then(confidence_value)
            .unwrap_or(DEFAULT_CONFIDENCE);

        let sources = obj
            .get("sources")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        Some(SourceCitation {
                            field: item.get("field")?.as_str()?.to_string(),
                            url: item.get("url")?.as_str()?.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            official_name: text("officialName", "official_name"),
            unified_code: text("unifiedCode", "unified_code"),
            legal_rep: text("legalRep", "legal_rep"),
            registered_capital: text("registeredCapital", "registered_capital"),
            establishment_date: text("establishmentDate", "establishment_date"),
            company_type: text("companyType", "company_type"),
            listing_status: text("listingStatus", "listing_status"),
            main_business: text("mainBusiness", "main_business"),
            address: text("address", "address"),
            shareholder: text("shareholder", "shareholder"),
            confidence,
            sources,
        })
    }
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn confidence_value(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok()?,
        _ => return None,
    };
    if raw.is_nan() {
        return None;
    }
    Some(raw.round().clamp(0.0, 100.0) as u8)
}
