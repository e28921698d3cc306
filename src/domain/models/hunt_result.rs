// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::company::CompanyRecord;
use crate::domain::models::entity::{ExtractedEntity, NOT_FOUND};
use crate::domain::models::search_result::SearchResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 附加到外部结果上的证据链接数量上限
pub const MAX_EVIDENCE_LINKS: usize = 3;

/// 证据链接的通用标签
///
/// 链接固定取前三条输入来源，并不对应具体字段。
pub const GENERIC_EVIDENCE_LABEL: &str = "search_reference";

/// 结果来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultSource {
    /// 内部登记库命中
    InternalDbVerified,
    /// 外部搜索 + LLM 抽取
    ExternalSearchRag,
}

impl fmt::Display for ResultSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ResultSource::InternalDbVerified => write!(f, "INTERNAL_DB_VERIFIED"),
            ResultSource::ExternalSearchRag => write!(f, "EXTERNAL_SEARCH_RAG"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvidenceLink {
    pub field: String,
    pub url: String,
}

/// 任务完成时持久化的核验结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HuntResult {
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
    pub source: ResultSource,
    pub confidence: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_links: Option<Vec<EvidenceLink>>,
}

impl HuntResult {
    /// 由内部登记记录构造结果，置信度固定为 100
    pub fn from_record(record: &CompanyRecord) -> Self {
        let or_sentinel = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_FOUND.to_string());
        Self {
            official_name: record.official_name.clone(),
            unified_code: record.unified_code.clone(),
            legal_rep: record.legal_rep.clone(),
            registered_capital: record.registered_capital.clone(),
            establishment_date: record.establishment_date.clone(),
            company_type: or_sentinel(&record.company_type),
            listing_status: or_sentinel(&record.listing_status),
            main_business: or_sentinel(&record.main_business),
            address: record.address.clone(),
            shareholder: or_sentinel(&record.shareholder),
            source: ResultSource::InternalDbVerified,
            confidence: 100,
            evidence_links: None,
        }
    }

    /// 合并抽取结果与输入来源
    ///
    /// 置信度取模型自报值；证据链接是前三条输入来源，统一使用通用标签。
    pub fn from_extraction(entity: ExtractedEntity, inputs: &[SearchResult]) -> Self {
        let evidence_links = inputs
            .iter()
            .take(MAX_EVIDENCE_LINKS)
            .map(|r| EvidenceLink {
                field: GENERIC_EVIDENCE_LABEL.to_string(),
                url: r.link.clone(),
            })
            .collect();

        Self {
            official_name: entity.official_name,
            unified_code: entity.unified_code,
            legal_rep: entity.legal_rep,
            registered_capital: entity.registered_capital,
            establishment_date: entity.establishment_date,
            company_type: entity.company_type,
            listing_status: entity.listing_status,
            main_business: entity.main_business,
            address: entity.address,
            shareholder: entity.shareholder,
            source: ResultSource::ExternalSearchRag,
            confidence: entity.confidence.min(100),
            evidence_links: Some(evidence_links),
        }
    }

    /// 所有字段都是哨兵值的结果，主要用于测试
    pub fn not_found(source: ResultSource, confidence: u8) -> Self {
        let nf = || NOT_FOUND.to_string();
        Self {
            official_name: nf(),
            unified_code: nf(),
            legal_rep: nf(),
            registered_capital: nf(),
            establishment_date: nf(),
            company_type: nf(),
            listing_status: nf(),
            main_business: nf(),
            address: nf(),
            shareholder: nf(),
            source,
            confidence,
            evidence_links: None,
        }
    }
}
