// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 内部登记库中的企业记录
///
/// 这些记录已经人工核实，本地命中时直接作为核验结果，置信度为 100。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompanyRecord {
    pub id: Uuid,
    pub official_name: String,
    pub unified_code: String,
    pub legal_rep: String,
    pub registered_capital: String,
    pub establishment_date: String,
    pub company_type: Option<String>,
    pub listing_status: Option<String>,
    pub main_business: Option<String>,
    pub address: String,
    pub shareholder: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}
