// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 单个企业名称允许的最大字符数
pub const MAX_TARGET_NAME_CHARS: u64 = 200;

/// 单次批量提交的名称上限
pub const MAX_BATCH_SIZE: u64 = 100;

#[derive(Debug, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HuntRequestDto {
    #[validate(length(min = 1, max = MAX_TARGET_NAME_CHARS, message = "Target name must be 1-200 characters"))]
    pub target_name: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct BatchHuntRequestDto {
    #[validate(length(min = 1, max = MAX_BATCH_SIZE, message = "Batch must contain 1-100 names"))]
    pub names: Vec<String>,
}
