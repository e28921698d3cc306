// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::hunt_result::HuntResult;
use crate::domain::models::hunt_task::{FailureKind, HuntStatus, HuntTask};
use crate::domain::services::dispatch_service::TaskHandle;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 任务的对外视图
///
/// 不暴露提交者和分区，它们已经由请求头决定。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HuntTaskDto {
    pub task_id: Uuid,
    pub target_name: String,
    pub status: HuntStatus,
    pub progress: i32,
    pub step: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<HuntResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<HuntTask> for HuntTaskDto {
    fn from(task: HuntTask) -> Self {
        Self {
            task_id: task.id,
            target_name: task.target_name,
            status: task.status,
            progress: task.progress,
            step: task.step,
            result: task.result_data,
            error_kind: task.error_kind,
            error_detail: task.error_detail,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HuntListDto {
    pub tasks: Vec<HuntTaskDto>,
}

impl From<Vec<HuntTask>> for HuntListDto {
    fn from(tasks: Vec<HuntTask>) -> Self {
        Self {
            tasks: tasks.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchHuntResponseDto {
    pub tasks: Vec<TaskHandle>,
}
