// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::hunt_result::HuntResult;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 任务创建时写入的初始进度
pub const INITIAL_PROGRESS: i32 = 5;

/// 任务完成时的进度
pub const FINAL_PROGRESS: i32 = 100;

/// 核验任务实体
///
/// 台账中的一行。任务在提交时同步创建（RUNNING），之后只由它自己的
/// 编排器运行修改，并且恰好一次进入终态（COMPLETED 或 FAILED）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HuntTask {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 待核验的企业名称
    pub target_name: String,
    /// 提交者标识
    pub requester_id: String,
    /// 环境/租户分区，用于按提交者隔离任务可见性
    pub env_scope: String,
    /// 任务状态
    pub status: HuntStatus,
    /// 进度（0-100），RUNNING 期间单调不减
    pub progress: i32,
    /// 当前阶段的可读描述
    pub step: String,
    /// 核验结果，当且仅当 status=COMPLETED 时存在
    pub result_data: Option<HuntResult>,
    /// 失败类别，仅 FAILED 时存在
    pub error_kind: Option<FailureKind>,
    /// 失败详情，仅 FAILED 时存在
    pub error_detail: Option<String>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 最后更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 任务状态
///
/// 状态转换只有两条：RUNNING → COMPLETED，RUNNING → FAILED，两者均为终态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HuntStatus {
    #[default]
    Running,
    Completed,
    Failed,
}

impl HuntStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, HuntStatus::Running)
    }
}

impl fmt::Display for HuntStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HuntStatus::Running => write!(f, "RUNNING"),
            HuntStatus::Completed => write!(f, "COMPLETED"),
            HuntStatus::Failed => write!(f, "FAILED"),
        }
    }
}

impl FromStr for HuntStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RUNNING" => Ok(HuntStatus::Running),
            "COMPLETED" => Ok(HuntStatus::Completed),
            "FAILED" => Ok(HuntStatus::Failed),
            _ => Err(()),
        }
    }
}

/// 失败类别
///
/// 与失败详情一起持久化，调用方可以按类别分支而不必解析文本。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// 缺少提供方密钥
    Configuration,
    /// 网络、DNS 或连接被拒绝
    Transport,
    /// 调用超出固定预算
    Timeout,
    /// 搜索没有返回可用结果
    EmptyResult,
    /// 模型输出不符合约定的结构
    Parse,
    /// 提供方返回非 2xx 状态
    Provider,
    /// 台账写入失败或运行单元异常退出
    Internal,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            FailureKind::Configuration => "CONFIGURATION",
            FailureKind::Transport => "TRANSPORT",
            FailureKind::Timeout => "TIMEOUT",
            FailureKind::EmptyResult => "EMPTY_RESULT",
            FailureKind::Parse => "PARSE",
            FailureKind::Provider => "PROVIDER",
            FailureKind::Internal => "INTERNAL",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for FailureKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONFIGURATION" => Ok(FailureKind::Configuration),
            "TRANSPORT" => Ok(FailureKind::Transport),
            "TIMEOUT" => Ok(FailureKind::Timeout),
            "EMPTY_RESULT" => Ok(FailureKind::EmptyResult),
            "PARSE" => Ok(FailureKind::Parse),
            "PROVIDER" => Ok(FailureKind::Provider),
            "INTERNAL" => Ok(FailureKind::Internal),
            _ => Err(()),
        }
    }
}

/// 领域错误类型
#[derive(Error, Debug, PartialEq)]
pub enum DomainError {
    /// 更新内容本身不合法
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),
}

/// 任务的部分更新
///
/// 编排器在每个检查点写入一次。仓库实现负责把它作为一次带条件的原子行更新执行。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub status: Option<HuntStatus>,
    pub progress: Option<i32>,
    pub step: Option<String>,
    pub result_data: Option<HuntResult>,
    pub error_kind: Option<FailureKind>,
    pub error_detail: Option<String>,
}

impl TaskUpdate {
    /// 进度检查点：只推进进度和阶段描述
    pub fn checkpoint(progress: i32, step: impl Into<String>) -> Self {
        Self {
            progress: Some(progress),
            step: Some(step.into()),
            ..Default::default()
        }
    }

    /// 完成：结果与状态在同一次写入中落库
    pub fn completed(result: HuntResult, step: impl Into<String>) -> Self {
        Self {
            status: Some(HuntStatus::Completed),
            progress: Some(FINAL_PROGRESS),
            step: Some(step.into()),
            result_data: Some(result),
            ..Default::default()
        }
    }

    /// 失败：进度保持在失败前最后一个检查点，结果保持为空
    pub fn failed(kind: FailureKind, detail: impl Into<String>, step: impl Into<String>) -> Self {
        Self {
            status: Some(HuntStatus::Failed),
            step: Some(step.into()),
            error_kind: Some(kind),
            error_detail: Some(detail.into()),
            ..Default::default()
        }
    }

    /// 校验更新自身的一致性
    ///
    /// - 进度必须在 0..=100
    /// - 结果当且仅当目标状态为 COMPLETED 时出现
    /// - 失败类别只能随 FAILED 一起出现
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(p) = self.progress {
            if !(0..=FINAL_PROGRESS).contains(&p) {
                return Err(DomainError::InvalidUpdate(format!(
                    "progress {} out of range",
                    p
                )));
            }
        }

        let completing = self.status == Some(HuntStatus::Completed);
        if completing != self.result_data.is_some() {
            return Err(DomainError::InvalidUpdate(
                "result_data must be written together with COMPLETED".to_string(),
            ));
        }

        if self.status == Some(HuntStatus::Running) {
            return Err(DomainError::InvalidUpdate(
                "RUNNING is only valid at creation".to_string(),
            ));
        }

        if self.error_kind.is_some() && self.status != Some(HuntStatus::Failed) {
            return Err(DomainError::InvalidUpdate(
                "error_kind requires FAILED".to_string(),
            ));
        }

        Ok(())
    }
}

impl HuntTask {
    /// 创建一个新的 RUNNING 任务
    ///
    /// # 参数
    ///
    /// * `target_name` - 企业名称（调用方已去除首尾空白）
    /// * `requester_id` - 提交者
    /// * `env_scope` - 环境分区
    pub fn new(target_name: String, requester_id: String, env_scope: String) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Uuid::new_v4(),
            target_name,
            requester_id,
            env_scope,
            status: HuntStatus::Running,
            progress: INITIAL_PROGRESS,
            step: "Task created, waiting to start".to_string(),
            result_data: None,
            error_kind: None,
            error_detail: None,
            created_at: now,
            updated_at: now,
        }
    }
}
