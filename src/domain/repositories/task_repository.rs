// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::hunt_task::{DomainError, HuntStatus, HuntTask, TaskUpdate};
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
    /// 任务已进入终态，更新被拒绝
    #[error("Task already settled")]
    AlreadySettled,
    /// 请求的进度低于当前进度
    #[error("Progress would regress")]
    ProgressRegression,
    /// 更新内容不合法
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),
    /// 已存储的行无法还原为合法任务
    #[error("Corrupt task row {id}: {reason}")]
    CorruptRow { id: Uuid, reason: String },
}

impl From<DomainError> for RepositoryError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidUpdate(msg) => RepositoryError::InvalidUpdate(msg),
        }
    }
}

/// 排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskOrder {
    /// 按创建时间倒序
    #[default]
    NewestCreated,
    /// 按更新时间倒序
    RecentlyUpdated,
}

/// 任务查询条件
#[derive(Debug, Default, Clone)]
pub struct TaskFilter {
    pub requester_id: Option<String>,
    pub env_scope: Option<String>,
    pub statuses: Option<Vec<HuntStatus>>,
    pub task_ids: Option<Vec<Uuid>>,
}

impl TaskFilter {
    /// 某提交者在某分区下的任务
    pub fn scoped(requester_id: &str, env_scope: &str) -> Self {
        Self {
            requester_id: Some(requester_id.to_string()),
            env_scope: Some(env_scope.to_string()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: HuntStatus) -> Self {
        self.statuses = Some(vec![status]);
        self
    }

    pub fn with_ids(mut self, ids: Vec<Uuid>) -> Self {
        self.task_ids = Some(ids);
        self
    }
}

/// 任务台账特质
///
/// 写入对随后的读取立即可见。`update` 必须是一次原子的行级更新：
/// 终态行不会再被修改，进度不会回退。
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// 创建新任务
    async fn create(&self, task: &HuntTask) -> Result<HuntTask, RepositoryError>;
    /// 部分更新
    async fn update(&self, id: Uuid, update: &TaskUpdate) -> Result<(), RepositoryError>;
    /// 根据ID查找任务
    async fn find_by_id(&self, id: Uuid) -> Result<Option<HuntTask>, RepositoryError>;
    /// 条件查询
    async fn find_many(
        &self,
        filter: TaskFilter,
        order: TaskOrder,
        limit: u64,
    ) -> Result<Vec<HuntTask>, RepositoryError>;
}
