// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::hunt_task::{HuntStatus, HuntTask};
use crate::domain::repositories::task_repository::{
    RepositoryError, TaskFilter, TaskOrder, TaskRepository,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

/// “最近完成”列表的长度
pub const RECENT_LIMIT: u64 = 5;

/// 活跃任务列表的上限
const ACTIVE_LIMIT: u64 = 200;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Target name cannot be empty")]
    EmptyTarget,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// 提交后立即返回给调用方的句柄
///
/// 返回时结果尚未生成，调用方需要轮询。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskHandle {
    pub task_id: Uuid,
    pub target_name: String,
    pub status: HuntStatus,
    pub progress: i32,
}

impl From<&HuntTask> for TaskHandle {
    fn from(task: &HuntTask) -> Self {
        Self {
            task_id: task.id,
            target_name: task.target_name.clone(),
            status: task.status,
            progress: task.progress,
        }
    }
}

/// 任务调度器
///
/// 接收一个已落库的任务和它的启动偏移，负责在后台运行编排器。
/// 将来可以替换为真正的限流器或有界队列，而不影响编排器的契约。
pub trait HuntScheduler: Send + Sync {
    fn schedule(&self, task: HuntTask, start_offset: Duration);
}

/// 启动偏移策略
pub trait StartJitter: Send + Sync {
    fn next_offset(&self) -> Duration;
}

/// 在 [0, max] 内均匀取随机偏移
///
/// 只用于打散出站调用的起始时间，不是限流器，也不限制并发。
#[derive(Debug, Clone, Copy)]
pub struct RandomJitter {
    max: Duration,
}

impl RandomJitter {
    pub fn new(max: Duration) -> Self {
        Self { max }
    }
}

impl StartJitter for RandomJitter {
    fn next_offset(&self) -> Duration {
        let max_ms = self.max.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=max_ms))
    }
}

/// 派发器
///
/// 同步创建台账行，然后把运行交给调度器；同时提供面向轮询方的读取接口。
pub struct HuntDispatcher {
    tasks: Arc<dyn TaskRepository>,
    scheduler: Arc<dyn HuntScheduler>,
    jitter: Arc<dyn StartJitter>,
}

impl HuntDispatcher {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        scheduler: Arc<dyn HuntScheduler>,
        jitter: Arc<dyn StartJitter>,
    ) -> Self {
        Self {
            tasks,
            scheduler,
            jitter,
        }
    }

    /// 提交单个核验
    ///
    /// 只等待建行这一步，之后立即返回；所有外部 I/O 都在后台发生。
    pub async fn start_hunt(
        &self,
        target_name: &str,
        requester_id: &str,
        env_scope: &str,
    ) -> Result<TaskHandle, DispatchError> {
        let name = target_name.trim();
        if name.is_empty() {
            return Err(DispatchError::EmptyTarget);
        }

        let task = self
            .tasks
            .create(&HuntTask::new(
                name.to_string(),
                requester_id.to_string(),
                env_scope.to_string(),
            ))
            .await?;
        metrics::counter!("hunts_started_total").increment(1);
        info!(task_id = %task.id, target = %task.target_name, "Hunt submitted");

        let handle = TaskHandle::from(&task);
        self.scheduler.schedule(task, Duration::ZERO);
        Ok(handle)
    }

    /// 批量提交
    ///
    /// 去除首尾空白并丢弃空名称；先为每个名称建行，让调用方立刻拿到完整列表，
    /// 再为每个任务分配独立的随机启动偏移。
    pub async fn start_batch(
        &self,
        names: &[String],
        requester_id: &str,
        env_scope: &str,
    ) -> Result<Vec<TaskHandle>, DispatchError> {
        let mut created = Vec::new();
        let mut failure = None;

        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            let task = HuntTask::new(
                name.to_string(),
                requester_id.to_string(),
                env_scope.to_string(),
            );
            match self.tasks.create(&task).await {
                Ok(task) => created.push(task),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        let handles: Vec<TaskHandle> = created.iter().map(TaskHandle::from).collect();
        metrics::counter!("hunts_started_total").increment(created.len() as u64);

        // 已建好的行照常调度，避免留下无人推进的 RUNNING 行
        for task in created {
            let offset = self.jitter.next_offset();
            self.scheduler.schedule(task, offset);
        }

        if let Some(e) = failure {
            error!(created = handles.len(), error = %e, "Batch submission aborted");
            return Err(e.into());
        }

        info!(count = handles.len(), "Batch submitted");
        Ok(handles)
    }

    /// 某提交者在某分区下仍在运行的任务，最新的在前
    pub async fn list_active(
        &self,
        requester_id: &str,
        env_scope: &str,
    ) -> Result<Vec<HuntTask>, DispatchError> {
        let filter = TaskFilter::scoped(requester_id, env_scope).with_status(HuntStatus::Running);
        Ok(self
            .tasks
            .find_many(filter, TaskOrder::NewestCreated, ACTIVE_LIMIT)
            .await?)
    }

    /// 最近更新的至多 5 个已完成任务
    pub async fn list_recent(
        &self,
        requester_id: &str,
        env_scope: &str,
    ) -> Result<Vec<HuntTask>, DispatchError> {
        let filter =
            TaskFilter::scoped(requester_id, env_scope).with_status(HuntStatus::Completed);
        Ok(self
            .tasks
            .find_many(filter, TaskOrder::RecentlyUpdated, RECENT_LIMIT)
            .await?)
    }

    /// 按 ID 读取任意状态的任务
    pub async fn get(&self, id: Uuid) -> Result<Option<HuntTask>, DispatchError> {
        Ok(self.tasks.find_by_id(id).await?)
    }
}
