// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::hunt_result::HuntResult;
use crate::domain::models::hunt_task::{FailureKind, HuntStatus};
use crate::domain::repositories::task_repository::{
    RepositoryError, TaskFilter, TaskOrder, TaskRepository,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;
use uuid::Uuid;

/// 轮询结束后的一行结果
///
/// FAILED 任务以降级行呈现，不会被静默丢弃。
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PolledRow {
    Completed {
        task_id: Uuid,
        target_name: String,
        result: HuntResult,
    },
    Degraded {
        task_id: Uuid,
        target_name: Option<String>,
        kind: Option<FailureKind>,
        message: String,
    },
    /// 超过最长等待时间仍在运行
    Pending {
        task_id: Uuid,
        target_name: String,
        progress: i32,
        step: String,
    },
}

impl PolledRow {
    pub fn task_id(&self) -> Uuid {
        match self {
            PolledRow::Completed { task_id, .. }
            | PolledRow::Degraded { task_id, .. }
            | PolledRow::Pending { task_id, .. } => *task_id,
        }
    }
}

/// 轮询器
///
/// 以固定间隔查询，直到被跟踪的任务全部离开 RUNNING，然后逐个读取最终状态。
pub struct TaskPoller {
    tasks: Arc<dyn TaskRepository>,
    interval: Duration,
    max_wait: Option<Duration>,
}

impl TaskPoller {
    pub fn new(tasks: Arc<dyn TaskRepository>, interval: Duration) -> Self {
        Self {
            tasks,
            interval,
            max_wait: None,
        }
    }

    /// 设置最长等待时间，超时后仍在运行的任务以 Pending 返回
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = Some(max_wait);
        self
    }

    /// 等待任务全部结束
    ///
    /// # 参数
    ///
    /// * `task_ids` - 要跟踪的任务
    ///
    /// # 返回值
    ///
    /// 与 `task_ids` 顺序一致的最终行
    pub async fn wait_for_settlement(
        &self,
        task_ids: &[Uuid],
    ) -> Result<Vec<PolledRow>, RepositoryError> {
        let started = Instant::now();

        loop {
            let running = self
                .tasks
                .find_many(
                    TaskFilter::default()
                        .with_ids(task_ids.to_vec())
                        .with_status(HuntStatus::Running),
                    TaskOrder::NewestCreated,
                    task_ids.len().max(1) as u64,
                )
                .await?;

            if running.is_empty() {
                break;
            }
            debug!(running = running.len(), "Tasks still running");

            if let Some(max_wait) = self.max_wait {
                if started.elapsed() >= max_wait {
                    break;
                }
            }
            sleep(self.interval).await;
        }

        let mut rows = Vec::with_capacity(task_ids.len());
        for id in task_ids {
            let row = match self.tasks.find_by_id(*id).await? {
                None => PolledRow::Degraded {
                    task_id: *id,
                    target_name: None,
                    kind: None,
                    message: "Task not found".to_string(),
                },
                Some(task) => match (task.status, task.result_data) {
                    (HuntStatus::Completed, Some(result)) => PolledRow::Completed {
                        task_id: task.id,
                        target_name: task.target_name,
                        result,
                    },
                    (HuntStatus::Running, _) => PolledRow::Pending {
                        task_id: task.id,
                        target_name: task.target_name,
                        progress: task.progress,
                        step: task.step,
                    },
                    _ => PolledRow::Degraded {
                        task_id: task.id,
                        target_name: Some(task.target_name),
                        kind: task.error_kind,
                        message: task.error_detail.unwrap_or(task.step),
                    },
                },
            };
            rows.push(row);
        }
        Ok(rows)
    }
}
