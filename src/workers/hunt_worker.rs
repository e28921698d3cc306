// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::hunt_task::{FailureKind, HuntTask, TaskUpdate};
use crate::domain::repositories::task_repository::TaskRepository;
use crate::domain::services::dispatch_service::HuntScheduler;
use crate::domain::services::hunt_service::HuntOrchestrator;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{error, info, warn};
use uuid::Uuid;

/// 等待在途任务退出时的检查间隔
const DRAIN_INTERVAL: Duration = Duration::from_millis(50);

/// 核验工作器
///
/// 每个任务一个 tokio 任务：先等待启动偏移，再（可选地）获取并发许可，
/// 然后在同一任务内运行编排器。编排器 panic 时由这里补写一次 FAILED，
/// 中止该任务句柄即可同时取消整条流水线。
pub struct HuntWorker {
    orchestrator: Arc<HuntOrchestrator>,
    tasks: Arc<dyn TaskRepository>,
    limiter: Option<Arc<Semaphore>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl HuntWorker {
    /// 创建工作器
    ///
    /// # 参数
    ///
    /// * `orchestrator` - 编排器
    /// * `tasks` - 任务台账，用于兜底写入
    /// * `max_concurrent` - 同时运行的编排上限，0 表示不限制
    pub fn new(
        orchestrator: Arc<HuntOrchestrator>,
        tasks: Arc<dyn TaskRepository>,
        max_concurrent: usize,
    ) -> Self {
        let limiter = (max_concurrent > 0).then(|| Arc::new(Semaphore::new(max_concurrent)));
        Self {
            orchestrator,
            tasks,
            limiter,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// 仍在运行（含等待启动偏移）的任务数
    pub fn in_flight(&self) -> usize {
        match self.handles.lock() {
            Ok(handles) => handles.iter().filter(|h| !h.is_finished()).count(),
            Err(_) => 0,
        }
    }

    /// 停止发放并发许可
    ///
    /// 仍在排队等待许可的任务以 INTERNAL 失败落库；已在运行的不受影响。
    pub fn close(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.close();
        }
    }

    /// 中止所有后台任务
    ///
    /// 被中止的任务在台账中保持 RUNNING，没有恢复机制。
    pub fn abort_all(&self) {
        if let Ok(mut handles) = self.handles.lock() {
            let count = handles.len();
            for handle in handles.drain(..) {
                handle.abort();
            }
            info!(count, "Hunt workers aborted");
        }
    }

    /// 优雅关闭
    ///
    /// 先关闭许可发放，在 `grace` 内等待在途任务自行结束，超时后中止剩余任务。
    pub async fn shutdown(&self, grace: Duration) {
        self.close();
        let started = Instant::now();
        while self.in_flight() > 0 && started.elapsed() < grace {
            sleep(DRAIN_INTERVAL).await;
        }
        self.abort_all();
    }

    fn track(&self, handle: JoinHandle<()>) {
        if let Ok(mut handles) = self.handles.lock() {
            handles.retain(|h| !h.is_finished());
            handles.push(handle);
        }
    }
}

/// 流水线之外的失败统一记为 INTERNAL
async fn record_internal_failure(
    tasks: &dyn TaskRepository,
    task_id: Uuid,
    detail: &str,
    step: &str,
) {
    let update = TaskUpdate::failed(FailureKind::Internal, detail, step);
    if let Err(e) = tasks.update(task_id, &update).await {
        error!(%task_id, error = %e, "Failed to persist internal failure");
    }
    metrics::counter!("hunts_failed_total", "kind" => FailureKind::Internal.to_string())
        .increment(1);
}

impl HuntScheduler for HuntWorker {
    fn schedule(&self, task: HuntTask, start_offset: Duration) {
        let orchestrator = self.orchestrator.clone();
        let tasks = self.tasks.clone();
        let limiter = self.limiter.clone();

        let handle = tokio::spawn(async move {
            if !start_offset.is_zero() {
                sleep(start_offset).await;
            }

            let _permit = match limiter {
                Some(semaphore) => match semaphore.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(e) => {
                        warn!(task_id = %task.id, error = %e, "Concurrency limiter closed");
                        record_internal_failure(
                            tasks.as_ref(),
                            task.id,
                            "Hunt worker is shutting down",
                            "Hunt not started: worker shutting down",
                        )
                        .await;
                        return;
                    }
                },
                None => None,
            };

            let outcome = AssertUnwindSafe(orchestrator.run(&task))
                .catch_unwind()
                .await;

            if outcome.is_err() {
                warn!(task_id = %task.id, "Hunt pipeline panicked");
                record_internal_failure(
                    tasks.as_ref(),
                    task.id,
                    "Hunt pipeline panicked",
                    "Hunt aborted unexpectedly",
                )
                .await;
            }
        });

        self.track(handle);
    }
}
