// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{setup_db, REQUESTER, SCOPE};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use truthhunt::domain::models::hunt_result::{HuntResult, ResultSource};
use truthhunt::domain::models::hunt_task::{
    FailureKind, HuntStatus, HuntTask, TaskUpdate, INITIAL_PROGRESS,
};
use truthhunt::domain::repositories::task_repository::TaskRepository;
use truthhunt::domain::services::dispatch_service::{
    DispatchError, HuntDispatcher, HuntScheduler, RandomJitter, StartJitter,
};
use truthhunt::domain::services::poller::{PolledRow, TaskPoller};
use truthhunt::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use uuid::Uuid;

/// 只记录调度请求，不运行编排
#[derive(Default)]
struct RecordingScheduler {
    scheduled: Mutex<Vec<(HuntTask, Duration)>>,
}

impl HuntScheduler for RecordingScheduler {
    fn schedule(&self, task: HuntTask, start_offset: Duration) {
        self.scheduled.lock().unwrap().push((task, start_offset));
    }
}

struct FixedJitter(Duration);

impl StartJitter for FixedJitter {
    fn next_offset(&self) -> Duration {
        self.0
    }
}

async fn dispatcher(
    jitter: Arc<dyn StartJitter>,
) -> (HuntDispatcher, Arc<RecordingScheduler>, Arc<dyn TaskRepository>) {
    let tasks: Arc<dyn TaskRepository> = Arc::new(TaskRepositoryImpl::new(setup_db().await));
    let scheduler = Arc::new(RecordingScheduler::default());
    (
        HuntDispatcher::new(tasks.clone(), scheduler.clone(), jitter),
        scheduler,
        tasks,
    )
}

fn completed() -> TaskUpdate {
    TaskUpdate::completed(HuntResult::not_found(ResultSource::ExternalSearchRag, 60), "Done")
}

#[tokio::test]
async fn test_start_hunt_returns_running_handle_and_schedules_immediately() {
    let (dispatcher, scheduler, tasks) =
        dispatcher(Arc::new(FixedJitter(Duration::from_millis(700)))).await;

    let handle = dispatcher
        .start_hunt("  成都华鲲振宇智能科技有限责任公司 ", REQUESTER, SCOPE)
        .await
        .unwrap();

    assert_eq!(handle.status, HuntStatus::Running);
    assert_eq!(handle.progress, INITIAL_PROGRESS);
    assert_eq!(handle.target_name, "成都华鲲振宇智能科技有限责任公司");

    let stored = tasks.find_by_id(handle.task_id).await.unwrap().unwrap();
    assert_eq!(stored.requester_id, REQUESTER);
    assert_eq!(stored.env_scope, SCOPE);

    let scheduled = scheduler.scheduled.lock().unwrap();
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].0.id, handle.task_id);
    assert_eq!(scheduled[0].1, Duration::ZERO);
}

#[tokio::test]
async fn test_blank_target_is_rejected_without_creating_a_row() {
    let (dispatcher, scheduler, _tasks) = dispatcher(Arc::new(FixedJitter(Duration::ZERO))).await;

    let err = dispatcher.start_hunt("   ", REQUESTER, SCOPE).await.unwrap_err();
    assert!(matches!(err, DispatchError::EmptyTarget));
    assert!(scheduler.scheduled.lock().unwrap().is_empty());
    assert!(dispatcher.list_active(REQUESTER, SCOPE).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_batch_drops_blank_names_and_jitters_every_task() {
    let (dispatcher, scheduler, _tasks) =
        dispatcher(Arc::new(RandomJitter::new(Duration::from_millis(2000)))).await;

    let names = vec![
        "Alpha Corp".to_string(),
        "   ".to_string(),
        " Beta Corp ".to_string(),
        String::new(),
        "Gamma Corp".to_string(),
    ];
    let handles = dispatcher.start_batch(&names, REQUESTER, SCOPE).await.unwrap();

    let targets: Vec<&str> = handles.iter().map(|h| h.target_name.as_str()).collect();
    assert_eq!(targets, vec!["Alpha Corp", "Beta Corp", "Gamma Corp"]);
    assert!(handles.iter().all(|h| h.status == HuntStatus::Running));

    let scheduled = scheduler.scheduled.lock().unwrap();
    assert_eq!(scheduled.len(), 3);
    assert!(scheduled
        .iter()
        .all(|(_, offset)| *offset <= Duration::from_millis(2000)));
}

#[tokio::test]
async fn test_active_and_recent_lists() {
    let (dispatcher, _scheduler, tasks) = dispatcher(Arc::new(FixedJitter(Duration::ZERO))).await;

    let names: Vec<String> = (0..7).map(|i| format!("Corp {}", i)).collect();
    let handles = dispatcher.start_batch(&names, REQUESTER, SCOPE).await.unwrap();
    dispatcher
        .start_hunt("Someone Else Corp", "user-2", SCOPE)
        .await
        .unwrap();

    for handle in &handles[..6] {
        tasks.update(handle.task_id, &completed()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let active = dispatcher.list_active(REQUESTER, SCOPE).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, handles[6].task_id);

    let recent = dispatcher.list_recent(REQUESTER, SCOPE).await.unwrap();
    assert_eq!(recent.len(), 5);
    assert!(recent.iter().all(|t| t.status == HuntStatus::Completed));
    assert_eq!(recent[0].id, handles[5].task_id);

    assert!(dispatcher.list_recent(REQUESTER, "staging").await.unwrap().is_empty());
    assert!(dispatcher.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_poller_returns_degraded_rows_for_failures() {
    let (dispatcher, _scheduler, tasks) = dispatcher(Arc::new(FixedJitter(Duration::ZERO))).await;
    let names = vec!["Good Corp".to_string(), "Bad Corp".to_string()];
    let handles = dispatcher.start_batch(&names, REQUESTER, SCOPE).await.unwrap();
    let (good, bad) = (handles[0].task_id, handles[1].task_id);
    let missing = Uuid::new_v4();

    let settle_tasks = tasks.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        settle_tasks.update(good, &completed()).await.unwrap();
        settle_tasks
            .update(
                bad,
                &TaskUpdate::failed(
                    FailureKind::EmptyResult,
                    "No search results found for Bad Corp",
                    "Nothing found on the web for Bad Corp",
                ),
            )
            .await
            .unwrap();
    });

    let rows = TaskPoller::new(tasks, Duration::from_millis(10))
        .with_max_wait(Duration::from_secs(5))
        .wait_for_settlement(&[good, bad, missing])
        .await
        .unwrap();

    assert_eq!(rows.len(), 3);
    assert!(matches!(&rows[0], PolledRow::Completed { task_id, .. } if *task_id == good));
    match &rows[1] {
        PolledRow::Degraded { kind, message, .. } => {
            assert_eq!(*kind, Some(FailureKind::EmptyResult));
            assert!(message.contains("Bad Corp"));
        }
        other => panic!("expected degraded row, got {:?}", other),
    }
    assert!(matches!(
        &rows[2],
        PolledRow::Degraded { target_name: None, message, .. } if message == "Task not found"
    ));
}

#[tokio::test]
async fn test_poller_gives_up_after_max_wait() {
    let (dispatcher, _scheduler, tasks) = dispatcher(Arc::new(FixedJitter(Duration::ZERO))).await;
    let handle = dispatcher.start_hunt("Stuck Corp", REQUESTER, SCOPE).await.unwrap();

    let rows = TaskPoller::new(tasks, Duration::from_millis(10))
        .with_max_wait(Duration::from_millis(50))
        .wait_for_settlement(&[handle.task_id])
        .await
        .unwrap();

    assert!(matches!(
        &rows[0],
        PolledRow::Pending { progress, .. } if *progress == INITIAL_PROGRESS
    ));
}
