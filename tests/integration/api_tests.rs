// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, known_record, KNOWN_COMPANY, REQUESTER};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use truthhunt::domain::models::hunt_task::HuntStatus;
use truthhunt::domain::services::poller::{PolledRow, TaskPoller};
use uuid::Uuid;

fn requester_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-requester-id"),
        HeaderValue::from_static(REQUESTER),
    )
}

/// 提供方指向不可达地址；这些测试只走本地命中或请求校验
async fn offline_app() -> super::helpers::TestApp {
    create_test_app("http://127.0.0.1:1", "http://127.0.0.1:1").await
}

#[tokio::test]
async fn test_missing_requester_header_is_rejected() {
    let app = offline_app().await;

    let response = app
        .server
        .post("/v1/hunts")
        .json(&json!({ "targetName": KNOWN_COMPANY }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app.server.get("/v1/hunts/active").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_and_blank_targets_are_rejected() {
    let app = offline_app().await;
    let (name, value) = requester_header();

    let response = app
        .server
        .post("/v1/hunts")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "targetName": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/v1/hunts")
        .add_header(name, value)
        .json(&json!({ "targetName": "    " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Target name cannot be empty");
}

#[tokio::test]
async fn test_unknown_task_is_not_found() {
    let app = offline_app().await;

    let response = app
        .server
        .get(&format!("/v1/hunts/{}", Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_registry_hit_through_http() {
    let app = offline_app().await;
    app.registry.upsert(&known_record()).await.unwrap();
    let (name, value) = requester_header();

    let response = app
        .server
        .post("/v1/hunts")
        .add_header(name.clone(), value.clone())
        .json(&json!({ "targetName": KNOWN_COMPANY }))
        .await;
    response.assert_status(StatusCode::ACCEPTED);
    let handle: Value = response.json();
    assert_eq!(handle["status"], "RUNNING");
    assert_eq!(handle["progress"], 5);
    let task_id: Uuid = serde_json::from_value(handle["taskId"].clone()).unwrap();

    let rows = TaskPoller::new(app.tasks.clone(), Duration::from_millis(10))
        .with_max_wait(Duration::from_secs(5))
        .wait_for_settlement(&[task_id])
        .await
        .unwrap();
    assert!(matches!(rows[0], PolledRow::Completed { .. }));

    let response = app.server.get(&format!("/v1/hunts/{}", task_id)).await;
    response.assert_status(StatusCode::OK);
    let task: Value = response.json();
    assert_eq!(task["status"], "COMPLETED");
    assert_eq!(task["progress"], 100);
    assert_eq!(task["result"]["source"], "INTERNAL_DB_VERIFIED");
    assert_eq!(task["result"]["confidence"], 100);
    assert_eq!(task["result"]["unifiedCode"], "91510100MA6CGUXX0X");

    let response = app
        .server
        .get("/v1/hunts/recent")
        .add_header(name.clone(), value.clone())
        .await;
    let recent: Value = response.json();
    assert_eq!(recent["tasks"].as_array().unwrap().len(), 1);

    let response = app
        .server
        .get("/v1/hunts/active")
        .add_header(name, value)
        .await;
    let active: Value = response.json();
    assert!(active["tasks"].as_array().unwrap().is_empty());

    let stored = app.tasks.find_by_id(task_id).await.unwrap().unwrap();
    assert_eq!(stored.status, HuntStatus::Completed);
}

#[tokio::test]
async fn test_lists_are_scoped_by_env_header() {
    let app = offline_app().await;
    app.registry.upsert(&known_record()).await.unwrap();
    let (name, value) = requester_header();

    let response = app
        .server
        .post("/v1/hunts")
        .add_header(name.clone(), value.clone())
        .add_header(
            HeaderName::from_static("x-env-scope"),
            HeaderValue::from_static("staging"),
        )
        .json(&json!({ "targetName": KNOWN_COMPANY }))
        .await;
    response.assert_status(StatusCode::ACCEPTED);
    let handle: Value = response.json();
    let task_id: Uuid = serde_json::from_value(handle["taskId"].clone()).unwrap();

    TaskPoller::new(app.tasks.clone(), Duration::from_millis(10))
        .with_max_wait(Duration::from_secs(5))
        .wait_for_settlement(&[task_id])
        .await
        .unwrap();

    // 默认分区是 production，看不到 staging 的任务
    let response = app
        .server
        .get("/v1/hunts/recent")
        .add_header(name.clone(), value.clone())
        .await;
    let recent: Value = response.json();
    assert!(recent["tasks"].as_array().unwrap().is_empty());

    let response = app
        .server
        .get("/v1/hunts/recent")
        .add_header(name, value)
        .add_header(
            HeaderName::from_static("x-env-scope"),
            HeaderValue::from_static("staging"),
        )
        .await;
    let recent: Value = response.json();
    assert_eq!(recent["tasks"].as_array().unwrap().len(), 1);
}
