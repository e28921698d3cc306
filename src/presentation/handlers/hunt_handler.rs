// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    application::dto::{
        hunt_request::{BatchHuntRequestDto, HuntRequestDto},
        hunt_response::{BatchHuntResponseDto, HuntListDto, HuntTaskDto},
    },
    domain::repositories::task_repository::RepositoryError,
    domain::services::dispatch_service::HuntDispatcher,
    presentation::{errors::AppError, extractors::requester::RequesterContext},
};

/// 提交单个核验，立即返回任务句柄
pub async fn create_hunt(
    Extension(dispatcher): Extension<Arc<HuntDispatcher>>,
    requester: RequesterContext,
    Json(payload): Json<HuntRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let handle = dispatcher
        .start_hunt(
            &payload.target_name,
            &requester.requester_id,
            &requester.env_scope,
        )
        .await?;

    Ok((StatusCode::ACCEPTED, Json(handle)))
}

/// 批量提交，返回与输入顺序一致的句柄列表（空名称已被丢弃）
pub async fn create_batch(
    Extension(dispatcher): Extension<Arc<HuntDispatcher>>,
    requester: RequesterContext,
    Json(payload): Json<BatchHuntRequestDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tasks = dispatcher
        .start_batch(
            &payload.names,
            &requester.requester_id,
            &requester.env_scope,
        )
        .await?;

    Ok((StatusCode::ACCEPTED, Json(BatchHuntResponseDto { tasks })))
}

pub async fn list_active(
    Extension(dispatcher): Extension<Arc<HuntDispatcher>>,
    requester: RequesterContext,
) -> Result<Json<HuntListDto>, AppError> {
    let tasks = dispatcher
        .list_active(&requester.requester_id, &requester.env_scope)
        .await?;
    Ok(Json(tasks.into()))
}

pub async fn list_recent(
    Extension(dispatcher): Extension<Arc<HuntDispatcher>>,
    requester: RequesterContext,
) -> Result<Json<HuntListDto>, AppError> {
    let tasks = dispatcher
        .list_recent(&requester.requester_id, &requester.env_scope)
        .await?;
    Ok(Json(tasks.into()))
}

/// 按 ID 读取任务，任何提交者都可以读取
pub async fn get_hunt(
    Extension(dispatcher): Extension<Arc<HuntDispatcher>>,
    Path(id): Path<Uuid>,
) -> Result<Json<HuntTaskDto>, AppError> {
    let task = dispatcher.get(id).await?.ok_or(RepositoryError::NotFound)?;
    Ok(Json(task.into()))
}
