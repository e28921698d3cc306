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

use crate::domain::models::hunt_task::{HuntStatus, HuntTask, TaskUpdate};
use crate::domain::repositories::task_repository::{
    RepositoryError, TaskFilter, TaskOrder, TaskRepository,
};
use crate::infrastructure::database::entities::hunt_task as task_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

/// 任务台账实现
///
/// 基于SeaORM实现。每次部分更新都是一条带条件的 UPDATE：
/// 只命中仍为 RUNNING 且进度不会回退的行。
#[derive(Clone)]
pub struct TaskRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl TaskRepositoryImpl {
    /// 创建新的任务台账实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 条件更新未命中时，判断拒绝原因
    async fn explain_rejection(&self, id: Uuid) -> RepositoryError {
        match self.find_by_id(id).await {
            Ok(None) => RepositoryError::NotFound,
            Ok(Some(task)) if task.status.is_terminal() => RepositoryError::AlreadySettled,
            Ok(Some(_)) => RepositoryError::ProgressRegression,
            Err(e) => e,
        }
    }
}

impl TryFrom<task_entity::Model> for HuntTask {
    type Error = RepositoryError;

    /// 还原一行任务，并校验结果与状态的对应关系
    fn try_from(model: task_entity::Model) -> Result<Self, Self::Error> {
        let id = model.id;
        let corrupt = |reason: String| RepositoryError::CorruptRow { id, reason };

        let status: HuntStatus = model
            .status
            .parse()
            .map_err(|_| corrupt(format!("unknown status {}", model.status)))?;

        let result_data = match model.result_data {
            Some(value) => Some(
                serde_json::from_value(value)
                    .map_err(|e| corrupt(format!("undecodable result_data: {}", e)))?,
            ),
            None => None,
        };
        if (status == HuntStatus::Completed) != result_data.is_some() {
            return Err(corrupt(format!(
                "status {} does not match result_data presence",
                status
            )));
        }

        let error_kind = match model.error_kind {
            Some(kind) => Some(
                kind.parse()
                    .map_err(|_| corrupt(format!("unknown error_kind {}", kind)))?,
            ),
            None => None,
        };

        Ok(Self {
            id,
            target_name: model.target_name,
            requester_id: model.requester_id,
            env_scope: model.env_scope,
            status,
            progress: model.progress,
            step: model.step,
            result_data,
            error_kind,
            error_detail: model.error_detail,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

fn to_domain(model: task_entity::Model) -> Result<HuntTask, RepositoryError> {
    HuntTask::try_from(model).inspect_err(|e| error!(error = %e, "Failed to decode task row"))
}

impl TryFrom<&HuntTask> for task_entity::ActiveModel {
    type Error = RepositoryError;

    fn try_from(task: &HuntTask) -> Result<Self, Self::Error> {
        let result_data = task
            .result_data
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| RepositoryError::InvalidUpdate(e.to_string()))?;

        Ok(Self {
            id: Set(task.id),
            target_name: Set(task.target_name.clone()),
            requester_id: Set(task.requester_id.clone()),
            env_scope: Set(task.env_scope.clone()),
            status: Set(task.status.to_string()),
            progress: Set(task.progress),
            step: Set(task.step.clone()),
            result_data: Set(result_data),
            error_kind: Set(task.error_kind.map(|k| k.to_string())),
            error_detail: Set(task.error_detail.clone()),
            created_at: Set(task.created_at),
            updated_at: Set(task.updated_at),
        })
    }
}

#[async_trait]
impl TaskRepository for TaskRepositoryImpl {
    async fn create(&self, task: &HuntTask) -> Result<HuntTask, RepositoryError> {
        let model = task_entity::ActiveModel::try_from(task)?;
        let inserted = model.insert(self.db.as_ref()).await?;
        to_domain(inserted)
    }

    async fn update(&self, id: Uuid, update: &TaskUpdate) -> Result<(), RepositoryError> {
        update.validate()?;

        let now: DateTime<FixedOffset> = Utc::now().into();
        let mut query = task_entity::Entity::update_many()
            .col_expr(task_entity::Column::UpdatedAt, Expr::value(now))
            .filter(task_entity::Column::Id.eq(id))
            .filter(task_entity::Column::Status.eq(HuntStatus::Running.to_string()));

        if let Some(progress) = update.progress {
            query = query
                .col_expr(task_entity::Column::Progress, Expr::value(progress))
                .filter(task_entity::Column::Progress.lte(progress));
        }
        if let Some(step) = &update.step {
            query = query.col_expr(task_entity::Column::Step, Expr::value(step.clone()));
        }
        if let Some(status) = update.status {
            query = query.col_expr(task_entity::Column::Status, Expr::value(status.to_string()));
        }
        if let Some(result) = &update.result_data {
            let value = serde_json::to_value(result)
                .map_err(|e| RepositoryError::InvalidUpdate(e.to_string()))?;
            query = query.col_expr(task_entity::Column::ResultData, Expr::value(value));
        }
        if let Some(kind) = update.error_kind {
            query = query.col_expr(
                task_entity::Column::ErrorKind,
                Expr::value(Some(kind.to_string())),
            );
        }
        if let Some(detail) = &update.error_detail {
            query = query.col_expr(
                task_entity::Column::ErrorDetail,
                Expr::value(Some(detail.clone())),
            );
        }

        let result = query.exec(self.db.as_ref()).await?;
        if result.rows_affected == 0 {
            let err = self.explain_rejection(id).await;
            debug!(task_id = %id, error = %err, "Task update rejected");
            return Err(err);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<HuntTask>, RepositoryError> {
        let model = task_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        model.map(to_domain).transpose()
    }

    async fn find_many(
        &self,
        filter: TaskFilter,
        order: TaskOrder,
        limit: u64,
    ) -> Result<Vec<HuntTask>, RepositoryError> {
        let mut query = task_entity::Entity::find();

        if let Some(requester_id) = filter.requester_id {
            query = query.filter(task_entity::Column::RequesterId.eq(requester_id));
        }
        if let Some(env_scope) = filter.env_scope {
            query = query.filter(task_entity::Column::EnvScope.eq(env_scope));
        }
        if let Some(statuses) = filter.statuses {
            query = query.filter(
                task_entity::Column::Status.is_in(statuses.iter().map(|s| s.to_string())),
            );
        }
        if let Some(ids) = filter.task_ids {
            query = query.filter(task_entity::Column::Id.is_in(ids));
        }

        query = match order {
            TaskOrder::NewestCreated => query.order_by_desc(task_entity::Column::CreatedAt),
            TaskOrder::RecentlyUpdated => query.order_by_desc(task_entity::Column::UpdatedAt),
        };

        let models = query.limit(limit).all(self.db.as_ref()).await?;
        models.into_iter().map(to_domain).collect()
    }
}
