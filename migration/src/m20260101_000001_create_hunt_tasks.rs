// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HuntTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HuntTasks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HuntTasks::TargetName).string().not_null())
                    .col(ColumnDef::new(HuntTasks::RequesterId).string().not_null())
                    .col(ColumnDef::new(HuntTasks::EnvScope).string().not_null())
                    .col(ColumnDef::new(HuntTasks::Status).string().not_null())
                    .col(
                        ColumnDef::new(HuntTasks::Progress)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(HuntTasks::Step).string().not_null())
                    .col(ColumnDef::new(HuntTasks::ResultData).json().null())
                    .col(ColumnDef::new(HuntTasks::ErrorKind).string().null())
                    .col(ColumnDef::new(HuntTasks::ErrorDetail).text().null())
                    .col(
                        ColumnDef::new(HuntTasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(HuntTasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hunt_tasks_requester_scope_status")
                    .table(HuntTasks::Table)
                    .col(HuntTasks::RequesterId)
                    .col(HuntTasks::EnvScope)
                    .col(HuntTasks::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hunt_tasks_updated_at")
                    .table(HuntTasks::Table)
                    .col(HuntTasks::UpdatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HuntTasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum HuntTasks {
    Table,
    Id,
    TargetName,
    RequesterId,
    EnvScope,
    Status,
    Progress,
    Step,
    ResultData,
    ErrorKind,
    ErrorDetail,
    CreatedAt,
    UpdatedAt,
}
