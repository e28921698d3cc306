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
                    .table(CompanyRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompanyRecords::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CompanyRecords::OfficialName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CompanyRecords::UnifiedCode).string().not_null())
                    .col(ColumnDef::new(CompanyRecords::LegalRep).string().not_null())
                    .col(
                        ColumnDef::new(CompanyRecords::RegisteredCapital)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyRecords::EstablishmentDate)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CompanyRecords::CompanyType).string().null())
                    .col(ColumnDef::new(CompanyRecords::ListingStatus).string().null())
                    .col(ColumnDef::new(CompanyRecords::MainBusiness).text().null())
                    .col(ColumnDef::new(CompanyRecords::Address).string().not_null())
                    .col(ColumnDef::new(CompanyRecords::Shareholder).text().null())
                    .col(
                        ColumnDef::new(CompanyRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompanyRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CompanyRecords {
    Table,
    Id,
    OfficialName,
    UnifiedCode,
    LegalRep,
    RegisteredCapital,
    EstablishmentDate,
    CompanyType,
    ListingStatus,
    MainBusiness,
    Address,
    Shareholder,
    CreatedAt,
}
