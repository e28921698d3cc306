// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "company_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub official_name: String,
    pub unified_code: String,
    pub legal_rep: String,
    pub registered_capital: String,
    pub establishment_date: String,
    pub company_type: Option<String>,
    pub listing_status: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub main_business: Option<String>,
    pub address: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub shareholder: Option<String>,
    pub created_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
