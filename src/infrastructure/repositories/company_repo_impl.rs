// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::company::CompanyRecord;
use crate::domain::repositories::company_repository::CompanyRepository;
use crate::domain::repositories::task_repository::RepositoryError;
use crate::infrastructure::database::entities::company_record as company_entity;
use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;

/// 内部登记库实现
#[derive(Clone)]
pub struct CompanyRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl CompanyRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<company_entity::Model> for CompanyRecord {
    fn from(model: company_entity::Model) -> Self {
        Self {
            id: model.id,
            official_name: model.official_name,
            unified_code: model.unified_code,
            legal_rep: model.legal_rep,
            registered_capital: model.registered_capital,
            establishment_date: model.establishment_date,
            company_type: model.company_type,
            listing_status: model.listing_status,
            main_business: model.main_business,
            address: model.address,
            shareholder: model.shareholder,
            created_at: model.created_at,
        }
    }
}

impl From<&CompanyRecord> for company_entity::ActiveModel {
    fn from(record: &CompanyRecord) -> Self {
        Self {
            id: Set(record.id),
            official_name: Set(record.official_name.clone()),
            unified_code: Set(record.unified_code.clone()),
            legal_rep: Set(record.legal_rep.clone()),
            registered_capital: Set(record.registered_capital.clone()),
            establishment_date: Set(record.establishment_date.clone()),
            company_type: Set(record.company_type.clone()),
            listing_status: Set(record.listing_status.clone()),
            main_business: Set(record.main_business.clone()),
            address: Set(record.address.clone()),
            shareholder: Set(record.shareholder.clone()),
            created_at: Set(record.created_at),
        }
    }
}

#[async_trait]
impl CompanyRepository for CompanyRepositoryImpl {
    async fn find_by_exact_name(
        &self,
        name: &str,
    ) -> Result<Option<CompanyRecord>, RepositoryError> {
        let model = company_entity::Entity::find()
            .filter(company_entity::Column::OfficialName.eq(name))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn upsert(&self, record: &CompanyRecord) -> Result<CompanyRecord, RepositoryError> {
        let existing = company_entity::Entity::find()
            .filter(company_entity::Column::OfficialName.eq(record.official_name.as_str()))
            .one(self.db.as_ref())
            .await?;

        let mut model = company_entity::ActiveModel::from(record);
        let saved = match existing {
            // 覆盖时保留原有的主键和创建时间
            Some(current) => {
                model.id = Set(current.id);
                model.created_at = Set(current.created_at);
                model.update(self.db.as_ref()).await?
            }
            None => model.insert(self.db.as_ref()).await?,
        };

        Ok(saved.into())
    }
}
