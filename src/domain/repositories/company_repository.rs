// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::company::CompanyRecord;
use crate::domain::repositories::task_repository::RepositoryError;
use async_trait::async_trait;

/// 内部企业登记库
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// 按企业名称精确查找
    ///
    /// 未命中返回 `Ok(None)`，这是正常的控制流信号，会触发外部检索分支。
    async fn find_by_exact_name(&self, name: &str) -> Result<Option<CompanyRecord>, RepositoryError>;

    /// 写入或覆盖一条记录（以企业名称为键）
    async fn upsert(&self, record: &CompanyRecord) -> Result<CompanyRecord, RepositoryError>;
}
