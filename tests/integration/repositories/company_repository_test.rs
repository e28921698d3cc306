// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::integration::helpers::{known_record, setup_db, KNOWN_COMPANY};
use truthhunt::domain::repositories::company_repository::CompanyRepository;
use truthhunt::infrastructure::repositories::company_repo_impl::CompanyRepositoryImpl;

#[tokio::test]
async fn test_exact_name_lookup() {
    let repo = CompanyRepositoryImpl::new(setup_db().await);
    repo.upsert(&known_record()).await.unwrap();

    let hit = repo.find_by_exact_name(KNOWN_COMPANY).await.unwrap();
    assert_eq!(hit.unwrap().unified_code, "91510100MA6CGUXX0X");

    // 只做精确匹配
    assert!(repo.find_by_exact_name("成都华鲲振宇").await.unwrap().is_none());
    assert!(repo
        .find_by_exact_name("Nonexistent Test Corp")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_upsert_overwrites_by_name_and_keeps_identity() {
    let repo = CompanyRepositoryImpl::new(setup_db().await);
    let first = repo.upsert(&known_record()).await.unwrap();

    let mut changed = known_record();
    changed.legal_rep = "李四".to_string();
    let second = repo.upsert(&changed).await.unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.legal_rep, "李四");

    let stored = repo.find_by_exact_name(KNOWN_COMPANY).await.unwrap().unwrap();
    assert_eq!(stored.legal_rep, "李四");
}
