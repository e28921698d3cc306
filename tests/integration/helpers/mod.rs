// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum_test::TestServer;
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use truthhunt::config::settings::{LlmSettings, SearchSettings};
use truthhunt::domain::models::company::CompanyRecord;
use truthhunt::domain::models::hunt_task::HuntTask;
use truthhunt::domain::repositories::company_repository::CompanyRepository;
use truthhunt::domain::repositories::task_repository::TaskRepository;
use truthhunt::domain::services::dispatch_service::{HuntDispatcher, RandomJitter};
use truthhunt::domain::services::hunt_service::{HuntBudgets, HuntOrchestrator};
use truthhunt::infrastructure::llm::OpenAiExtractor;
use truthhunt::infrastructure::repositories::company_repo_impl::CompanyRepositoryImpl;
use truthhunt::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use truthhunt::infrastructure::search::GoogleSearchGateway;
use truthhunt::presentation::routes;
use truthhunt::workers::HuntWorker;
use uuid::Uuid;

pub const KNOWN_COMPANY: &str = "成都华鲲振宇智能科技有限责任公司";
pub const KNOWN_CODE: &str = "91510100MA6CGUXX0X";
pub const REQUESTER: &str = "user-1";
pub const SCOPE: &str = "production";

pub async fn setup_db() -> Arc<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    let db = Arc::new(db);
    Migrator::up(db.as_ref(), None).await.unwrap();
    db
}

pub fn search_settings(base_url: &str) -> SearchSettings {
    SearchSettings {
        api_key: Some("key-test".to_string()),
        engine_id: Some("cx-test".to_string()),
        base_url: base_url.to_string(),
        country: "cn".to_string(),
        language: "zh-CN".to_string(),
        result_limit: 10,
    }
}

pub fn llm_settings(base_url: &str) -> LlmSettings {
    LlmSettings {
        api_key: Some("sk-test".to_string()),
        model: "gpt-4o-mini".to_string(),
        api_base_url: base_url.to_string(),
    }
}

pub fn test_budgets() -> HuntBudgets {
    HuntBudgets {
        search_timeout: Duration::from_millis(500),
        extraction_timeout: Duration::from_millis(500),
        local_verify_delay: Duration::ZERO,
    }
}

pub fn known_record() -> CompanyRecord {
    CompanyRecord {
        id: Uuid::new_v4(),
        official_name: KNOWN_COMPANY.to_string(),
        unified_code: KNOWN_CODE.to_string(),
        legal_rep: "张三".to_string(),
        registered_capital: "10000万元".to_string(),
        establishment_date: "2019-11-28".to_string(),
        company_type: Some("有限责任公司".to_string()),
        listing_status: Some("未上市".to_string()),
        main_business: Some("服务器研发与制造".to_string()),
        address: "四川省成都市高新区".to_string(),
        shareholder: None,
        created_at: Utc::now().into(),
    }
}

pub fn new_task(name: &str, requester: &str, scope: &str) -> HuntTask {
    HuntTask::new(name.to_string(), requester.to_string(), scope.to_string())
}

/// Google Custom Search 风格的响应体
pub fn google_items(n: usize) -> Value {
    let items: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "title": format!("{} - 企业信息 {}", KNOWN_COMPANY, i),
                "link": format!("https://www.qcc.com/firm/{}.html", i),
                "displayLink": "www.qcc.com",
                "snippet": format!("统一社会信用代码：{}，法定代表人：张三", KNOWN_CODE),
                "pagemap": { "metatags": [{ "article:published_time": "2024-03-01" }] }
            })
        })
        .collect();
    json!({ "items": items })
}

/// chat/completions 风格的响应体，内容为模型输出文本
pub fn chat_completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

pub fn extraction_output(confidence: u8) -> String {
    json!({
        "officialName": KNOWN_COMPANY,
        "unifiedCode": KNOWN_CODE,
        "legalRep": "张三",
        "registeredCapital": "10000万元",
        "establishmentDate": "2019-11-28",
        "companyType": "有限责任公司",
        "listingStatus": "未上市",
        "mainBusiness": "服务器研发与制造",
        "address": "四川省成都市高新区",
        "shareholder": "未找到",
        "confidence": confidence,
        "sources": [{ "field": "unifiedCode", "url": "https://www.qcc.com/firm/0.html" }]
    })
    .to_string()
}

#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<DatabaseConnection>,
    pub tasks: Arc<dyn TaskRepository>,
    pub registry: Arc<dyn CompanyRepository>,
    pub worker: Arc<HuntWorker>,
}

/// 组装完整的服务：真实台账、真实网关（指向 mock 提供方）、真实工作器
pub async fn create_test_app(search_base: &str, llm_base: &str) -> TestApp {
    let db = setup_db().await;
    let tasks: Arc<dyn TaskRepository> = Arc::new(TaskRepositoryImpl::new(db.clone()));
    let registry: Arc<dyn CompanyRepository> = Arc::new(CompanyRepositoryImpl::new(db.clone()));

    let budgets = test_budgets();
    let search =
        Arc::new(GoogleSearchGateway::new(&search_settings(search_base), budgets.search_timeout).unwrap());
    let extractor = Arc::new(
        OpenAiExtractor::new(&llm_settings(llm_base), budgets.extraction_timeout).unwrap(),
    );

    let orchestrator = Arc::new(HuntOrchestrator::new(
        tasks.clone(),
        registry.clone(),
        search,
        extractor,
        budgets,
    ));
    let worker = Arc::new(HuntWorker::new(orchestrator, tasks.clone(), 0));
    let dispatcher = Arc::new(HuntDispatcher::new(
        tasks.clone(),
        worker.clone(),
        Arc::new(RandomJitter::new(Duration::from_millis(50))),
    ));

    let server = TestServer::new(routes::routes(dispatcher)).unwrap();

    TestApp {
        server,
        db,
        tasks,
        registry,
        worker,
    }
}
