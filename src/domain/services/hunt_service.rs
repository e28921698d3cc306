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

use crate::config::settings::HuntSettings;
use crate::domain::models::hunt_result::{HuntResult, ResultSource};
use crate::domain::models::hunt_task::{FailureKind, HuntTask, TaskUpdate};
use crate::domain::models::search_result::SearchResult;
use crate::domain::models::entity::ExtractedEntity;
use crate::domain::repositories::company_repository::CompanyRepository;
use crate::domain::repositories::task_repository::{RepositoryError, TaskRepository};
use crate::domain::search::engine::{SearchError, SearchGateway};
use crate::domain::services::extraction_service::{EntityExtractor, ExtractionError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// 固定的进度检查点
pub mod checkpoints {
    pub const STARTED: i32 = 10;
    pub const LOCAL_MISS: i32 = 15;
    pub const SEARCHING: i32 = 30;
    pub const LOCAL_HIT: i32 = 40;
    pub const EXTRACTING: i32 = 60;
    pub const MERGING: i32 = 85;
}

/// 追加到企业名称后的权威关键词
const AUTHORITY_HINTS: &str = "工商注册信息 统一社会信用代码 法定代表人 注册资本";

/// 编排错误
///
/// 流水线内的任何错误都在顶层被捕获一次，并映射为一次 FAILED 写入。
#[derive(Error, Debug)]
pub enum HuntError {
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("No search results found for {0}")]
    NothingFound(String),
    #[error("Ledger error: {0}")]
    Ledger(#[from] RepositoryError),
}

impl HuntError {
    pub fn kind(&self) -> FailureKind {
        match self {
            HuntError::Search(e) => match e {
                SearchError::Configuration(_) => FailureKind::Configuration,
                SearchError::Transport(_) => FailureKind::Transport,
                SearchError::Timeout(_) => FailureKind::Timeout,
                SearchError::Provider { .. } => FailureKind::Provider,
                SearchError::Decode(_) => FailureKind::Parse,
            },
            HuntError::Extraction(e) => match e {
                ExtractionError::Configuration(_) => FailureKind::Configuration,
                ExtractionError::Transport(_) => FailureKind::Transport,
                ExtractionError::Timeout(_) => FailureKind::Timeout,
                ExtractionError::Provider { .. } => FailureKind::Provider,
                ExtractionError::Parse(_) => FailureKind::Parse,
            },
            HuntError::NothingFound(_) => FailureKind::EmptyResult,
            HuntError::Ledger(_) => FailureKind::Internal,
        }
    }

    /// 写入 step 字段的可读描述
    pub fn step_text(&self) -> String {
        match self {
            HuntError::Search(e) => format!("Web search failed: {}", e),
            HuntError::Extraction(e) => format!("Fact extraction failed: {}", e),
            HuntError::NothingFound(name) => format!("Nothing found on the web for {}", name),
            HuntError::Ledger(e) => format!("Hunt aborted: {}", e),
        }
    }
}

/// 各阶段的时间预算
#[derive(Debug, Clone, Copy)]
pub struct HuntBudgets {
    pub search_timeout: Duration,
    pub extraction_timeout: Duration,
    /// 本地命中后的固定核对延迟
    pub local_verify_delay: Duration,
}

impl Default for HuntBudgets {
    fn default() -> Self {
        Self {
            search_timeout: Duration::from_secs(15),
            extraction_timeout: Duration::from_secs(20),
            local_verify_delay: Duration::from_millis(800),
        }
    }
}

impl From<&HuntSettings> for HuntBudgets {
    fn from(settings: &HuntSettings) -> Self {
        Self {
            search_timeout: Duration::from_millis(settings.search_timeout_ms),
            extraction_timeout: Duration::from_millis(settings.extraction_timeout_ms),
            local_verify_delay: Duration::from_millis(settings.local_verify_delay_ms),
        }
    }
}

/// 单次运行的结局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuntOutcome {
    Completed(ResultSource),
    Failed(FailureKind),
}

/// 构造外部搜索查询
pub fn build_search_query(target_name: &str) -> String {
    format!("{} {}", target_name.trim(), AUTHORITY_HINTS)
}

/// 核验编排器
///
/// 驱动一个任务的状态机：先查内部登记库，未命中再走搜索 + 抽取。
/// 同一任务的各阶段严格串行；每个检查点在对应调用前后立即落库。
pub struct HuntOrchestrator {
    tasks: Arc<dyn TaskRepository>,
    registry: Arc<dyn CompanyRepository>,
    search: Arc<dyn SearchGateway>,
    extractor: Arc<dyn EntityExtractor>,
    budgets: HuntBudgets,
}

impl HuntOrchestrator {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        registry: Arc<dyn CompanyRepository>,
        search: Arc<dyn SearchGateway>,
        extractor: Arc<dyn EntityExtractor>,
        budgets: HuntBudgets,
    ) -> Self {
        Self {
            tasks,
            registry,
            search,
            extractor,
            budgets,
        }
    }

    /// 运行一个任务直到终态
    ///
    /// 不返回错误：失败会被写回台账。只有当 FAILED 写入本身也失败时才仅记录日志。
    #[instrument(skip(self, task), fields(task_id = %task.id, target = %task.target_name))]
    pub async fn run(&self, task: &HuntTask) -> HuntOutcome {
        let started = Instant::now();
        info!("Hunt started");

        let outcome = match self.execute(task).await {
            Ok(source) => {
                info!(%source, "Hunt completed");
                metrics::counter!("hunts_completed_total", "source" => source.to_string())
                    .increment(1);
                HuntOutcome::Completed(source)
            }
            Err(err) => {
                let kind = err.kind();
                warn!(%kind, error = %err, "Hunt failed");
                self.record_failure(task.id, &err).await;
                metrics::counter!("hunts_failed_total", "kind" => kind.to_string()).increment(1);
                HuntOutcome::Failed(kind)
            }
        };

        metrics::histogram!("hunt_duration_seconds").record(started.elapsed().as_secs_f64());
        outcome
    }

    async fn execute(&self, task: &HuntTask) -> Result<ResultSource, HuntError> {
        let id = task.id;
        let name = task.target_name.as_str();

        self.checkpoint(id, checkpoints::STARTED, "Checking internal registry")
            .await?;

        if let Some(record) = self.registry.find_by_exact_name(name).await? {
            debug!("Internal registry hit");
            self.checkpoint(
                id,
                checkpoints::LOCAL_HIT,
                "Internal record found, verifying",
            )
            .await?;
            sleep(self.budgets.local_verify_delay).await;

            let result = HuntResult::from_record(&record);
            self.tasks
                .update(
                    id,
                    &TaskUpdate::completed(result, "Verified against internal registry"),
                )
                .await?;
            return Ok(ResultSource::InternalDbVerified);
        }

        self.checkpoint(
            id,
            checkpoints::LOCAL_MISS,
            "No internal record, preparing web search",
        )
        .await?;

        let query = build_search_query(name);
        self.checkpoint(
            id,
            checkpoints::SEARCHING,
            format!("Searching the web via {}", self.search.name()),
        )
        .await?;
        let results = self.search_with_budget(&query).await?;
        if results.is_empty() {
            return Err(HuntError::NothingFound(name.to_string()));
        }

        self.checkpoint(
            id,
            checkpoints::EXTRACTING,
            format!("Found {} sources, extracting facts", results.len()),
        )
        .await?;
        let entity = self.extract_with_budget(&results).await?;

        self.checkpoint(id, checkpoints::MERGING, "Merging extracted facts")
            .await?;
        let confidence = entity.confidence;
        let result = HuntResult::from_extraction(entity, &results);
        self.tasks
            .update(
                id,
                &TaskUpdate::completed(
                    result,
                    format!("Verified via web search (confidence {})", confidence),
                ),
            )
            .await?;

        Ok(ResultSource::ExternalSearchRag)
    }

    async fn checkpoint(
        &self,
        id: Uuid,
        progress: i32,
        step: impl Into<String>,
    ) -> Result<(), HuntError> {
        self.tasks
            .update(id, &TaskUpdate::checkpoint(progress, step))
            .await?;
        Ok(())
    }

    /// 超时通过取消 future 实现，只中止这一次调用
    async fn search_with_budget(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let budget = self.budgets.search_timeout;
        match timeout(budget, self.search.query(query)).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout(budget.as_millis() as u64)),
        }
    }

    async fn extract_with_budget(
        &self,
        results: &[SearchResult],
    ) -> Result<ExtractedEntity, ExtractionError> {
        let budget = self.budgets.extraction_timeout;
        match timeout(budget, self.extractor.extract(results)).await {
            Ok(result) => result,
            Err(_) => Err(ExtractionError::Timeout(budget.as_millis() as u64)),
        }
    }

    async fn record_failure(&self, id: Uuid, err: &HuntError) {
        let update = TaskUpdate::failed(err.kind(), err.to_string(), err.step_text());
        if let Err(e) = self.tasks.update(id, &update).await {
            error!(task_id = %id, error = %e, "Failed to persist hunt failure");
        }
    }
}
