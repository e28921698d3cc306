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

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use migration::{Migrator, MigratorTrait};
use truthhunt::config::settings::Settings;
use truthhunt::domain::repositories::company_repository::CompanyRepository;
use truthhunt::domain::repositories::task_repository::TaskRepository;
use truthhunt::domain::services::dispatch_service::{HuntDispatcher, RandomJitter};
use truthhunt::domain::services::hunt_service::{HuntBudgets, HuntOrchestrator};
use truthhunt::infrastructure::database::connection;
use truthhunt::infrastructure::llm::OpenAiExtractor;
use truthhunt::infrastructure::repositories::company_repo_impl::CompanyRepositoryImpl;
use truthhunt::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use truthhunt::infrastructure::search::GoogleSearchGateway;
use truthhunt::presentation::routes;
use truthhunt::utils::telemetry;
use truthhunt::workers::HuntWorker;

/// 关闭时等待在途核验自行结束的时长
const WORKER_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting truthhunt...");

    // 2. Load and validate configuration
    let settings = Settings::new()?;
    settings.validate()?;
    info!("Configuration loaded");

    truthhunt::infrastructure::metrics::init_metrics(&settings.metrics)?;

    // 3. Connect to database
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");

    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Repositories and provider gateways
    let tasks: Arc<dyn TaskRepository> = Arc::new(TaskRepositoryImpl::new(db.clone()));
    let registry: Arc<dyn CompanyRepository> = Arc::new(CompanyRepositoryImpl::new(db.clone()));

    let budgets = HuntBudgets::from(&settings.hunt);
    let search = Arc::new(GoogleSearchGateway::new(
        &settings.search,
        budgets.search_timeout,
    )?);
    let extractor = Arc::new(OpenAiExtractor::new(
        &settings.llm,
        budgets.extraction_timeout,
    )?);

    // 5. Orchestrator, worker and dispatcher
    let orchestrator = Arc::new(HuntOrchestrator::new(
        tasks.clone(),
        registry,
        search,
        extractor,
        budgets,
    ));
    let worker = Arc::new(HuntWorker::new(
        orchestrator,
        tasks.clone(),
        settings.hunt.max_concurrent_hunts,
    ));
    let dispatcher = Arc::new(HuntDispatcher::new(
        tasks,
        worker.clone(),
        Arc::new(RandomJitter::new(Duration::from_millis(
            settings.hunt.batch_jitter_max_ms,
        ))),
    ));

    // 6. Start HTTP server
    let app = routes::routes(dispatcher).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(in_flight = worker.in_flight(), "Shutting down hunt workers...");
    worker.shutdown(WORKER_SHUTDOWN_GRACE).await;

    Ok(())
}

/// 等待关闭信号
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => error!("Unable to listen for shutdown signal: {}", err),
    }
}
