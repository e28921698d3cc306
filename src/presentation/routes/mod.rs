// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::dispatch_service::HuntDispatcher;
use crate::presentation::handlers::hunt_handler;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

/// 创建应用路由
///
/// # 参数
///
/// * `dispatcher` - 派发器，所有核验端点共用
pub fn routes(dispatcher: Arc<HuntDispatcher>) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let hunt_routes = Router::new()
        .route("/v1/hunts", post(hunt_handler::create_hunt))
        .route("/v1/hunts/batch", post(hunt_handler::create_batch))
        .route("/v1/hunts/active", get(hunt_handler::list_active))
        .route("/v1/hunts/recent", get(hunt_handler::list_recent))
        .route("/v1/hunts/{id}", get(hunt_handler::get_hunt))
        .layer(Extension(dispatcher));

    Router::new().merge(public_routes).merge(hunt_routes)
}

/// 健康检查端点
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
