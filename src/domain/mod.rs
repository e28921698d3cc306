// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含企业核验（hunt）的核心业务逻辑，包括：
/// - 领域模型（models）：核验任务、核验结果、抽取实体和搜索结果
/// - 仓库接口（repositories）：任务台账与内部登记库的持久化抽象
/// - 搜索（search）：外部搜索网关接口
/// - 服务（services）：编排器、批量派发器、抽取引擎接口和轮询器
///
/// 领域层不依赖任何具体的数据库或 HTTP 实现。
pub mod models;
pub mod repositories;
pub mod search;
pub mod services;
