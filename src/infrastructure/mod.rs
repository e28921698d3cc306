// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 提供领域层抽象接口的具体技术实现：
/// - 数据库（database）：连接池和实体映射
/// - 抽取引擎（llm）：OpenAI 兼容接口
/// - 指标（metrics）：Prometheus 导出器
/// - 仓库实现（repositories）：任务台账与内部登记库
/// - 搜索（search）：Google Custom Search 网关
pub mod database;
pub mod llm;
pub mod metrics;
pub mod repositories;
pub mod search;
