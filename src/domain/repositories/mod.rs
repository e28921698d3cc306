// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 定义领域层依赖的持久化抽象，具体实现由基础设施层提供：
/// - 任务台账（task_repository）：核验任务的创建、原子行更新和查询
/// - 企业登记库（company_repository）：内部已核实企业记录的精确查找
pub mod company_repository;
pub mod task_repository;
