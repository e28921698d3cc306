// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 核验任务（hunt_task）：台账中的一行，带状态机与进度检查点
/// - 核验结果（hunt_result）：任务完成时持久化的结构化载荷
/// - 抽取实体（entity）：LLM 从搜索摘要中抽取的企业事实
/// - 企业记录（company）：内部登记库中的已核实记录
/// - 搜索结果（search_result）：搜索网关返回的单条摘要
pub mod company;
pub mod entity;
pub mod hunt_result;
pub mod hunt_task;
pub mod search_result;
