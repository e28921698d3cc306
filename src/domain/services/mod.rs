// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 抽取服务（extraction_service）：抽取引擎接口、提示词与输出结构
/// - 核验服务（hunt_service）：单个任务的状态机编排
/// - 派发服务（dispatch_service）：单个/批量提交、启动抖动与读取接口
/// - 轮询器（poller）：等待一组任务全部进入终态
pub mod dispatch_service;
pub mod extraction_service;
pub mod hunt_service;
pub mod poller;
