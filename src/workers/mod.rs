// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 在后台运行核验编排，负责启动偏移、并发上限和异常兜底
pub mod hunt_worker;


pub use hunt_worker::HuntWorker;
