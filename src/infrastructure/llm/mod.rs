// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 抽取引擎实现（OpenAI 兼容的 chat/completions 接口）
pub mod openai;

pub use openai::OpenAiExtractor;
