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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;

/// 应用程序配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 搜索提供方配置
    pub search: SearchSettings,
    /// LLM 提供方配置
    pub llm: LlmSettings,
    /// 核验流水线配置
    pub hunt: HuntSettings,
    /// 指标导出配置
    pub metrics: MetricsSettings,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// 搜索提供方（Google Custom Search JSON API）配置
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    /// API 密钥
    pub api_key: Option<String>,
    /// 可编程搜索引擎 ID（cx）
    pub engine_id: Option<String>,
    /// API 基础地址
    pub base_url: String,
    /// 国家/地区提示（gl）
    pub country: String,
    /// 界面语言提示（hl）
    pub language: String,
    /// 每次查询的结果数
    pub result_limit: u32,
}

/// LLM 提供方（OpenAI 兼容接口）配置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
}

/// 核验流水线配置
#[derive(Debug, Clone, Deserialize)]
pub struct HuntSettings {
    /// 搜索调用超时（毫秒）
    pub search_timeout_ms: u64,
    /// 抽取调用超时（毫秒）
    pub extraction_timeout_ms: u64,
    /// 本地命中后的核对延迟（毫秒）
    pub local_verify_delay_ms: u64,
    /// 批量提交的最大启动抖动（毫秒）
    pub batch_jitter_max_ms: u64,
    /// 同时运行的核验上限，0 表示不限制
    pub max_concurrent_hunts: usize,
}

/// 指标导出配置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    pub enabled: bool,
    pub listen_addr: String,
}

/// 配置错误
///
/// 缺少提供方密钥时在启动阶段立即报告，而不是等到第一次调用。
#[derive(Error, Debug, PartialEq)]
pub enum ConfigurationError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

fn present(value: &Option<String>) -> bool {
    value.as_ref().is_some_and(|v| !v.trim().is_empty())
}

impl SearchSettings {
    /// 校验密钥，返回 (api_key, engine_id)
    pub fn credentials(&self) -> Result<(&str, &str), ConfigurationError> {
        if !present(&self.api_key) {
            return Err(ConfigurationError::Missing("search.api_key"));
        }
        if !present(&self.engine_id) {
            return Err(ConfigurationError::Missing("search.engine_id"));
        }
        Ok((
            self.api_key.as_deref().unwrap_or_default(),
            self.engine_id.as_deref().unwrap_or_default(),
        ))
    }
}

impl LlmSettings {
    pub fn credentials(&self) -> Result<&str, ConfigurationError> {
        if !present(&self.api_key) {
            return Err(ConfigurationError::Missing("llm.api_key"));
        }
        Ok(self.api_key.as_deref().unwrap_or_default())
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加：内置默认值、`config/default`、`config/{APP_ENVIRONMENT}`、
    /// 以 `TRUTHHUNT__` 为前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("TRUTHHUNT").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 只包含内置默认值的配置构建器
    pub fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite::memory:")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("search.base_url", "https://www.googleapis.com")?
            .set_default("search.country", "cn")?
            .set_default("search.language", "zh-CN")?
            .set_default("search.result_limit", 10)?
            .set_default("llm.model", "gpt-4o-mini")?
            .set_default("llm.api_base_url", "https://api.openai.com/v1")?
            .set_default("hunt.search_timeout_ms", 15_000)?
            .set_default("hunt.extraction_timeout_ms", 20_000)?
            .set_default("hunt.local_verify_delay_ms", 800)?
            .set_default("hunt.batch_jitter_max_ms", 2_000)?
            .set_default("hunt.max_concurrent_hunts", 0)?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }

    /// 校验提供方密钥
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 所有密钥齐全
    /// * `Err(ConfigurationError)` - 第一个缺失的密钥
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.search.credentials()?;
        self.llm.credentials()?;
        Ok(())
    }
}
