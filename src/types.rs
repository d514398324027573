//! 类型定义模块
//!
//! 定义翻译工具中使用的配置结构、任务描述和翻译结果类型。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 翻译服务配置
///
/// # 字段说明
///
/// * `enabled` - 是否启用翻译功能；关闭时所有文本原样输出
/// * `deeplx_api_url` - DeepLX API地址
/// * `timeout_secs` - 单次请求的超时时间（秒）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// 是否启用翻译功能
    pub enabled: bool,
    /// DeepLX API地址
    pub deeplx_api_url: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            deeplx_api_url: "http://localhost:1188/translate".to_string(),
            timeout_secs: 20,
        }
    }
}

/// 重试策略
///
/// 默认值：最多尝试2次，失败后等待80ms，成功后等待20ms再发下一个请求。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub retry_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// 每次成功调用后的等待时间，避免触发服务端限流
    pub cooldown_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            retry_delay_ms: 80,
            max_delay_ms: 1000,
            backoff_multiplier: 1.0,
            cooldown_ms: 20,
        }
    }
}

/// 源语言/目标语言对
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// 一个翻译任务：把 `source` 文档翻译后写到 `target`
///
/// `target_locale` 会写入输出文档元数据的 `language` 字段（例如 `ru-RU`）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantJob {
    pub source: PathBuf,
    pub target: PathBuf,
    pub source_lang: String,
    pub target_lang: String,
    pub target_locale: String,
}

impl VariantJob {
    pub fn language_pair(&self) -> LanguagePair {
        LanguagePair::new(&self.source_lang, &self.target_lang)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeepLXRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DpTransRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

#[derive(Debug, Deserialize)]
pub struct DeepLXResponse {
    pub code: i32,
    pub data: String,
}

/// 单个文本片段的翻译结果
///
/// 片段级别的失败不会作为错误向上传播，而是以 `Fallback` 返回原文。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanOutcome {
    /// 命中缓存
    Cached(String),
    /// 不需要翻译（空白、纯标记、长串编码等）或翻译已关闭
    Skipped(String),
    /// 翻译成功
    Translated(String),
    /// 所有尝试都失败，返回原文
    Fallback(String),
}

impl SpanOutcome {
    pub fn text(&self) -> &str {
        match self {
            SpanOutcome::Cached(text)
            | SpanOutcome::Skipped(text)
            | SpanOutcome::Translated(text)
            | SpanOutcome::Fallback(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            SpanOutcome::Cached(text)
            | SpanOutcome::Skipped(text)
            | SpanOutcome::Translated(text)
            | SpanOutcome::Fallback(text) => text,
        }
    }
}

/// 单个文档的翻译统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationStats {
    pub cached: usize,
    pub skipped: usize,
    pub translated: usize,
    pub fallback: usize,
}

impl TranslationStats {
    pub fn record(&mut self, outcome: &SpanOutcome) {
        match outcome {
            SpanOutcome::Cached(_) => self.cached += 1,
            SpanOutcome::Skipped(_) => self.skipped += 1,
            SpanOutcome::Translated(_) => self.translated += 1,
            SpanOutcome::Fallback(_) => self.fallback += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.cached + self.skipped + self.translated + self.fallback
    }
}
