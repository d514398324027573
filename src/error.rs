//! 错误处理模块
//!
//! 定义翻译工具中使用的错误类型和错误处理机制。
//!
//! 单个文本片段的翻译失败不会出现在这里：它们在 [`crate::translator`] 中被
//! 重试并降级为原文（见 [`crate::types::SpanOutcome`]）。这里的错误都是致命的，
//! 会终止整个运行。

use std::path::PathBuf;
use thiserror::Error;

/// 翻译错误类型
///
/// 包含翻译过程中可能出现的各种错误情况。
///
/// # 变体说明
///
/// * `Http` - HTTP请求错误
/// * `Io` - 读写文件失败
/// * `FrontMatter` - 文档头部元数据（YAML）解析或序列化失败
/// * `Config` - 配置文件错误
/// * `ApiError` - API响应错误，包含错误代码和消息
/// * `ParseError` - 解析错误
/// * `Custom` - 自定义错误消息
#[derive(Debug, Error)]
pub enum TranslationError {
    /// HTTP请求错误
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// 文件读写错误
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// 出错的文件路径
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 元数据错误
    #[error("Front matter error: {0}")]
    FrontMatter(String),
    /// 配置错误
    #[error("Config error: {0}")]
    Config(String),
    /// API响应错误
    #[error("API error {code}: {message}")]
    ApiError {
        /// 错误代码
        code: i32,
        /// 错误消息
        message: String
    },
    /// 解析错误
    #[error("Parse error: {0}")]
    ParseError(String),
    /// 自定义错误消息
    #[error("{0}")]
    Custom(String),
}

impl TranslationError {
    /// 为 I/O 错误附加文件路径
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TranslationError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_yml::Error> for TranslationError {
    fn from(error: serde_yml::Error) -> Self {
        TranslationError::FrontMatter(error.to_string())
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::Config(error.to_string())
    }
}

impl From<toml::ser::Error> for TranslationError {
    fn from(error: toml::ser::Error) -> Self {
        TranslationError::Config(error.to_string())
    }
}

impl From<String> for TranslationError {
    fn from(error: String) -> Self {
        TranslationError::Custom(error)
    }
}

impl From<&str> for TranslationError {
    fn from(error: &str) -> Self {
        TranslationError::Custom(error.to_string())
    }
}

/// 翻译结果类型别名
///
/// 简化返回类型，使用 `TranslationError` 作为错误类型。
///
/// # 示例
///
/// ```rust
/// use post_variant_translator::{Result, TranslationError};
///
/// fn example_function() -> Result<String> {
///     Err(TranslationError::Custom("boom".to_string()))
/// }
///
/// assert!(example_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, TranslationError>;
