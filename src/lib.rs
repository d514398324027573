//! # Post Variant Translator
//!
//! 为博客文章（Jekyll/Chirpy 风格的 Markdown）生成其他语言的版本：只翻译正文中的自然语言，
//! 保留代码块、链接、图片、Liquid 模板标记、表格结构以及 YAML 元数据。
//!
//! ## 主要特性
//!
//! - **代码块处理**: 围栏代码块内的内容原样保留
//! - **标记保护**: 链接、图片、行内代码、URL、`{{ }}`/`{% %}` 在翻译前替换为占位符，翻译后还原
//! - **逐行分发**: 标题、引用、列表只翻译标记后的文本，表格逐个单元格翻译
//! - **缓存**: 同一次运行中相同的文本只翻译一次
//! - **错误恢复**: 单个片段翻译失败时重试，仍失败则保留原文，不中断整篇文档
//! - **配置灵活**: 任务列表、服务地址、重试策略都来自TOML配置文件
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use post_variant_translator::{run_variants, DeepLXBackend, TranslationService, VariantsConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = VariantsConfig::load(None)?;
//!     let backend = DeepLXBackend::new(&config.translation)?;
//!     let mut service = TranslationService::new(backend, config.translation.clone(), config.retry.clone());
//!
//!     for report in run_variants(&mut service, &config.resolved_jobs()).await? {
//!         println!("{}: {} spans", report.target.display(), report.stats.total());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## 配置文件支持
//!
//! ```toml
//! [translation]
//! deeplx_api_url = "http://localhost:1188/translate"
//!
//! [[variants]]
//! source = "_posts/2019-08-09-getting-started.md"
//! target = "_posts/2019-08-09-getting-started-ru.md"
//! source_lang = "en"
//! target_lang = "ru"
//! target_locale = "ru-RU"
//! ```

pub mod backend;
pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod filters;
pub mod front_matter;
pub mod markdown;
pub mod mock;
pub mod table;
pub mod tokens;
pub mod translator;
pub mod types;

pub use backend::{DeepLXBackend, TranslateBackend};
pub use cache::{CacheKey, CacheStats, TranslationCache};
pub use config::VariantsConfig;
pub use document::{run_variants, translate_document, translate_variant, VariantReport};
pub use error::{Result, TranslationError};
pub use filters::should_translate;
pub use front_matter::{render_document, split_front_matter};
pub use markdown::{classify_line, LineKind};
pub use mock::{MockBackend, MockBehavior};
pub use tokens::{protect_tokens, restore_tokens, TokenMap};
pub use translator::{retry_with_backoff, TranslationService};
pub use types::{
    LanguagePair, RetryConfig, SpanOutcome, TranslationConfig, TranslationStats, VariantJob,
};
