//! 翻译服务核心模块
//!
//! 把标记保护、过滤、缓存、重试和逐行分发串起来。整个流程是顺序执行的：
//! 一次只处理一行、一次只发一个翻译请求。

use crate::backend::TranslateBackend;
use crate::cache::{CacheKey, TranslationCache};
use crate::error::Result;
use crate::filters::should_translate;
use crate::markdown::{classify_line, split_terminator, LineKind};
use crate::table::{is_separator_row, pad_cell, TableRow};
use crate::tokens::{protect_tokens, restore_tokens};
use crate::types::{LanguagePair, RetryConfig, SpanOutcome, TranslationConfig, TranslationStats};
use log::{debug, warn};
use std::time::Duration;
use tokio::time::sleep;

/// 带退避的重试机制
///
/// 最多执行 `max_attempts` 次（至少一次）；两次尝试之间等待 `retry_delay_ms`，
/// 每次按 `backoff_multiplier` 增长，不超过 `max_delay_ms`。返回最后一次的错误。
pub async fn retry_with_backoff<F, Fut, T>(mut operation: F, config: &RetryConfig) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut delay = config.retry_delay_ms;
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(e) => {
                warn!("Attempt {} failed: {}. Retrying in {}ms...", attempt, e, delay);
                sleep(Duration::from_millis(delay)).await;
                delay = std::cmp::min(
                    (delay as f64 * config.backoff_multiplier) as u64,
                    config.max_delay_ms,
                );
                attempt += 1;
            }
        }
    }
}

/// 翻译服务主类
///
/// 持有翻译后端和本次运行的缓存。同一个实例可以依次处理多个文档，
/// 缓存在文档之间共享。
///
/// # 示例
///
/// ```rust
/// use post_variant_translator::{LanguagePair, MockBackend, RetryConfig, TranslationConfig, TranslationService};
///
/// # tokio_test::block_on(async {
/// let mut service = TranslationService::new(
///     MockBackend::working(),
///     TranslationConfig::default(),
///     RetryConfig::default(),
/// );
/// let pair = LanguagePair::new("en", "fr");
/// let body = service.translate_body("# Hello\n```\n# code\n```\n", &pair).await;
/// assert_eq!(body, "# [fr] Hello\n```\n# code\n```\n");
/// # });
/// ```
pub struct TranslationService<B> {
    backend: B,
    config: TranslationConfig,
    retry: RetryConfig,
    cache: TranslationCache,
    stats: TranslationStats,
}

impl<B: TranslateBackend> TranslationService<B> {
    pub fn new(backend: B, config: TranslationConfig, retry: RetryConfig) -> Self {
        Self {
            backend,
            config,
            retry,
            cache: TranslationCache::new(),
            stats: TranslationStats::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// 取出自上次调用以来的片段统计并清零
    pub fn take_stats(&mut self) -> TranslationStats {
        std::mem::take(&mut self.stats)
    }

    /// 翻译一个文本片段
    ///
    /// 流程：查缓存 → 保护标记 → 过滤 → 调用后端（带重试）→ 还原标记 → 写缓存。
    /// 后端全部失败时返回原文（`SpanOutcome::Fallback`），不会返回错误。
    pub async fn translate_text(&mut self, text: &str, pair: &LanguagePair) -> SpanOutcome {
        if !self.config.enabled {
            return SpanOutcome::Skipped(text.to_string());
        }

        let key = CacheKey::new(pair, text);
        if let Some(cached) = self.cache.get(&key) {
            return SpanOutcome::Cached(cached.to_string());
        }

        let (protected, token_map) = protect_tokens(text);
        if !should_translate(&protected) {
            let restored = restore_tokens(&protected, &token_map);
            self.cache.insert(key, restored.clone());
            return SpanOutcome::Skipped(restored);
        }

        let backend = &self.backend;
        let request = protected.as_str();
        let outcome = match retry_with_backoff(move || backend.translate(request, pair), &self.retry).await {
            Ok(translated) => {
                if self.retry.cooldown_ms > 0 {
                    sleep(Duration::from_millis(self.retry.cooldown_ms)).await;
                }
                SpanOutcome::Translated(restore_tokens(&translated, &token_map))
            }
            Err(e) => {
                warn!(
                    "Translation {} -> {} failed, keeping original text: {}",
                    pair.source, pair.target, e
                );
                SpanOutcome::Fallback(restore_tokens(&protected, &token_map))
            }
        };

        self.cache.insert(key, outcome.text().to_string());
        outcome
    }

    /// 翻译片段并记录统计，只返回文本
    pub async fn translate_span(&mut self, text: &str, pair: &LanguagePair) -> String {
        let outcome = self.translate_text(text, pair).await;
        self.stats.record(&outcome);
        outcome.into_text()
    }

    /// 翻译一个表格行（不含换行符）
    ///
    /// 对齐行原样返回；非空单元格分别翻译并两侧各补一个空格，空单元格保持不变。
    pub async fn translate_table_row(&mut self, row: &str, pair: &LanguagePair) -> String {
        if is_separator_row(row) {
            return row.to_string();
        }

        let parsed = TableRow::parse(row);
        let mut cells = Vec::with_capacity(parsed.cells.len());
        for cell in &parsed.cells {
            let content = cell.trim();
            if content.is_empty() {
                cells.push((*cell).to_string());
            } else {
                let translated = self.translate_span(content, pair).await;
                cells.push(pad_cell(&translated));
            }
        }
        parsed.render(&cells)
    }

    /// 翻译正文中的一行（包含行尾换行符）
    ///
    /// 返回翻译后的行和更新后的“是否在代码块内”状态。输出保留原来的换行符。
    pub async fn translate_line(
        &mut self,
        line: &str,
        pair: &LanguagePair,
        in_code: bool,
    ) -> (String, bool) {
        let (raw, terminator) = split_terminator(line);

        let content = match classify_line(raw, in_code) {
            LineKind::Fence => return (line.to_string(), !in_code),
            LineKind::Code | LineKind::Annotation => return (line.to_string(), in_code),
            LineKind::Heading { marker, text }
            | LineKind::Quote { marker, text }
            | LineKind::ListItem { marker, text } => {
                format!("{marker}{}", self.translate_span(text, pair).await)
            }
            LineKind::ListTable { marker, row } => {
                format!("{marker}{}", self.translate_table_row(row, pair).await)
            }
            LineKind::TableRow { row } => self.translate_table_row(row, pair).await,
            LineKind::Paragraph { indent, text } => {
                format!("{indent}{}", self.translate_span(text, pair).await)
            }
        };

        (format!("{content}{terminator}"), in_code)
    }

    /// 逐行翻译正文，代码块状态在行之间传递
    pub async fn translate_body(&mut self, body: &str, pair: &LanguagePair) -> String {
        let mut out = String::with_capacity(body.len());
        let mut in_code = false;

        for line in body.split_inclusive('\n') {
            let (translated, next_state) = self.translate_line(line, pair, in_code).await;
            out.push_str(&translated);
            in_code = next_state;
        }

        debug!(
            "正文翻译完成: {} 字符 -> {} 字符",
            body.chars().count(),
            out.chars().count()
        );
        out
    }
}
