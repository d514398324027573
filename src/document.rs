//! 文档级编排
//!
//! 读取源文档 → 拆分元数据 → 翻译 `title`/`description` → 覆盖 `language` →
//! 逐行翻译正文 → 序列化元数据 → 一次性写出目标文件。

use crate::backend::TranslateBackend;
use crate::error::{Result, TranslationError};
use crate::front_matter::{render_document, set_string_field, split_front_matter, string_field};
use crate::translator::TranslationService;
use crate::types::{TranslationStats, VariantJob};
use log::info;
use std::fs;
use std::path::PathBuf;

/// 需要翻译的元数据字段
pub const TRANSLATED_FIELDS: [&str; 2] = ["title", "description"];

/// 写入目标语言标签的元数据字段
pub const LANGUAGE_FIELD: &str = "language";

/// 单个任务的完成情况
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantReport {
    pub target: PathBuf,
    pub stats: TranslationStats,
}

/// 翻译整篇文档的文本，不做任何文件读写
pub async fn translate_document<B: TranslateBackend>(
    service: &mut TranslationService<B>,
    source_text: &str,
    job: &VariantJob,
) -> Result<String> {
    let pair = job.language_pair();
    let (mut front_matter, body) = split_front_matter(source_text)?;

    for field in TRANSLATED_FIELDS {
        let Some(value) = string_field(&front_matter, field).map(str::to_string) else {
            continue;
        };
        let translated = service.translate_span(&value, &pair).await;
        set_string_field(&mut front_matter, field, translated);
    }

    set_string_field(&mut front_matter, LANGUAGE_FIELD, job.target_locale.as_str());

    let translated_body = service.translate_body(body, &pair).await;
    render_document(front_matter, &translated_body)
}

/// 执行一个翻译任务并写出目标文件
///
/// 读写失败和元数据解析失败会直接返回错误；目标文件只在整篇翻译完成后写入。
pub async fn translate_variant<B: TranslateBackend>(
    service: &mut TranslationService<B>,
    job: &VariantJob,
) -> Result<VariantReport> {
    let source_text =
        fs::read_to_string(&job.source).map_err(|e| TranslationError::io(&job.source, e))?;

    let output = translate_document(service, &source_text, job).await?;

    if let Some(parent) = job.target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TranslationError::io(parent, e))?;
    }
    fs::write(&job.target, output).map_err(|e| TranslationError::io(&job.target, e))?;

    let stats = service.take_stats();
    info!("Translated {}", job.target.display());
    info!(
        "  {} spans: {} translated, {} cached, {} skipped, {} kept after failures",
        stats.total(),
        stats.translated,
        stats.cached,
        stats.skipped,
        stats.fallback
    );

    Ok(VariantReport {
        target: job.target.clone(),
        stats,
    })
}

/// 按顺序执行所有任务，共享同一个缓存；任一任务出错即停止
pub async fn run_variants<B: TranslateBackend>(
    service: &mut TranslationService<B>,
    jobs: &[VariantJob],
) -> Result<Vec<VariantReport>> {
    let mut reports = Vec::with_capacity(jobs.len());
    for job in jobs {
        reports.push(translate_variant(service, job).await?);
    }

    let cache_stats = service.cache().stats();
    info!(
        "Finished {} variants ({} cached translations, hit rate {:.0}%)",
        reports.len(),
        service.cache().len(),
        cache_stats.hit_rate() * 100.0
    );
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;
    use crate::types::{RetryConfig, TranslationConfig};
    use std::path::Path;

    fn service(backend: MockBackend) -> TranslationService<MockBackend> {
        let retry = RetryConfig {
            retry_delay_ms: 0,
            cooldown_ms: 0,
            ..RetryConfig::default()
        };
        TranslationService::new(backend, TranslationConfig::default(), retry)
    }

    fn job(source: &Path, target: &Path) -> VariantJob {
        VariantJob {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            source_lang: "en".to_string(),
            target_lang: "ru".to_string(),
            target_locale: "ru-RU".to_string(),
        }
    }

    #[tokio::test]
    async fn translates_metadata_and_body() {
        let mut service = service(MockBackend::working());
        let source = "---\ntitle: Getting Started\ndescription: '  '\nlanguage: en\n---\n# Intro\n";
        let out = translate_document(&mut service, source, &job(Path::new("a"), Path::new("b")))
            .await
            .unwrap();

        let (front_matter, body) = split_front_matter(&out).unwrap();
        assert_eq!(string_field(&front_matter, "title"), Some("[ru] Getting Started"));
        assert_eq!(
            front_matter.get("description").and_then(serde_yml::Value::as_str),
            Some("  ")
        );
        assert_eq!(string_field(&front_matter, "language"), Some("ru-RU"));
        assert_eq!(body, "# [ru] Intro\n");
        assert_eq!(service.backend().requests(), vec!["Getting Started", "Intro"]);
    }

    #[tokio::test]
    async fn language_is_added_when_missing() {
        let mut service = service(MockBackend::working());
        let out = translate_document(&mut service, "Plain body\n", &job(Path::new("a"), Path::new("b")))
            .await
            .unwrap();
        assert_eq!(out, "---\nlanguage: ru-RU\n---\n[ru] Plain body\n");
    }

    #[tokio::test]
    async fn bad_front_matter_is_fatal() {
        let mut service = service(MockBackend::working());
        let result =
            translate_document(&mut service, "---\n[unclosed\n---\nbody\n", &job(Path::new("a"), Path::new("b")))
                .await;
        assert!(matches!(result, Err(TranslationError::FrontMatter(_))));
    }

    #[tokio::test]
    async fn missing_source_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = service(MockBackend::working());
        let job = job(&dir.path().join("missing.md"), &dir.path().join("out.md"));
        let result = translate_variant(&mut service, &job).await;
        assert!(matches!(result, Err(TranslationError::Io { .. })));
        assert!(!dir.path().join("out.md").exists());
    }
}
