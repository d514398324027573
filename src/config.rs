//! 配置管理模块
//!
//! 提供TOML配置文件的读取、写入和自动发现功能。配置包含翻译服务设置、
//! 重试策略，以及要生成的译文任务列表。

use crate::error::{Result, TranslationError};
use crate::types::{RetryConfig, TranslationConfig, VariantJob};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 未指定 `--config` 时依次查找的文件
pub const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "translate-variants.toml",
    ".translate-variants.toml",
    "config.toml",
];

/// 配置文件结构
///
/// # 示例
///
/// ```toml
/// root = "."
///
/// [translation]
/// enabled = true
/// deeplx_api_url = "http://localhost:1188/translate"
/// timeout_secs = 20
///
/// [retry]
/// max_attempts = 2
/// retry_delay_ms = 80
/// cooldown_ms = 20
///
/// [[variants]]
/// source = "_posts/2019-08-08-write-a-new-post.md"
/// target = "_posts/2019-08-08-write-a-new-post-fr.md"
/// source_lang = "en"
/// target_lang = "fr"
/// target_locale = "fr-FR"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantsConfig {
    /// 相对路径的基准目录；为空时使用配置文件所在目录
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    /// 翻译配置
    #[serde(default)]
    pub translation: TranslationConfig,
    /// 重试策略
    #[serde(default)]
    pub retry: RetryConfig,
    /// 译文任务，按顺序执行
    #[serde(default)]
    pub variants: Vec<VariantJob>,
}

impl VariantsConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| TranslationError::io(path, e))?;
        let mut config: VariantsConfig = toml::from_str(&content)?;

        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.root = Some(match config.root.take() {
            Some(root) if root.is_relative() => base.join(root),
            Some(root) => root,
            None => base,
        });
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| TranslationError::io(path, e))?;
        Ok(())
    }

    /// 加载配置：优先使用指定路径，否则在默认位置查找
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => Self::load_from_default_locations().ok_or_else(|| {
                TranslationError::Config(format!(
                    "no configuration file found (looked for {})",
                    DEFAULT_CONFIG_PATHS.join(", ")
                ))
            })?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from multiple possible locations
    pub fn load_from_default_locations() -> Option<Self> {
        for path in &DEFAULT_CONFIG_PATHS {
            if !Path::new(path).exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(config) => {
                    info!("Loaded configuration from: {}", path);
                    return Some(config);
                }
                Err(e) => {
                    warn!("Failed to load config from {}: {}", path, e);
                }
            }
        }
        None
    }

    /// 检查任务列表
    pub fn validate(&self) -> Result<()> {
        if self.variants.is_empty() {
            return Err(TranslationError::Config(
                "no [[variants]] configured".to_string(),
            ));
        }
        for (index, job) in self.variants.iter().enumerate() {
            let fields = [
                ("source_lang", &job.source_lang),
                ("target_lang", &job.target_lang),
                ("target_locale", &job.target_locale),
            ];
            if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
                return Err(TranslationError::Config(format!(
                    "variant #{} ({}) has an empty {}",
                    index + 1,
                    job.source.display(),
                    name
                )));
            }
            if job.source == job.target {
                return Err(TranslationError::Config(format!(
                    "variant #{} would overwrite its source {}",
                    index + 1,
                    job.source.display()
                )));
            }
        }
        Ok(())
    }

    /// 把任务中的相对路径解析到 `root` 下
    pub fn resolved_jobs(&self) -> Vec<VariantJob> {
        let root = self.root.clone().unwrap_or_default();
        self.variants
            .iter()
            .map(|job| VariantJob {
                source: root.join(&job.source),
                target: root.join(&job.target),
                ..job.clone()
            })
            .collect()
    }

    /// 示例配置：把一篇英文文章翻译成俄语和法语
    pub fn example() -> Self {
        let variant = |lang: &str, locale: &str| VariantJob {
            source: PathBuf::from("_posts/2019-08-08-write-a-new-post.md"),
            target: PathBuf::from(format!("_posts/2019-08-08-write-a-new-post-{lang}.md")),
            source_lang: "en".to_string(),
            target_lang: lang.to_string(),
            target_locale: locale.to_string(),
        };

        Self {
            root: None,
            translation: TranslationConfig::default(),
            retry: RetryConfig::default(),
            variants: vec![variant("ru", "ru-RU"), variant("fr", "fr-FR")],
        }
    }

    /// Generate example configuration file
    pub fn generate_example_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::example().save_to_file(path)
    }
}
