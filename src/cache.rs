//! 翻译缓存
//!
//! 只在一次运行内有效，不落盘。同一语言对下相同的文本最多翻译一次。

use crate::types::LanguagePair;
use std::collections::HashMap;

/// 缓存键：源语言、目标语言、原始文本
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source_lang: String,
    pub target_lang: String,
    pub text: String,
}

impl CacheKey {
    pub fn new(pair: &LanguagePair, text: &str) -> Self {
        Self {
            source_lang: pair.source.clone(),
            target_lang: pair.target.clone(),
            text: text.to_string(),
        }
    }
}

/// 缓存统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub sets: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

/// 进程内翻译缓存
#[derive(Debug, Default)]
pub struct TranslationCache {
    entries: HashMap<CacheKey, String>,
    stats: CacheStats,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取缓存项
    pub fn get(&mut self, key: &CacheKey) -> Option<&str> {
        match self.entries.get(key) {
            Some(translated) => {
                self.stats.hits += 1;
                Some(translated.as_str())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// 设置缓存项
    pub fn insert(&mut self, key: CacheKey, translated: String) {
        self.entries.insert(key, translated);
        self.stats.sets += 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
