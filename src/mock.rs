//! 测试用的翻译后端
//!
//! 不访问网络，按指定行为返回结果：
//! - `MockBackend::working()` - 总是成功，译文为 `[目标语言] 原文`
//! - `MockBackend::failing()` - 总是失败
//! - `MockBackend::intermittent(n)` - 每第 n 次请求失败
//! - `MockBackend::fail_first(n)` - 前 n 次请求失败，之后成功

use crate::backend::TranslateBackend;
use crate::error::{Result, TranslationError};
use crate::types::LanguagePair;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// 模拟后端的行为
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    Working,
    Failing,
    Intermittent { fail_every: usize },
    FailFirst { failures: usize },
}

/// 模拟翻译后端，记录收到的每个请求
#[derive(Debug)]
pub struct MockBackend {
    behavior: MockBehavior,
    request_count: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    pub fn fail_first(failures: usize) -> Self {
        Self::new(MockBehavior::FailFirst { failures })
    }

    /// 已收到的请求数（包括失败的）
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// 已收到的请求文本
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn should_fail(&self, count: usize) -> bool {
        match self.behavior {
            MockBehavior::Working => false,
            MockBehavior::Failing => true,
            MockBehavior::Intermittent { fail_every } => fail_every > 0 && count % fail_every == 0,
            MockBehavior::FailFirst { failures } => count <= failures,
        }
    }
}

#[async_trait]
impl TranslateBackend for MockBackend {
    async fn translate(&self, text: &str, pair: &LanguagePair) -> Result<String> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(text.to_string());
        }

        if self.should_fail(count) {
            return Err(TranslationError::ApiError {
                code: 503,
                message: format!("mock backend failed request #{count}"),
            });
        }

        Ok(format!("[{}] {}", pair.target, text))
    }
}
