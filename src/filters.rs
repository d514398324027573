//! 文本过滤器模块
//!
//! 判断一段（已做标记保护的）文本是否值得发送给翻译服务。

use once_cell::sync::Lazy;
use regex::Regex;

/// 超过该字符数的片段视为不透明数据
pub const MAX_TRANSLATABLE_CHARS: usize = 280;

/// 不含空格且超过该长度的片段视为标识符、哈希等
const MAX_UNSPACED_CHARS: usize = 40;

static BASE64_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9+/]{80,}").expect("base64 pattern must compile"));

static STRUCTURAL_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-=*`~_#:.|{}\[\]()+/\\<>!0-9\s]+$").expect("structural pattern must compile")
});

static ANGLE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<https?://[^>]+>$").expect("angle url pattern must compile"));

/// 以这些前缀开头的行是 kramdown 属性或 HTML 注释，而不是正文
pub const ANNOTATION_PREFIXES: [&str; 3] = ["{:", "<!--", "-->"];

pub fn is_annotation(stripped: &str) -> bool {
    ANNOTATION_PREFIXES
        .iter()
        .any(|prefix| stripped.starts_with(prefix))
}

/// 判断文本是否需要翻译
///
/// 规则按顺序检查，先命中者决定结果：
/// 空白、超长、内嵌 `data:image/`、长 base64 串、无空格的长串、
/// 纯结构字符、`<URL>`、属性/注释前缀。
pub fn should_translate(text: &str) -> bool {
    let stripped = text.trim();
    if stripped.is_empty() {
        return false;
    }

    let char_count = stripped.chars().count();
    if char_count > MAX_TRANSLATABLE_CHARS {
        return false;
    }
    if stripped.contains("data:image/") {
        return false;
    }
    if BASE64_RUN.is_match(stripped) {
        return false;
    }
    if !stripped.contains(' ') && char_count > MAX_UNSPACED_CHARS {
        return false;
    }
    if STRUCTURAL_ONLY.is_match(stripped) {
        return false;
    }
    if ANGLE_URL.is_match(stripped) {
        return false;
    }
    if is_annotation(stripped) {
        return false;
    }

    true
}
