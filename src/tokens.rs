//! 标记保护模块
//!
//! 翻译前把不能翻译的 Markdown/Liquid 片段替换成 `¤¤<n>¤¤` 占位符，翻译后再原样还原。
//!
//! 已知限制：如果文档本身就包含形如 `¤¤3¤¤` 的文本，还原时可能被误替换。

use once_cell::sync::Lazy;
use regex::Regex;

/// 受保护的模式，按优先级排列：图片、链接、行内代码、URL、`{{ }}` 表达式、`{% %}` 标签
static TOKEN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"!\[[^\]]*\]\([^\)]*\)",
        r"\[[^\]]*\]\([^\)]*\)",
        r"`[^`]*`",
        r"https?://\S+",
        r"\{\{[^\}]*\}\}",
        r"\{%[^%]*%\}",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("token pattern must compile"))
    .collect()
});

const PLACEHOLDER_MARK: &str = "¤¤";

/// 生成第 `index` 个占位符
pub fn placeholder(index: usize) -> String {
    format!("{PLACEHOLDER_MARK}{index}{PLACEHOLDER_MARK}")
}

/// 占位符到原始文本的映射
///
/// 第 `i` 个元素对应占位符 `¤¤i¤¤`，编号严格递增。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap {
    originals: Vec<String>,
}

impl TokenMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, original: &str) -> String {
        let token = placeholder(self.originals.len());
        self.originals.push(original.to_string());
        token
    }

    /// 按占位符查找原始文本
    pub fn get(&self, token: &str) -> Option<&str> {
        let index: usize = token
            .strip_prefix(PLACEHOLDER_MARK)?
            .strip_suffix(PLACEHOLDER_MARK)?
            .parse()
            .ok()?;
        self.originals.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// 按编号升序遍历 `(占位符, 原始文本)`
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (String, &str)> + '_ {
        self.originals
            .iter()
            .enumerate()
            .map(|(index, original)| (placeholder(index), original.as_str()))
    }
}

/// 保护文本中的标记
///
/// 依次处理每一类模式：每次只替换当前文本中的第一个匹配，直到该类不再匹配，
/// 再进入下一类。占位符不会被后续模式再次匹配。
pub fn protect_tokens(text: &str) -> (String, TokenMap) {
    let mut token_map = TokenMap::new();
    let mut working = text.to_string();

    for pattern in TOKEN_PATTERNS.iter() {
        while let Some(found) = pattern.find(&working) {
            let range = found.range();
            let token = token_map.push(found.as_str());
            working.replace_range(range, &token);
        }
    }

    (working, token_map)
}

/// 还原占位符
///
/// 必须按编号从大到小替换：`¤¤1¤¤` 可能出现在 `¤¤10¤¤` 或其他片段的原文中。
pub fn restore_tokens(text: &str, token_map: &TokenMap) -> String {
    let mut out = text.to_string();
    for (token, original) in token_map.iter().rev() {
        out = out.replace(&token, original);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_untouched() {
        let text = "Just a sentence, with punctuation!";
        let (protected, map) = protect_tokens(text);
        assert_eq!(protected, text);
        assert!(map.is_empty());
        assert_eq!(restore_tokens(&protected, &map), text);
    }

    #[test]
    fn image_takes_priority_over_link() {
        let (protected, map) = protect_tokens("See ![logo](/img/logo.png) here");
        assert_eq!(protected, "See ¤¤0¤¤ here");
        assert_eq!(map.get("¤¤0¤¤"), Some("![logo](/img/logo.png)"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn classes_are_applied_in_priority_order() {
        let text = "Use `cargo` with {{ site.url }} and [docs](https://example.com) or https://rust-lang.org {% raw %}";
        let (protected, map) = protect_tokens(text);
        assert_eq!(
            protected,
            "Use ¤¤1¤¤ with ¤¤3¤¤ and ¤¤0¤¤ or ¤¤2¤¤ ¤¤4¤¤"
        );
        assert_eq!(map.get("¤¤0¤¤"), Some("[docs](https://example.com)"));
        assert_eq!(map.get("¤¤1¤¤"), Some("`cargo`"));
        assert_eq!(map.get("¤¤2¤¤"), Some("https://rust-lang.org"));
        assert_eq!(map.get("¤¤3¤¤"), Some("{{ site.url }}"));
        assert_eq!(map.get("¤¤4¤¤"), Some("{% raw %}"));
        assert_eq!(restore_tokens(&protected, &map), text);
    }

    #[test]
    fn nested_tokens_restore_in_reverse_order() {
        // 链接先被保护，随后整个行内代码（包含链接的占位符）再被保护
        let text = "`[a](b)` text";
        let (protected, map) = protect_tokens(text);
        assert_eq!(protected, "¤¤1¤¤ text");
        assert_eq!(map.get("¤¤1¤¤"), Some("`¤¤0¤¤`"));
        assert_eq!(restore_tokens(&protected, &map), text);
    }

    #[test]
    fn double_digit_placeholders_do_not_collide() {
        let text = (0..12)
            .map(|i| format!("`c{i}`"))
            .collect::<Vec<_>>()
            .join(" and ");
        let (protected, map) = protect_tokens(&text);
        assert_eq!(map.len(), 12);
        assert!(protected.contains("¤¤11¤¤"));
        assert_eq!(restore_tokens(&protected, &map), text);
    }

    #[test]
    fn mixed_tokens_round_trip() {
        let text = "![a](x.png) [b](y) `c` http://d.example {{ e }} {% f %} [g](h) `i` {{ j }}";
        let (protected, map) = protect_tokens(text);
        assert_eq!(map.len(), 9);
        assert!(!protected.contains('`'));
        assert_eq!(restore_tokens(&protected, &map), text);
    }

    #[test]
    fn restore_survives_reordered_placeholders() {
        let (protected, map) = protect_tokens("Read [this](a) and [that](b)");
        assert_eq!(protected, "Read ¤¤0¤¤ and ¤¤1¤¤");
        let translated = "Lisez ¤¤1¤¤ puis ¤¤0¤¤";
        assert_eq!(restore_tokens(translated, &map), "Lisez [that](b) puis [this](a)");
    }

    #[test]
    fn lookup_rejects_malformed_placeholder() {
        let (_, map) = protect_tokens("`x`");
        assert_eq!(map.get("¤¤0"), None);
        assert_eq!(map.get("¤¤7¤¤"), None);
    }
}
