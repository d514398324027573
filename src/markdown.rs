//! Markdown 行分类
//!
//! 逐行判断正文的结构角色，并找出其中可以翻译的部分。这里不做任何翻译，
//! 分类顺序即处理优先级：
//!
//! 1. 代码围栏（```` ``` ````）切换代码块状态，本行原样保留
//! 2. 代码块内部原样保留
//! 3. kramdown 属性、HTML 注释原样保留
//! 4. 标题、引用、列表项只翻译标记之后的文本
//! 5. 表格行逐个单元格翻译
//! 6. 其余按段落处理，保留行首缩进

use crate::filters::is_annotation;
use crate::table::is_table_row;
use once_cell::sync::Lazy;
use regex::Regex;

pub const FENCE_MARKER: &str = "```";

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*#{1,6}\s+)(.*)$").expect("heading pattern must compile"));

static QUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*>\s+)(.*)$").expect("quote pattern must compile"));

static LIST_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*(?:[-*+]|\d+\.)\s+(?:\[[ xX]\]\s+)?)(.*)$")
        .expect("list item pattern must compile")
});

/// 一行正文的结构角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// 代码围栏行
    Fence,
    /// 代码块内部
    Code,
    /// 属性或注释行
    Annotation,
    Heading { marker: &'a str, text: &'a str },
    Quote { marker: &'a str, text: &'a str },
    ListItem { marker: &'a str, text: &'a str },
    /// 列表标记后紧跟表格行，例如 `- | a | b |`
    ListTable { marker: &'a str, row: &'a str },
    TableRow { row: &'a str },
    Paragraph { indent: &'a str, text: &'a str },
}

impl LineKind<'_> {
    /// 该行原样保留，不产生任何翻译请求
    pub fn is_verbatim(&self) -> bool {
        matches!(self, LineKind::Fence | LineKind::Code | LineKind::Annotation)
    }
}

/// 拆出行尾换行符（`\n` 或 `\r\n`，最后一行可能没有）
pub fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(content) = line.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = line.strip_suffix('\n') {
        (content, "\n")
    } else {
        (line, "")
    }
}

/// 对不含换行符的一行分类
pub fn classify_line(raw: &str, in_code: bool) -> LineKind<'_> {
    let stripped = raw.trim();

    if stripped.starts_with(FENCE_MARKER) {
        return LineKind::Fence;
    }
    if in_code {
        return LineKind::Code;
    }
    if is_annotation(stripped) {
        return LineKind::Annotation;
    }

    if let Some((marker, text)) = split_marker(&HEADING, raw) {
        return LineKind::Heading { marker, text };
    }
    if let Some((marker, text)) = split_marker(&QUOTE, raw) {
        return LineKind::Quote { marker, text };
    }
    if let Some((marker, text)) = split_marker(&LIST_ITEM, raw) {
        if !text.starts_with('|') {
            return LineKind::ListItem { marker, text };
        }
        if is_table_row(text.trim()) {
            return LineKind::ListTable { marker, row: text };
        }
    }

    if is_table_row(stripped) {
        return LineKind::TableRow { row: raw };
    }

    let text = raw.trim_start_matches(' ');
    let indent = &raw[..raw.len() - text.len()];
    LineKind::Paragraph { indent, text }
}

fn split_marker<'a>(pattern: &Regex, raw: &'a str) -> Option<(&'a str, &'a str)> {
    let captures = pattern.captures(raw)?;
    let marker = captures.get(1)?.as_str();
    let text = captures.get(2)?.as_str();
    Some((marker, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminators() {
        assert_eq!(split_terminator("a\n"), ("a", "\n"));
        assert_eq!(split_terminator("a\r\n"), ("a", "\r\n"));
        assert_eq!(split_terminator("a"), ("a", ""));
        assert_eq!(split_terminator("\n"), ("", "\n"));
    }

    #[test]
    fn fences_win_over_everything() {
        assert_eq!(classify_line("```rust", false), LineKind::Fence);
        assert_eq!(classify_line("  ```", true), LineKind::Fence);
    }

    #[test]
    fn code_block_content_is_verbatim() {
        assert_eq!(classify_line("# not a heading", true), LineKind::Code);
        assert!(classify_line("| a | b |", true).is_verbatim());
    }

    #[test]
    fn annotations() {
        assert_eq!(classify_line("{: .prompt-tip }", false), LineKind::Annotation);
        assert_eq!(classify_line("  <!-- comment", false), LineKind::Annotation);
        assert_eq!(classify_line("-->", false), LineKind::Annotation);
    }

    #[test]
    fn headings() {
        assert_eq!(
            classify_line("## Lists", false),
            LineKind::Heading { marker: "## ", text: "Lists" }
        );
        assert!(matches!(
            classify_line("####### too deep", false),
            LineKind::Paragraph { .. }
        ));
        assert!(matches!(classify_line("#hashtag", false), LineKind::Paragraph { .. }));
    }

    #[test]
    fn quotes() {
        assert_eq!(
            classify_line("> Quoted text", false),
            LineKind::Quote { marker: "> ", text: "Quoted text" }
        );
    }

    #[test]
    fn list_items() {
        assert_eq!(
            classify_line("- Item", false),
            LineKind::ListItem { marker: "- ", text: "Item" }
        );
        assert_eq!(
            classify_line("  12. Ordered", false),
            LineKind::ListItem { marker: "  12. ", text: "Ordered" }
        );
        assert_eq!(
            classify_line("- [x] Done task", false),
            LineKind::ListItem { marker: "- [x] ", text: "Done task" }
        );
    }

    #[test]
    fn list_marker_before_table_row() {
        assert_eq!(
            classify_line("- | a | b |", false),
            LineKind::ListTable { marker: "- ", row: "| a | b |" }
        );
    }

    #[test]
    fn table_rows() {
        assert_eq!(
            classify_line("| a | b |", false),
            LineKind::TableRow { row: "| a | b |" }
        );
        assert_eq!(
            classify_line("  | a | b |", false),
            LineKind::TableRow { row: "  | a | b |" }
        );
    }

    #[test]
    fn paragraphs_keep_indent() {
        assert_eq!(
            classify_line("    indented text", false),
            LineKind::Paragraph { indent: "    ", text: "indented text" }
        );
        assert_eq!(
            classify_line("", false),
            LineKind::Paragraph { indent: "", text: "" }
        );
    }
}
