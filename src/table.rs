//! 表格行处理
//!
//! 只负责拆分与重新拼接管道符表格行，单元格的翻译由 [`crate::translator`] 完成。

use once_cell::sync::Lazy;
use regex::Regex;

static SEPARATOR_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\|?\s*:?-{3,}").expect("separator pattern must compile"));

/// 判断去掉首尾空白的行是否像表格行：以 `|` 开头且至少有两个 `|`
pub fn is_table_row(stripped: &str) -> bool {
    stripped.starts_with('|') && stripped.matches('|').count() >= 2
}

/// 对齐行（`|---|:--:|`）原样保留，不翻译也不重新排版
pub fn is_separator_row(line: &str) -> bool {
    SEPARATOR_ROW.is_match(line.trim())
}

/// 拆分后的表格行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow<'a> {
    pub leading_pipe: bool,
    pub trailing_pipe: bool,
    pub cells: Vec<&'a str>,
}

impl<'a> TableRow<'a> {
    /// 拆分一行（不含换行符）
    pub fn parse(line: &'a str) -> Self {
        Self {
            leading_pipe: line.starts_with('|'),
            trailing_pipe: line.ends_with('|'),
            cells: line.trim_matches('|').split('|').collect(),
        }
    }

    /// 用新的单元格内容拼回一行，恢复首尾的 `|`
    pub fn render<S: AsRef<str>>(&self, cells: &[S]) -> String {
        let mut out = String::new();
        if self.leading_pipe {
            out.push('|');
        }
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                out.push('|');
            }
            out.push_str(cell.as_ref());
        }
        if self.trailing_pipe {
            out.push('|');
        }
        out
    }
}

/// 单元格两侧各留一个空格
pub fn pad_cell(content: &str) -> String {
    format!(" {content} ")
}
