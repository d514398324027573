//! 文档头部元数据（YAML front matter）
//!
//! 负责拆分 `---` 包裹的元数据块与正文，以及把元数据重新序列化回文档。

use crate::error::{Result, TranslationError};
use serde_yml::value::TaggedValue;
use serde_yml::{Mapping, Value};

/// 元数据分隔符
pub const DELIMITER: &str = "---";

const OPENING: &str = "---\n";
const CLOSING: &str = "\n---\n";

/// 拆分元数据与正文
///
/// 文档不以 `---` 行开头，或找不到结束的 `---` 行时，整个文档都视为正文，
/// 返回空的元数据。元数据不是 YAML 映射时返回错误。
pub fn split_front_matter(text: &str) -> Result<(Mapping, &str)> {
    let Some(rest) = text.strip_prefix(OPENING) else {
        return Ok((Mapping::new(), text));
    };
    let Some(end) = rest.find(CLOSING) else {
        return Ok((Mapping::new(), text));
    };

    let yaml = &rest[..end];
    let body = &rest[end + CLOSING.len()..];

    let front_matter = match serde_yml::from_str::<Value>(yaml)? {
        Value::Null => Mapping::new(),
        Value::Mapping(mapping) => mapping,
        other => {
            return Err(TranslationError::FrontMatter(format!(
                "expected a mapping, found {}",
                value_kind(&other)
            )))
        }
    };

    Ok((front_matter, body))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// 读取非空白的字符串字段
pub fn string_field<'a>(front_matter: &'a Mapping, key: &str) -> Option<&'a str> {
    front_matter
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
}

pub fn set_string_field(front_matter: &mut Mapping, key: &str, value: impl Into<String>) {
    front_matter.insert(Value::String(key.to_string()), Value::String(value.into()));
}

/// 把日期/时间类的值规范成普通字符串，递归处理列表与映射
pub fn normalize_value(value: Value) -> Value {
    match value {
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(normalize_value).collect()),
        Value::Mapping(mapping) => Value::Mapping(normalize_mapping(mapping)),
        Value::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            if is_timestamp_tag(&tag.to_string()) {
                if let Some(text) = scalar_text(&value) {
                    return Value::String(text);
                }
            }
            Value::Tagged(Box::new(TaggedValue {
                tag,
                value: normalize_value(value),
            }))
        }
        scalar => scalar,
    }
}

pub fn normalize_mapping(mapping: Mapping) -> Mapping {
    mapping
        .into_iter()
        .map(|(key, value)| (key, normalize_value(value)))
        .collect()
}

fn is_timestamp_tag(tag: &str) -> bool {
    let name = tag.trim_start_matches('!');
    name == "timestamp" || name.ends_with(":timestamp") || name == "date" || name == "datetime"
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// 组装输出文档：`---`、规范化后的 YAML、`---`、正文
pub fn render_document(front_matter: Mapping, body: &str) -> Result<String> {
    let normalized = normalize_mapping(front_matter);
    let yaml = serde_yml::to_string(&Value::Mapping(normalized))?;
    Ok(format!(
        "{DELIMITER}\n{}\n{DELIMITER}\n{body}",
        yaml.trim()
    ))
}
