//! 翻译后端
//!
//! [`TranslateBackend`] 是外部翻译服务的唯一接口：`translate(text, 语言对) -> text`。
//! [`DeepLXBackend`] 通过 HTTP 调用 DeepLX 兼容的接口。

use crate::error::{Result, TranslationError};
use crate::types::{DeepLXRequest, DeepLXResponse, DpTransRequest, LanguagePair, TranslationConfig};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

/// 外部翻译服务
#[async_trait]
pub trait TranslateBackend: Send + Sync {
    /// 翻译一段文本，失败时返回错误，由调用方决定是否重试
    async fn translate(&self, text: &str, pair: &LanguagePair) -> Result<String>;
}

/// DeepLX 翻译后端
///
/// 地址中包含 `dptrans` 时使用 dptrans 的请求格式。
#[derive(Clone)]
pub struct DeepLXBackend {
    /// HTTP客户端，用于API调用
    client: Client,
    api_url: String,
}

impl DeepLXBackend {
    /// 创建新的 DeepLX 后端，整个请求的超时由 `timeout_secs` 决定
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(5)
            .tcp_keepalive(Duration::from_secs(60))
            .user_agent("Mozilla/5.0 (compatible; PostVariantTranslator/1.0)")
            .build()?;

        Ok(Self {
            client,
            api_url: config.deeplx_api_url.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn uses_dptrans(&self) -> bool {
        self.api_url.contains("dptrans")
    }
}

#[async_trait]
impl TranslateBackend for DeepLXBackend {
    async fn translate(&self, text: &str, pair: &LanguagePair) -> Result<String> {
        debug!("发送翻译请求到: {} ({} 字符)", self.api_url, text.chars().count());

        let response = if self.uses_dptrans() {
            let request = DpTransRequest {
                text: text.to_string(),
                source_lang: pair.source.clone(),
                target_lang: pair.target.clone(),
            };

            self.client
                .post(&self.api_url)
                .header("Content-Type", "application/json")
                .header("Accept", "application/json, text/plain, */*")
                .header("User-Agent", "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
                .json(&request)
                .send()
                .await
                .map_err(|e| TranslationError::Custom(format!("DeepLX网络请求失败: {}", e)))?
        } else {
            let request = DeepLXRequest {
                text: text.to_string(),
                source_lang: pair.source.clone(),
                target_lang: pair.target.clone(),
            };

            self.client
                .post(&self.api_url)
                .header("Content-Type", "application/json")
                .header("Accept", "application/json")
                .json(&request)
                .send()
                .await
                .map_err(|e| TranslationError::Custom(format!("DeepLX网络请求失败: {}", e)))?
        };

        let status = response.status();
        debug!("DeepLX响应状态: {}", status);

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "无法读取错误信息".to_string());
            return Err(TranslationError::ApiError {
                code: i32::from(status.as_u16()),
                message: format!("DeepLX API请求失败: {} - {}", status, error_text),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TranslationError::Custom(format!("读取响应文本失败: {}", e)))?;
        parse_response_body(&body)
    }
}

/// 从成功响应的正文中取出译文
///
/// 依次尝试：标准 DeepLX `{code, data}`、常见字段名的 JSON、纯文本。
pub fn parse_response_body(body: &str) -> Result<String> {
    if let Ok(result) = serde_json::from_str::<DeepLXResponse>(body) {
        if result.code != 200 {
            return Err(TranslationError::ApiError {
                code: result.code,
                message: format!("DeepLX翻译失败，返回代码: {}", result.code),
            });
        }
        if result.data.is_empty() {
            return Err(TranslationError::Custom("DeepLX返回了空的翻译结果".to_string()));
        }
        return Ok(result.data);
    }

    if body.trim().is_empty() {
        return Err(TranslationError::Custom("API返回了空的翻译结果".to_string()));
    }

    if body.starts_with('{') {
        let json_value = serde_json::from_str::<serde_json::Value>(body)
            .map_err(|_| TranslationError::ParseError(format!("无法解析JSON响应: {}", body)))?;
        return json_value
            .get("translated_text")
            .or_else(|| json_value.get("result"))
            .or_else(|| json_value.get("translation"))
            .or_else(|| json_value.get("data"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                TranslationError::ParseError(format!("无法从JSON响应中提取翻译结果: {}", body))
            });
    }

    debug!("假设响应是纯文本翻译结果");
    Ok(body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_deeplx_payload() {
        let body = r#"{"code":200,"data":"Bonjour le monde"}"#;
        assert_eq!(parse_response_body(body).unwrap(), "Bonjour le monde");
    }

    #[test]
    fn deeplx_error_code_is_an_error() {
        let body = r#"{"code":429,"data":""}"#;
        let err = parse_response_body(body).unwrap_err();
        assert!(matches!(err, TranslationError::ApiError { code: 429, .. }));
    }

    #[test]
    fn empty_deeplx_data_is_an_error() {
        let body = r#"{"code":200,"data":""}"#;
        assert!(parse_response_body(body).is_err());
    }

    #[test]
    fn falls_back_to_known_json_fields() {
        let body = r#"{"translated_text":"Привет"}"#;
        assert_eq!(parse_response_body(body).unwrap(), "Привет");
        let body = r#"{"result":"Hola","other":1}"#;
        assert_eq!(parse_response_body(body).unwrap(), "Hola");
    }

    #[test]
    fn unknown_json_is_a_parse_error() {
        let err = parse_response_body(r#"{"unexpected":true}"#).unwrap_err();
        assert!(matches!(err, TranslationError::ParseError(_)));
        let err = parse_response_body("{not json").unwrap_err();
        assert!(matches!(err, TranslationError::ParseError(_)));
    }

    #[test]
    fn plain_text_body_is_the_translation() {
        assert_eq!(parse_response_body("Hallo Welt").unwrap(), "Hallo Welt");
        assert!(parse_response_body("   ").is_err());
    }

    #[test]
    fn dptrans_endpoints_are_detected() {
        let config = TranslationConfig {
            deeplx_api_url: "https://example.com/dptrans/translate".to_string(),
            ..TranslationConfig::default()
        };
        let backend = DeepLXBackend::new(&config).unwrap();
        assert!(backend.uses_dptrans());
        assert_eq!(backend.api_url(), "https://example.com/dptrans/translate");

        let backend = DeepLXBackend::new(&TranslationConfig::default()).unwrap();
        assert!(!backend.uses_dptrans());
    }
}
