use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{Result, SyncError};

pub const DEFAULT_SWAGGER_PATH: &str = "swagger";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_POSTMAN_API_URL: &str = "https://api.getpostman.com";

/// 执行测试的后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TestBackendKind {
    /// 进程内逐个发送 HTTP 请求
    #[default]
    Http,
    /// 调用外部 newman 命令
    Newman,
}

/// 同步配置
///
/// 字段同时接受 snake_case 和 camelCase 写法。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Postman API key
    #[serde(alias = "apiKey")]
    pub api_key: Option<String>,

    /// 文档路径，实际请求 `{base_url}/{swagger_path}-json`
    #[serde(alias = "swaggerPath")]
    pub swagger_path: String,

    /// 被测 API 的根地址，缺省为 `http://localhost:{port}`
    #[serde(alias = "baseUrl")]
    pub base_url: Option<String>,

    pub port: u16,

    /// 覆盖 collection 名称，缺省使用文档标题
    #[serde(alias = "collectionName")]
    pub collection_name: Option<String>,

    #[serde(alias = "runTests", alias = "run_test", alias = "runTest")]
    pub run_tests: bool,

    #[serde(
        alias = "ignoreBearerTokenPaths",
        alias = "ignorePathWithBearerToken",
        alias = "ignoreVariablesPathWithBearerToken"
    )]
    pub ignore_bearer_token_paths: Vec<String>,

    /// 写入 collection `token` 变量的值
    pub token: Option<String>,

    #[serde(alias = "requestTimeoutMs")]
    pub request_timeout_ms: u64,

    #[serde(alias = "postmanApiUrl")]
    pub postman_api_url: String,

    #[serde(alias = "testBackend")]
    pub test_backend: TestBackendKind,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            swagger_path: DEFAULT_SWAGGER_PATH.to_string(),
            base_url: None,
            port: DEFAULT_PORT,
            collection_name: None,
            run_tests: true,
            ignore_bearer_token_paths: Vec::new(),
            token: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            postman_api_url: DEFAULT_POSTMAN_API_URL.to_string(),
            test_backend: TestBackendKind::Http,
        }
    }
}

impl SyncConfig {
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => format!("http://localhost:{}", self.port),
        }
    }

    /// 在发起任何网络请求之前校验 base URL
    pub fn validate_base_url(&self) -> Result<url::Url> {
        validate_base_url(&self.base_url())
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SyncError::Config("Postman API key is not configured".to_string()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// base URL 必须是带非空 host 的绝对 http(s) 地址
pub fn validate_base_url(raw: &str) -> Result<url::Url> {
    let url = url::Url::parse(raw)
        .map_err(|e| SyncError::Config(format!("invalid base URL `{}`: {}", raw, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(SyncError::Config(format!(
            "invalid base URL `{}`: unsupported scheme `{}`",
            raw,
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(SyncError::Config(format!(
            "invalid base URL `{}`: missing host",
            raw
        ))),
    }
}
