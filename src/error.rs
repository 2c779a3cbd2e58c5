use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("OpenAPI 文档格式错误: {0}")]
    SpecFormat(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("无法获取 OpenAPI 文档 {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Postman API 错误{}: {message}", status_suffix(.status))]
    Publish { status: Option<u16>, message: String },

    #[error("HTTP 请求失败: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("无效的请求头名称: {0}")]
    HeaderName(#[from] reqwest::header::InvalidHeaderName),

    #[error("无效的请求头值: {0}")]
    HeaderValue(#[from] reqwest::header::InvalidHeaderValue),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("URL 解析错误: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

impl SyncError {
    /// 目标服务拒绝连接（通常是本地 API 服务没有启动）
    pub fn is_connection_refused(&self) -> bool {
        match self {
            SyncError::Fetch { source, .. } => source.is_connect(),
            SyncError::HttpError(e) => e.is_connect(),
            _ => false,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|code| format!(" ({})", code)).unwrap_or_default()
}

impl From<anyhow::Error> for SyncError {
    fn from(err: anyhow::Error) -> Self {
        SyncError::Other(err.to_string())
    }
}

/// Result type for swagger-sync crate
pub type Result<T> = std::result::Result<T, SyncError>;
