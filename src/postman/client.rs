use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::Collection;
use crate::config::SyncConfig;
use crate::{Result, SyncError};

/// Postman 上已存在的 collection 摘要
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteCollection {
    pub name: String,
    pub uid: String,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    collections: Vec<RemoteCollection>,
}

#[derive(Deserialize)]
struct SingleResponse {
    collection: RemoteCollection,
}

#[derive(Serialize)]
struct CollectionBody<'a> {
    collection: &'a Collection,
}

/// Postman REST API 客户端
pub struct PostmanClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl PostmanClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()?,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// API key 缺失时返回配置错误
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        Self::new(config.postman_api_url.clone(), config.api_key()?)
    }

    pub async fn list_collections(&self) -> Result<Vec<RemoteCollection>> {
        let response = self
            .http
            .get(format!("{}/collections", self.api_url))
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(transport_error)?;

        let body: ListResponse = check(response).await?.json().await.map_err(transport_error)?;
        Ok(body.collections)
    }

    pub async fn create_collection(&self, collection: &Collection) -> Result<RemoteCollection> {
        let response = self
            .http
            .post(format!("{}/collections", self.api_url))
            .header("X-Api-Key", &self.api_key)
            .json(&CollectionBody { collection })
            .send()
            .await
            .map_err(transport_error)?;

        let body: SingleResponse = check(response).await?.json().await.map_err(transport_error)?;
        Ok(body.collection)
    }

    pub async fn update_collection(
        &self,
        uid: &str,
        collection: &Collection,
    ) -> Result<RemoteCollection> {
        let response = self
            .http
            .put(format!("{}/collections/{}", self.api_url, uid))
            .header("X-Api-Key", &self.api_key)
            .json(&CollectionBody { collection })
            .send()
            .await
            .map_err(transport_error)?;

        let body: SingleResponse = check(response).await?.json().await.map_err(transport_error)?;
        Ok(body.collection)
    }
}

fn transport_error(err: reqwest::Error) -> SyncError {
    SyncError::Publish {
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}

/// 非 2xx 响应转换为 `SyncError::Publish`，携带远端给出的错误信息
async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    Err(SyncError::Publish {
        status: Some(status.as_u16()),
        message: error_message(&text)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string()),
    })
}

/// Postman 的错误格式为 `{"error": {"name", "message"}}`，也兼容顶层 `message`
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
