use std::time::Duration;

use crate::logger::SharedLogger;
use crate::openapi::types::ApiSpec;
use crate::{Result, SyncError};

/// 从运行中的服务拉取 OpenAPI 文档
pub struct SpecFetcher {
    client: reqwest::Client,
    logger: SharedLogger,
}

impl SpecFetcher {
    pub fn new(logger: SharedLogger) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()?,
            logger,
        })
    }

    /// `{base_url}/{swagger_path}-json`
    pub fn spec_url(base_url: &str, swagger_path: &str) -> String {
        format!(
            "{}/{}-json",
            base_url.trim_end_matches('/'),
            swagger_path.trim_matches('/')
        )
    }

    pub async fn fetch(&self, base_url: &str, swagger_path: &str) -> Result<ApiSpec> {
        let url = Self::spec_url(base_url, swagger_path);
        self.logger.info(&format!("Fetching Swagger documentation from {}", url));

        let fetch_err = |source: reqwest::Error| SyncError::Fetch {
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_err)?;
        let text = response.text().await.map_err(fetch_err)?;

        let spec = ApiSpec::from_json(&text)?;
        tracing::debug!(
            paths = spec.paths.len(),
            operations = spec.operation_count(),
            "OpenAPI document parsed"
        );
        Ok(spec)
    }
}
