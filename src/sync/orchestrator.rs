use crate::collection::{Collection, CollectionBuilder};
use crate::config::SyncConfig;
use crate::logger::SharedLogger;
use crate::openapi::SpecFetcher;
use crate::postman::{PostmanClient, PublishAction, Publisher};
use crate::runner::{RunReport, RunSummary, TestRunner};
use crate::utils::SingleFlight;
use crate::{Result, SyncError};

/// 一次 `sync()` 调用的结果
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    Completed {
        collection_name: String,
        action: PublishAction,
        /// 未运行测试（关闭或已有测试在跑）时为 `None`
        tests: Option<RunSummary>,
    },
    /// 已有同步在进行，本次调用被忽略
    AlreadyRunning,
}

/// Fetch → Build → Test → Publish
pub struct SyncOrchestrator {
    config: SyncConfig,
    fetcher: SpecFetcher,
    builder: CollectionBuilder,
    runner: TestRunner,
    publisher: Option<Publisher>,
    logger: SharedLogger,
    syncing: SingleFlight,
}

impl SyncOrchestrator {
    /// 构建完整流水线；发布需要 Postman API key
    pub fn new(config: SyncConfig, logger: SharedLogger) -> Result<Self> {
        let publisher = Publisher::new(PostmanClient::from_config(&config)?, logger.clone());
        let mut orchestrator = Self::without_publisher(config, logger)?;
        orchestrator.publisher = Some(publisher);
        Ok(orchestrator)
    }

    /// 只用于构建和测试、不发布的流水线（不需要 API key）
    pub fn without_publisher(config: SyncConfig, logger: SharedLogger) -> Result<Self> {
        Ok(Self {
            fetcher: SpecFetcher::new(logger.clone())?,
            builder: CollectionBuilder::from_config(&config),
            runner: TestRunner::from_config(&config, logger.clone())?,
            publisher: None,
            config,
            logger,
            syncing: SingleFlight::new(),
        })
    }

    pub fn with_runner(mut self, runner: TestRunner) -> Self {
        self.runner = runner;
        self
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.is_busy()
    }

    /// 完整同步
    ///
    /// 任一步骤失败都会中止后续步骤。测试失败不会阻止发布。
    pub async fn sync(&self) -> Result<SyncOutcome> {
        let Some(_guard) = self.syncing.try_acquire() else {
            tracing::debug!("Sync already in progress, ignoring");
            return Ok(SyncOutcome::AlreadyRunning);
        };

        let result = self.sync_inner().await;
        if let Err(e) = &result {
            self.report_failure(e);
        }
        result
    }

    async fn sync_inner(&self) -> Result<SyncOutcome> {
        let publisher = self.publisher.as_ref().ok_or_else(|| {
            SyncError::Config("Postman API key is not configured".to_string())
        })?;

        let collection = self.fetch_and_build().await?;

        let tests = if self.config.run_tests {
            self.run_tests(&collection).await.map(|report| report.summary)
        } else {
            None
        };

        let action = publisher.publish(&collection).await?;
        self.logger.info("Collection uploaded successfully 🚀");

        Ok(SyncOutcome::Completed {
            collection_name: collection.info.name,
            action,
            tests,
        })
    }

    /// 校验配置、拉取文档并构建 collection，不测试也不发布
    pub async fn build_collection(&self) -> Result<Collection> {
        let result = self.fetch_and_build().await;
        if let Err(e) = &result {
            self.report_failure(e);
        }
        result
    }

    /// 拉取、构建并执行测试，不发布
    pub async fn run_tests_only(&self) -> Result<Option<RunReport>> {
        let collection = self.build_collection().await?;
        Ok(self.run_tests(&collection).await)
    }

    async fn fetch_and_build(&self) -> Result<Collection> {
        // 任何网络请求之前先校验
        self.config.validate_base_url()?;
        let base_url = self.config.base_url();

        let spec = self
            .fetcher
            .fetch(&base_url, &self.config.swagger_path)
            .await?;
        let collection = self.builder.build(&spec);
        self.logger.info(&format!(
            "Built collection `{}` with {} requests",
            collection.info.name,
            collection.requests().len()
        ));
        Ok(collection)
    }

    async fn run_tests(&self, collection: &Collection) -> Option<RunReport> {
        self.runner
            .run_in_background(collection, &self.config.base_url())
            .await
    }

    fn report_failure(&self, err: &SyncError) {
        let base_url = self.config.base_url();
        if err.is_connection_refused() && is_local(&base_url) {
            self.logger.error(
                &format!(
                    "Connection refused: ensure the API server is running at {}",
                    base_url
                ),
                err,
            );
        } else {
            self.logger.error("Unexpected error during sync", err);
        }
    }
}

fn is_local(base_url: &str) -> bool {
    url::Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .map(|host| matches!(host.as_str(), "localhost" | "127.0.0.1" | "[::1]" | "0.0.0.0"))
        .unwrap_or(false)
}
