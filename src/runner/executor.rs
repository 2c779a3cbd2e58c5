use crate::Result;
use crate::collection::Collection;
use crate::config::{SyncConfig, TestBackendKind};
use crate::logger::SharedLogger;
use crate::runner::backend::TestBackend;
use crate::runner::newman::NewmanBackend;
use crate::runner::reporter::TestReporter;
use crate::runner::types::RunReport;
use crate::runner::walker::HttpWalker;
use crate::utils::SingleFlight;

/// 测试执行入口：单飞保护 + 后端执行 + 结果输出
pub struct TestRunner {
    backend: Box<dyn TestBackend>,
    reporter: TestReporter,
    logger: SharedLogger,
    running: SingleFlight,
}

impl TestRunner {
    pub fn new(backend: Box<dyn TestBackend>, logger: SharedLogger) -> Self {
        Self {
            backend,
            reporter: TestReporter::default(),
            logger,
            running: SingleFlight::new(),
        }
    }

    /// 根据配置选择后端
    pub fn from_config(config: &SyncConfig, logger: SharedLogger) -> Result<Self> {
        let backend: Box<dyn TestBackend> = match config.test_backend {
            TestBackendKind::Http => {
                Box::new(HttpWalker::new(config.request_timeout(), logger.clone())?)
            }
            TestBackendKind::Newman => {
                Box::new(NewmanBackend::new(config.request_timeout(), logger.clone()))
            }
        };
        Ok(Self::new(backend, logger))
    }

    pub fn with_reporter(mut self, reporter: TestReporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn is_running(&self) -> bool {
        self.running.is_busy()
    }

    /// 执行 collection 中的所有请求
    ///
    /// 已有测试在运行时直接返回 `None`，不会排队。后端自身出错也只记录日志并返回
    /// `None`，单个请求的失败则包含在返回的报告里。
    pub async fn run_in_background(
        &self,
        collection: &Collection,
        base_url: &str,
    ) -> Option<RunReport> {
        let Some(_guard) = self.running.try_acquire() else {
            tracing::debug!("Test run already in progress, ignoring");
            return None;
        };

        self.reporter.print_header();
        self.logger.info(&format!(
            "Starting API tests ({} backend) against {}",
            self.backend.name(),
            base_url
        ));

        match self.backend.execute(collection, base_url).await {
            Ok(report) => {
                self.reporter.print_report(&report);
                self.logger.info(&format!(
                    "Tests completed: {} passed, {} failed in {:.2}s",
                    report.summary.success_count,
                    report.summary.failure_count,
                    report.summary.duration_seconds
                ));
                Some(report)
            }
            Err(e) => {
                self.logger.error("Test execution failed", &e);
                None
            }
        }
    }
}
