use std::fmt::Display;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

/// 初始化日志系统
///
/// 支持通过 RUST_LOG 环境变量控制日志级别
/// 默认级别: info
///
/// 示例:
/// - RUST_LOG=debug swagger-sync
/// - RUST_LOG=swagger_sync=trace swagger-sync sync
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    tracing::debug!("Logger initialized");
}

/// 注入到各个组件的日志接口
///
/// 组件只依赖这个 trait，不直接依赖全局日志状态，测试时可以替换成记录型实现。
pub trait SyncLogger: Send + Sync {
    fn info(&self, message: &str);

    fn error(&self, message: &str, err: &dyn Display);
}

/// 默认实现：转发到 `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl SyncLogger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!(target: "swagger_sync", "{}", message);
    }

    fn error(&self, message: &str, err: &dyn Display) {
        tracing::error!(target: "swagger_sync", error = %err, "{}", message);
    }
}

pub type SharedLogger = Arc<dyn SyncLogger>;

/// 默认的共享 logger
pub fn default_logger() -> SharedLogger {
    Arc::new(TracingLogger)
}
