use async_trait::async_trait;

use crate::Result;
use crate::collection::Collection;
use crate::runner::types::RunReport;

/// 执行 collection 中所有请求并产出 `RunReport` 的后端
#[async_trait]
pub trait TestBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self, collection: &Collection, base_url: &str) -> Result<RunReport>;
}
