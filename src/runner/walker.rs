use std::sync::OnceLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;

use crate::collection::{Collection, RequestItem};
use crate::http::{Client, Request};
use crate::logger::SharedLogger;
use crate::runner::backend::TestBackend;
use crate::runner::types::{RunReport, TestResult, TestStatus};
use crate::variable::{VariableContext, VariableResolver};
use crate::{Result, SyncError};

/// 进程内执行器：按文档顺序逐个发送请求
pub struct HttpWalker {
    client: Client,
    logger: SharedLogger,
}

impl HttpWalker {
    pub fn new(timeout: Duration, logger: SharedLogger) -> Result<Self> {
        Ok(Self {
            client: Client::with_timeout(timeout)?,
            logger,
        })
    }

    /// 执行单个请求，失败只记录在结果中
    async fn execute_one(
        &self,
        item: &RequestItem,
        base_url: &str,
        context: &VariableContext,
    ) -> TestResult {
        let method = item.request.method;
        let url = build_url(base_url, &item.request.url.path);
        let name = item.name.clone();

        let start = Instant::now();

        let request = match build_request(item, &url, context) {
            Ok(req) => req,
            Err(e) => {
                return TestResult::failed(
                    name,
                    method,
                    url,
                    TestStatus::Error,
                    format!("Failed to build request: {}", e),
                    start.elapsed(),
                );
            }
        };

        match self.client.execute(request).await {
            Ok(response) => {
                let elapsed = response.duration;
                self.logger.info(&format!(
                    "{} {} -> {} ({}ms)",
                    method,
                    url,
                    response.status.code(),
                    elapsed.as_millis()
                ));
                TestResult::completed(
                    name,
                    method,
                    url,
                    response.status.code(),
                    response.size(),
                    elapsed,
                )
            }
            Err(e) => {
                let elapsed = start.elapsed();
                let status = failure_status(&e);
                self.logger
                    .error(&format!("{} {} failed ({})", method, url, status), &e);
                TestResult::failed(name, method, url, status, e.to_string(), elapsed)
            }
        }
    }
}

#[async_trait]
impl TestBackend for HttpWalker {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn execute(&self, collection: &Collection, base_url: &str) -> Result<RunReport> {
        let started_at = Utc::now();
        let start = Instant::now();
        let context = VariableContext::from_collection(collection);

        let mut results = Vec::new();
        for item in collection.requests() {
            results.push(self.execute_one(item, base_url, &context).await);
        }

        Ok(RunReport::new(results, start.elapsed(), started_at))
    }
}

fn build_request(item: &RequestItem, url: &str, context: &VariableContext) -> Result<Request> {
    let mut request = Request::new(item.request.method, url);
    for header in &item.request.header {
        if header.key.is_empty() || header.value.is_empty() {
            continue;
        }
        let value = VariableResolver::substitute(&header.value, context);
        request = request.with_header(&header.key, &value)?;
    }
    Ok(request)
}

/// 超时一律是 `Error`；超时以外的 body 读取失败视为没有响应，其余都是传输错误
fn failure_status(err: &SyncError) -> TestStatus {
    match err {
        SyncError::HttpError(e) if e.is_timeout() => TestStatus::Error,
        SyncError::HttpError(e) if e.is_body() || e.is_decode() => TestStatus::NoResponse,
        _ => TestStatus::Error,
    }
}

/// 拼接 base URL 与路径段，合并多余的 `/`（`://` 除外）
pub fn build_url(base_url: &str, segments: &[String]) -> String {
    static SLASHES: OnceLock<Regex> = OnceLock::new();
    let re = SLASHES.get_or_init(|| Regex::new(r"([^:/])/{2,}").expect("valid slash regex"));

    let joined = format!("{}/{}", base_url, segments.join("/"));
    re.replace_all(&joined, "$1/").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CollectionBuilder;
    use crate::logger::default_logger;
    use crate::openapi::ApiSpec;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// 发送响应头和不完整的 body，之后挂起或直接断开
    async fn truncated_body_server(hang: bool) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\npartial")
                .await
                .unwrap();
            socket.flush().await.unwrap();
            if hang {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        });

        format!("http://{}", addr)
    }

    async fn run_single(base_url: &str, timeout: Duration) -> TestResult {
        let spec = ApiSpec::from_json(r#"{"paths": {"/stall": {"get": {}}}}"#).unwrap();
        let collection = CollectionBuilder::new(base_url).build(&spec);
        let context = VariableContext::from_collection(&collection);
        let walker = HttpWalker::new(timeout, default_logger()).unwrap();

        walker
            .execute_one(collection.requests()[0], base_url, &context)
            .await
    }

    #[tokio::test]
    async fn test_body_timeout_is_error() {
        let base_url = truncated_body_server(true).await;
        let result = run_single(&base_url, Duration::from_millis(300)).await;

        assert!(!result.success);
        assert_eq!(result.status, TestStatus::Error);
    }

    #[tokio::test]
    async fn test_truncated_body_is_no_response() {
        let base_url = truncated_body_server(false).await;
        let result = run_single(&base_url, Duration::from_secs(5)).await;

        assert!(!result.success);
        assert_eq!(result.status, TestStatus::NoResponse);
    }

    fn segments(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_build_url() {
        assert_eq!(
            build_url("http://localhost:3000", &segments(&["api", "users"])),
            "http://localhost:3000/api/users"
        );
        assert_eq!(
            build_url("http://localhost:3000/", &segments(&["users"])),
            "http://localhost:3000/users"
        );
        assert_eq!(
            build_url("https://api.example.com/v1//", &segments(&["a", "", "b"])),
            "https://api.example.com/v1/a/b"
        );
        assert_eq!(build_url("http://localhost:3000", &[]), "http://localhost:3000/");
    }
}
