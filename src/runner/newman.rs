use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tokio::process::Command;

use crate::collection::types::BASE_URL_VARIABLE;
use crate::collection::{Collection, Variable};
use crate::http::Method;
use crate::logger::SharedLogger;
use crate::runner::backend::TestBackend;
use crate::runner::types::{RunReport, TestResult, TestStatus};
use crate::{Result, SyncError};

/// 通过外部 `newman` 命令执行 collection
///
/// collection 写到临时文件，newman 的 JSON reporter 输出再映射回 `RunReport`。
pub struct NewmanBackend {
    program: String,
    timeout: Duration,
    logger: SharedLogger,
}

impl NewmanBackend {
    pub fn new(timeout: Duration, logger: SharedLogger) -> Self {
        Self {
            program: "newman".to_string(),
            timeout,
            logger,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    async fn run_newman(
        &self,
        collection_path: &Path,
        report_path: &Path,
        base_url: &str,
    ) -> Result<()> {
        let status = Command::new(&self.program)
            .arg("run")
            .arg(collection_path)
            .arg("--env-var")
            .arg(format!("{}={}", BASE_URL_VARIABLE, base_url))
            .arg("--timeout-request")
            .arg(self.timeout.as_millis().to_string())
            .args(["--reporters", "cli,json", "--reporter-json-export"])
            .arg(report_path)
            .status()
            .await
            .map_err(|e| SyncError::Other(format!("failed to launch `{}`: {}", self.program, e)))?;

        // 有请求失败时 newman 以非零状态退出，只要报告存在就继续
        if !status.success() {
            tracing::debug!(code = ?status.code(), "newman exited with failures");
        }
        Ok(())
    }
}

#[async_trait]
impl TestBackend for NewmanBackend {
    fn name(&self) -> &'static str {
        "newman"
    }

    async fn execute(&self, collection: &Collection, base_url: &str) -> Result<RunReport> {
        let mut collection = collection.clone();
        set_variable(&mut collection.variable, BASE_URL_VARIABLE, base_url);

        // 临时目录在 drop 时连同 collection 和报告一起删除
        let workdir = tempfile::Builder::new().prefix("swagger-sync-").tempdir()?;
        let collection_path = workdir.path().join("collection.postman_collection.json");
        let report_path = workdir.path().join("newman-report.json");

        tokio::fs::write(&collection_path, serde_json::to_vec_pretty(&collection)?).await?;
        self.logger
            .info(&format!("Running newman on {}", collection_path.display()));

        let started_at = Utc::now();
        let start = Instant::now();
        self.run_newman(&collection_path, &report_path, base_url).await?;
        let duration = start.elapsed();

        let report = tokio::fs::read_to_string(&report_path)
            .await
            .map_err(|e| SyncError::Other(format!("newman did not produce a report: {}", e)))?;

        parse_report(&report, duration, started_at)
    }
}

fn set_variable(variables: &mut Vec<Variable>, key: &str, value: &str) {
    match variables.iter_mut().find(|v| v.key == key) {
        Some(variable) => variable.value = value.to_string(),
        None => variables.push(Variable::string(key, value)),
    }
}

#[derive(Deserialize)]
struct NewmanReport {
    run: NewmanRun,
}

#[derive(Deserialize)]
struct NewmanRun {
    #[serde(default)]
    executions: Vec<Execution>,
}

#[derive(Deserialize)]
struct Execution {
    item: ExecutionItem,
    request: Option<ExecutionRequest>,
    response: Option<ExecutionResponse>,
    #[serde(rename = "requestError")]
    request_error: Option<Value>,
}

#[derive(Deserialize)]
struct ExecutionItem {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct ExecutionRequest {
    method: String,
    url: Value,
}

#[derive(Deserialize)]
struct ExecutionResponse {
    code: u16,
    #[serde(rename = "responseTime", default)]
    response_time: u64,
    #[serde(rename = "responseSize", default)]
    response_size: u64,
}

/// 把 newman JSON reporter 的输出映射为 `RunReport`
pub fn parse_report(text: &str, duration: Duration, started_at: DateTime<Utc>) -> Result<RunReport> {
    let report: NewmanReport = serde_json::from_str(text)?;

    let results = report
        .run
        .executions
        .into_iter()
        .map(|execution| {
            let (method, url) = match &execution.request {
                Some(req) => (
                    Method::parse(&req.method).unwrap_or(Method::Get),
                    url_to_string(&req.url),
                ),
                None => (Method::Get, String::new()),
            };
            let name = execution.item.name;

            match (execution.response, execution.request_error) {
                (Some(resp), _) => TestResult::completed(
                    name,
                    method,
                    url,
                    resp.code,
                    resp.response_size,
                    Duration::from_millis(resp.response_time),
                ),
                // newman 不报告失败请求的耗时
                (None, Some(err)) => TestResult::unmeasured(
                    name,
                    method,
                    url,
                    TestStatus::Error,
                    error_message(&err),
                ),
                (None, None) => TestResult::unmeasured(
                    name,
                    method,
                    url,
                    TestStatus::NoResponse,
                    "no response received".to_string(),
                ),
            }
        })
        .collect();

    Ok(RunReport::new(results, duration, started_at))
}

fn error_message(err: &Value) -> String {
    err.get("message")
        .and_then(Value::as_str)
        .or_else(|| err.get("code").and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string())
}

/// newman 的 url 可能是字符串，也可能是 `{protocol, host, port, path}` 对象
fn url_to_string(url: &Value) -> String {
    if let Some(raw) = url.as_str() {
        return raw.to_string();
    }

    let join = |key: &str, sep: &str| -> String {
        match url.get(key) {
            Some(Value::Array(parts)) => parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(sep),
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        }
    };

    let mut out = String::new();
    if let Some(protocol) = url.get("protocol").and_then(Value::as_str) {
        out.push_str(protocol);
        out.push_str("://");
    }
    out.push_str(&join("host", "."));
    if let Some(port) = url.get("port").and_then(Value::as_str) {
        out.push(':');
        out.push_str(port);
    }
    out.push('/');
    out.push_str(&join("path", "/"));
    out
}
