use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::http::Method;

/// 单个请求的状态：HTTP 状态码，或者没有拿到响应
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    Code(u16),
    /// 请求已发出但没有得到完整响应
    NoResponse,
    /// 传输层错误：连接被拒绝、超时、DNS 失败等
    Error,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Code(code) => write!(f, "{}", code),
            TestStatus::NoResponse => f.write_str("No Response"),
            TestStatus::Error => f.write_str("Error"),
        }
    }
}

/// 单个请求的执行结果
#[derive(Debug, Clone)]
pub struct TestResult {
    /// collection 中的请求名称
    pub name: String,

    pub method: Method,

    /// 实际请求的绝对 URL
    pub url: String,

    pub status: TestStatus,

    /// 从发出请求到结束（成功或失败）的耗时；外部执行器未报告耗时的失败为 `None`
    pub response_time: Option<Duration>,

    /// 响应体字节数，失败时为 0
    pub bytes_received: u64,

    /// 拿到任意状态码的响应即为成功
    pub success: bool,

    /// 错误消息（如果失败）
    pub error: Option<String>,
}

impl TestResult {
    pub fn completed(
        name: String,
        method: Method,
        url: String,
        status: u16,
        bytes_received: u64,
        response_time: Duration,
    ) -> Self {
        Self {
            name,
            method,
            url,
            status: TestStatus::Code(status),
            response_time: Some(response_time),
            bytes_received,
            success: true,
            error: None,
        }
    }

    pub fn failed(
        name: String,
        method: Method,
        url: String,
        status: TestStatus,
        error: String,
        response_time: Duration,
    ) -> Self {
        Self {
            name,
            method,
            url,
            status,
            response_time: Some(response_time),
            bytes_received: 0,
            success: false,
            error: Some(error),
        }
    }

    /// 没有耗时数据的失败，不参与响应时间统计
    pub fn unmeasured(
        name: String,
        method: Method,
        url: String,
        status: TestStatus,
        error: String,
    ) -> Self {
        Self {
            response_time: None,
            ..Self::failed(name, method, url, status, error, Duration::ZERO)
        }
    }

    pub fn response_time_ms(&self) -> Option<f64> {
        self.response_time.map(|d| d.as_secs_f64() * 1000.0)
    }
}

/// 一次测试执行的汇总统计
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub total_requests: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub total_bytes_received: u64,
    pub avg_response_time_ms: f64,
    pub min_response_time_ms: f64,
    pub max_response_time_ms: f64,
    /// 总体标准差
    pub std_dev_response_time_ms: f64,
    pub duration_seconds: f64,
    pub started_at: DateTime<Utc>,
}

impl RunSummary {
    /// 统计覆盖所有发出过的请求，包括失败的请求（没有耗时数据的除外）
    pub fn from_results(
        results: &[TestResult],
        duration: Duration,
        started_at: DateTime<Utc>,
    ) -> Self {
        let success_count = results.iter().filter(|r| r.success).count();
        let total_bytes_received = results.iter().map(|r| r.bytes_received).sum();
        let times: Vec<f64> = results.iter().filter_map(TestResult::response_time_ms).collect();

        let (avg, min, max, std_dev) = if times.is_empty() {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let count = times.len() as f64;
            let avg = times.iter().sum::<f64>() / count;
            let min = times.iter().copied().fold(f64::INFINITY, f64::min);
            let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let variance = times.iter().map(|t| (t - avg).powi(2)).sum::<f64>() / count;
            (avg, min, max, variance.sqrt())
        };

        Self {
            total_requests: results.len(),
            success_count,
            failure_count: results.len() - success_count,
            total_bytes_received,
            avg_response_time_ms: avg,
            min_response_time_ms: min,
            max_response_time_ms: max,
            std_dev_response_time_ms: std_dev,
            duration_seconds: duration.as_secs_f64(),
            started_at,
        }
    }
}

/// 测试执行的完整输出：按执行顺序排列的结果以及汇总
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: RunSummary,
    pub results: Vec<TestResult>,
}

impl RunReport {
    pub fn new(results: Vec<TestResult>, duration: Duration, started_at: DateTime<Utc>) -> Self {
        Self {
            summary: RunSummary::from_results(&results, duration, started_at),
            results,
        }
    }
}
