use std::time::{Duration, Instant};

use crate::Result;
use crate::http::request::Request;
use crate::http::response::Response;

/// 测试请求的默认超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self {
            inner: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    /// 发送请求并读取完整响应体
    ///
    /// 任何状态码都会作为 `Ok` 返回，只有传输层错误（连接被拒绝、超时、
    /// 读取 body 失败等）才会返回 `Err`。
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let req = self
            .inner
            .request(request.method.to_reqwest(), &request.url)
            .headers(request.headers);

        let start = Instant::now();
        let response = req.send().await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        let duration = start.elapsed();

        Response::new(status, body, duration)
    }
}
