use reqwest::header::{HeaderMap as Headers, HeaderName, HeaderValue};

use crate::Result;
use crate::http::types::Method;

/// 一次已经解析好 URL 的出站请求（测试请求不带 body）
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
        }
    }

    fn insert_header(&mut self, key: &str, value: &str) -> Result<()> {
        let header_name: HeaderName = key.parse()?;
        let header_value: HeaderValue = value.parse()?;
        self.headers.append(header_name, header_value);
        Ok(())
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self> {
        self.insert_header(key, value)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_header() {
        let request = Request::new(Method::Get, "http://localhost/a")
            .with_header("Accept", "application/json")
            .unwrap()
            .with_header("Authorization", "Bearer abc")
            .unwrap();

        assert_eq!(request.headers.get("accept").unwrap(), "application/json");
        assert_eq!(request.headers.get("authorization").unwrap(), "Bearer abc");
    }

    #[test]
    fn test_invalid_header_name_is_error() {
        let result = Request::new(Method::Get, "http://localhost").with_header("bad header", "x");
        assert!(result.is_err());
    }
}
