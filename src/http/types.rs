use std::fmt;
use std::str::FromStr;

use crate::{Result, SyncError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
}

impl FromStr for Method {
    type Err = SyncError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            "TRACE" => Ok(Method::Trace),
            _ => Err(SyncError::SpecFormat(format!(
                "Invalid HTTP method: {}",
                s
            ))),
        }
    }
}

impl Method {
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
        }
    }

    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Patch => reqwest::Method::PATCH,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Trace => reqwest::Method::TRACE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status(u16);

impl Status {
    pub fn new(code: u16) -> Result<Self> {
        if (100..600).contains(&code) {
            Ok(Self(code))
        } else {
            Err(SyncError::Other(format!(
                "Invalid HTTP status code: {}",
                code
            )))
        }
    }

    pub fn code(&self) -> u16 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.0)
    }

    pub fn is_redirect(&self) -> bool {
        (300..=399).contains(&self.0)
    }

    pub fn is_client_error(&self) -> bool {
        (400..=499).contains(&self.0)
    }

    pub fn is_server_error(&self) -> bool {
        (500..=599).contains(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method_case_insensitive() {
        assert_eq!(Method::parse("get").unwrap(), Method::Get);
        assert_eq!(Method::parse("Patch").unwrap(), Method::Patch);
        assert_eq!(Method::parse("TRACE").unwrap(), Method::Trace);
    }

    #[test]
    fn test_parse_method_rejects_unknown() {
        let err = Method::parse("parameters").unwrap_err();
        assert!(matches!(err, SyncError::SpecFormat(_)));
    }

    #[test]
    fn test_method_serializes_uppercase() {
        let json = serde_json::to_string(&Method::Delete).unwrap();
        assert_eq!(json, "\"DELETE\"");
        let method: Method = serde_json::from_str("\"OPTIONS\"").unwrap();
        assert_eq!(method, Method::Options);
    }

    #[test]
    fn test_status_classes() {
        assert!(Status::new(204).unwrap().is_success());
        assert!(Status::new(301).unwrap().is_redirect());
        assert!(Status::new(404).unwrap().is_client_error());
        assert!(Status::new(503).unwrap().is_server_error());
        assert!(Status::new(42).is_err());
    }
}
