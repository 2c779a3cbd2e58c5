use serde_json::{Map, Value};

use crate::http::Method;
use crate::{Result, SyncError};

/// 从 OpenAPI 文档中提取出的、构建 collection 所需的全部信息
///
/// 只在获取文档时校验一次，之后整个流水线都使用这个类型。
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSpec {
    pub title: Option<String>,
    pub description: Option<String>,
    /// 按文档中出现的顺序保存
    pub paths: Vec<PathEntry>,
}

/// `paths` 中的一项：URL 模板以及它下面的所有操作
#[derive(Debug, Clone, PartialEq)]
pub struct PathEntry {
    pub path: String,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub method: Method,
    pub summary: Option<String>,
}

impl ApiSpec {
    /// 解析 OpenAPI JSON 文本
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| SyncError::SpecFormat(format!("document is not valid JSON: {}", e)))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        let root = value
            .as_object()
            .ok_or_else(|| SyncError::SpecFormat("document root is not an object".to_string()))?;

        let info = root.get("info").and_then(Value::as_object);
        let title = info.and_then(|i| non_empty_str(i, "title"));
        let description = info.and_then(|i| non_empty_str(i, "description"));

        let paths = match root.get("paths") {
            Some(Value::Object(paths)) => paths,
            Some(_) => {
                return Err(SyncError::SpecFormat(
                    "`paths` is not an object".to_string(),
                ));
            }
            None => return Err(SyncError::SpecFormat("missing `paths`".to_string())),
        };

        let paths = paths
            .iter()
            .map(|(path, item)| PathEntry::parse(path, item))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            title,
            description,
            paths,
        })
    }

    /// 所有操作的数量
    pub fn operation_count(&self) -> usize {
        self.paths.iter().map(|p| p.operations.len()).sum()
    }
}

impl PathEntry {
    fn parse(path: &str, item: &Value) -> Result<Self> {
        let methods = item.as_object().ok_or_else(|| {
            SyncError::SpecFormat(format!("path `{}` has no method map", path))
        })?;

        let mut operations = Vec::with_capacity(methods.len());
        for (key, details) in methods {
            // parameters / servers / summary / $ref / x-* 等不是操作
            let Ok(method) = Method::parse(key) else {
                continue;
            };

            let details = details.as_object().ok_or_else(|| {
                SyncError::SpecFormat(format!(
                    "operation `{} {}` is not an object",
                    method, path
                ))
            })?;

            operations.push(Operation {
                method,
                summary: non_empty_str(details, "summary"),
            });
        }

        Ok(Self {
            path: path.to_string(),
            operations,
        })
    }

    /// 按 `/` 切分并丢弃空段
    pub fn segments(&self) -> Vec<String> {
        split_path(&self.path)
    }
}

pub fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty_str(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_document_order() {
        let text = r#"{
            "info": {"title": "Pets", "description": "Pet store"},
            "paths": {
                "/zebra": {"post": {}, "get": {"summary": "List zebras"}},
                "/apple": {"delete": {}}
            }
        }"#;

        let spec = ApiSpec::from_json(text).unwrap();
        assert_eq!(spec.title.as_deref(), Some("Pets"));
        assert_eq!(spec.description.as_deref(), Some("Pet store"));
        assert_eq!(spec.paths[0].path, "/zebra");
        assert_eq!(spec.paths[1].path, "/apple");
        assert_eq!(spec.paths[0].operations[0].method, Method::Post);
        assert_eq!(spec.paths[0].operations[1].method, Method::Get);
        assert_eq!(
            spec.paths[0].operations[1].summary.as_deref(),
            Some("List zebras")
        );
        assert_eq!(spec.operation_count(), 3);
    }

    #[test]
    fn test_skips_non_method_keys() {
        let text = r#"{"paths": {"/users/{id}": {
            "parameters": [{"name": "id", "in": "path"}],
            "summary": "User",
            "get": {}
        }}}"#;

        let spec = ApiSpec::from_json(text).unwrap();
        assert_eq!(spec.paths[0].operations.len(), 1);
        assert!(spec.title.is_none());
    }

    #[test]
    fn test_missing_paths_is_format_error() {
        let err = ApiSpec::from_json(r#"{"info": {"title": "x"}}"#).unwrap_err();
        assert!(matches!(err, SyncError::SpecFormat(_)));
    }

    #[test]
    fn test_non_object_path_item_is_format_error() {
        let err = ApiSpec::from_json(r#"{"paths": {"/a": null}}"#).unwrap_err();
        assert!(matches!(err, SyncError::SpecFormat(_)));

        let err = ApiSpec::from_json(r#"{"paths": {"/a": {"get": "oops"}}}"#).unwrap_err();
        assert!(matches!(err, SyncError::SpecFormat(_)));

        let err = ApiSpec::from_json(r#"{"paths": []}"#).unwrap_err();
        assert!(matches!(err, SyncError::SpecFormat(_)));
    }

    #[test]
    fn test_invalid_json_is_format_error() {
        let err = ApiSpec::from_json("<html>").unwrap_err();
        assert!(matches!(err, SyncError::SpecFormat(_)));
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/users/{id}/"), vec!["users", "{id}"]);
        assert!(split_path("/").is_empty());
        assert_eq!(split_path("api//v1"), vec!["api", "v1"]);
    }
}
