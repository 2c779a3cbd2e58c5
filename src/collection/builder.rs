use uuid::Uuid;

use crate::collection::types::{
    BASE_URL_VARIABLE, Collection, CollectionNode, Header, Info, RequestItem, RequestSpec,
    RequestUrl, SCHEMA_V2_1_0, TOKEN_VARIABLE, Variable, folder_children,
};
use crate::config::SyncConfig;
use crate::openapi::{ApiSpec, Operation, PathEntry};

const DEFAULT_COLLECTION_NAME: &str = "API Collection";
const BASE_URL_PLACEHOLDER: &str = "{{baseUrl}}";
const BEARER_TOKEN_VALUE: &str = "Bearer {{token}}";

/// 把 OpenAPI 的 `paths` 转换成按路径段嵌套的 collection 树
#[derive(Debug, Clone, Default)]
pub struct CollectionBuilder {
    collection_name: Option<String>,
    base_url: String,
    token: String,
    ignore_bearer_paths: Vec<String>,
}

impl CollectionBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            collection_name: config.collection_name.clone(),
            base_url: config.base_url(),
            token: config.token.clone().unwrap_or_default(),
            ignore_bearer_paths: config.ignore_bearer_token_paths.clone(),
        }
    }

    pub fn with_collection_name(mut self, name: impl Into<String>) -> Self {
        self.collection_name = Some(name.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn with_ignore_bearer_paths(mut self, paths: Vec<String>) -> Self {
        self.ignore_bearer_paths = paths;
        self
    }

    /// 生成完整的 collection（包含 info 和变量）
    pub fn build(&self, spec: &ApiSpec) -> Collection {
        let name = self
            .collection_name
            .clone()
            .or_else(|| spec.title.clone())
            .unwrap_or_else(|| DEFAULT_COLLECTION_NAME.to_string());

        Collection {
            info: Info {
                postman_id: Uuid::new_v4().to_string(),
                name,
                description: spec.description.clone().unwrap_or_default(),
                schema: SCHEMA_V2_1_0.to_string(),
            },
            variable: vec![
                Variable::string(BASE_URL_VARIABLE, self.base_url.clone()),
                Variable::string(TOKEN_VARIABLE, self.token.clone()),
            ],
            item: self.build_items(spec),
        }
    }

    /// 只生成根层级的节点列表
    pub fn build_items(&self, spec: &ApiSpec) -> Vec<CollectionNode> {
        let mut root = Vec::new();

        for entry in &spec.paths {
            let segments = entry.segments();

            let mut level = &mut root;
            for segment in &segments {
                level = folder_children(level, segment);
            }

            let leaf_label = segments.last().map(String::as_str).unwrap_or("/");
            for operation in &entry.operations {
                level.push(CollectionNode::Request(self.build_request(
                    entry,
                    operation,
                    leaf_label,
                    &segments,
                )));
            }
        }

        root
    }

    fn build_request(
        &self,
        entry: &PathEntry,
        operation: &Operation,
        leaf_label: &str,
        segments: &[String],
    ) -> RequestItem {
        let name = operation
            .summary
            .clone()
            .unwrap_or_else(|| format!("{} {}", leaf_label, operation.method));

        RequestItem {
            name,
            request: RequestSpec {
                method: operation.method,
                header: self.headers_for(&entry.path),
                url: RequestUrl {
                    raw: format!("{}{}", BASE_URL_PLACEHOLDER, entry.path),
                    host: vec![BASE_URL_PLACEHOLDER.to_string()],
                    path: segments.to_vec(),
                },
            },
            response: Vec::new(),
        }
    }

    fn headers_for(&self, path: &str) -> Vec<Header> {
        let mut headers = vec![Header::new("Accept", "application/json")];
        if self.attaches_bearer(path) {
            headers.push(Header::new("Authorization", BEARER_TOKEN_VALUE));
        }
        headers
    }

    /// 忽略列表只有在多于一项时才生效；空列表或单项列表对所有路径都附带 token
    fn attaches_bearer(&self, path: &str) -> bool {
        if self.ignore_bearer_paths.len() <= 1 {
            return true;
        }
        !self.ignore_bearer_paths.iter().any(|p| p == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use std::collections::BTreeSet;

    fn spec(text: &str) -> ApiSpec {
        ApiSpec::from_json(text).unwrap()
    }

    fn header_keys(item: &RequestItem) -> Vec<&str> {
        item.request.header.iter().map(|h| h.key.as_str()).collect()
    }

    #[test]
    fn test_shared_prefix_single_folder() {
        let spec = spec(
            r#"{"paths": {
                "/a/b": {"get": {}},
                "/a/c": {"post": {"summary": "Create C"}}
            }}"#,
        );
        let items = CollectionBuilder::new("http://localhost:3000").build_items(&spec);

        assert_eq!(items.len(), 1);
        let a = items[0].as_folder().unwrap();
        assert_eq!(a.name, "a");
        assert_eq!(a.item.len(), 2);

        let b = a.item[0].as_folder().unwrap();
        assert_eq!(b.name, "b");
        assert_eq!(b.item[0].name(), "b GET");

        let c = a.item[1].as_folder().unwrap();
        assert_eq!(c.name, "c");
        let leaf = c.item[0].as_request().unwrap();
        assert_eq!(leaf.name, "Create C");
        assert_eq!(leaf.request.method, Method::Post);
    }

    #[test]
    fn test_parent_and_child_paths_share_folder() {
        let spec = spec(
            r#"{"paths": {
                "/users/{id}": {"get": {}},
                "/users": {"get": {}, "post": {}}
            }}"#,
        );
        let items = CollectionBuilder::new("http://x").build_items(&spec);

        assert_eq!(items.len(), 1);
        let users = items[0].as_folder().unwrap();
        assert_eq!(users.item.len(), 3);
        assert!(users.item[0].as_folder().is_some());
        assert_eq!(users.item[1].name(), "users GET");
        assert_eq!(users.item[2].name(), "users POST");
    }

    #[test]
    fn test_leaf_count_and_round_trip() {
        let text = r#"{"paths": {
            "/pets": {"get": {}, "post": {}},
            "/pets/{petId}": {"get": {}, "put": {}, "delete": {}},
            "/store/inventory": {"get": {"summary": "Inventory"}},
            "/": {"get": {}}
        }}"#;
        let spec = spec(text);
        let collection = CollectionBuilder::new("http://x").build(&spec);

        let requests = collection.requests();
        assert_eq!(requests.len(), spec.operation_count());

        let built: BTreeSet<(String, String)> = requests
            .iter()
            .map(|r| (r.request.method.to_string(), r.request.url.raw.clone()))
            .collect();
        let expected: BTreeSet<(String, String)> = spec
            .paths
            .iter()
            .flat_map(|p| {
                p.operations
                    .iter()
                    .map(|op| (op.method.to_string(), format!("{{{{baseUrl}}}}{}", p.path)))
            })
            .collect();
        assert_eq!(built, expected);
    }

    #[test]
    fn test_root_path_leaf_at_root_level() {
        let spec = spec(r#"{"paths": {"/": {"get": {}}}}"#);
        let items = CollectionBuilder::new("http://x").build_items(&spec);

        let leaf = items[0].as_request().unwrap();
        assert_eq!(leaf.name, "/ GET");
        assert_eq!(leaf.request.url.raw, "{{baseUrl}}/");
        assert!(leaf.request.url.path.is_empty());
    }

    #[test]
    fn test_url_fields() {
        let spec = spec(r#"{"paths": {"/api/users/{id}": {"patch": {}}}}"#);
        let collection = CollectionBuilder::new("http://x").build(&spec);
        let leaf = collection.requests()[0];

        assert_eq!(leaf.request.url.raw, "{{baseUrl}}/api/users/{id}");
        assert_eq!(leaf.request.url.host, vec!["{{baseUrl}}"]);
        assert_eq!(leaf.request.url.path, vec!["api", "users", "{id}"]);
    }

    #[test]
    fn test_bearer_on_every_path_when_ignore_list_empty() {
        let spec = spec(r#"{"paths": {"/auth/login": {"post": {}}, "/me": {"get": {}}}}"#);
        let collection = CollectionBuilder::new("http://x").build(&spec);

        for leaf in collection.requests() {
            assert_eq!(header_keys(leaf), vec!["Accept", "Authorization"]);
            assert_eq!(leaf.request.header[1].value, "Bearer {{token}}");
        }
    }

    #[test]
    fn test_single_entry_ignore_list_still_attaches_bearer() {
        let spec = spec(r#"{"paths": {"/auth/login": {"post": {}}, "/me": {"get": {}}}}"#);
        let collection = CollectionBuilder::new("http://x")
            .with_ignore_bearer_paths(vec!["/auth/login".to_string()])
            .build(&spec);

        for leaf in collection.requests() {
            assert_eq!(header_keys(leaf), vec!["Accept", "Authorization"]);
        }
    }

    #[test]
    fn test_multi_entry_ignore_list_strips_exact_paths() {
        let spec = spec(
            r#"{"paths": {
                "/auth/login": {"post": {}},
                "/auth/register": {"post": {}},
                "/me": {"get": {}}
            }}"#,
        );
        let collection = CollectionBuilder::new("http://x")
            .with_ignore_bearer_paths(vec![
                "/auth/login".to_string(),
                "/auth/register".to_string(),
            ])
            .build(&spec);

        let requests = collection.requests();
        assert_eq!(header_keys(requests[0]), vec!["Accept"]);
        assert_eq!(header_keys(requests[1]), vec!["Accept"]);
        assert_eq!(header_keys(requests[2]), vec!["Accept", "Authorization"]);
    }

    #[test]
    fn test_collection_info_and_variables() {
        let spec = spec(
            r#"{"info": {"title": "Shop", "description": "Shop API"}, "paths": {}}"#,
        );

        let collection = CollectionBuilder::new("http://localhost:3000")
            .with_token("t0k3n")
            .build(&spec);
        assert_eq!(collection.info.name, "Shop");
        assert_eq!(collection.info.description, "Shop API");
        assert_eq!(collection.info.schema, SCHEMA_V2_1_0);
        assert!(Uuid::parse_str(&collection.info.postman_id).is_ok());
        assert_eq!(collection.variable("baseUrl"), Some("http://localhost:3000"));
        assert_eq!(collection.variable("token"), Some("t0k3n"));

        let renamed = CollectionBuilder::new("http://x")
            .with_collection_name("Custom")
            .build(&spec);
        assert_eq!(renamed.info.name, "Custom");

        let untitled = CollectionBuilder::new("http://x").build(&self::spec(r#"{"paths": {}}"#));
        assert_eq!(untitled.info.name, "API Collection");
        assert_eq!(untitled.info.description, "");
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let text = r#"{"paths": {"/b/x": {"get": {}}, "/a": {"get": {}}, "/b/y": {"put": {}}}}"#;
        let builder = CollectionBuilder::new("http://x");
        assert_eq!(
            builder.build_items(&spec(text)),
            builder.build_items(&spec(text))
        );
        let items = builder.build_items(&spec(text));
        let names: Vec<&str> = items.iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
