use serde::{Deserialize, Serialize};

use crate::http::Method;

/// Postman Collection v2.1.0 schema
pub const SCHEMA_V2_1_0: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

pub const BASE_URL_VARIABLE: &str = "baseUrl";
pub const TOKEN_VARIABLE: &str = "token";

/// 完整的 Postman collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub info: Info,
    #[serde(default)]
    pub variable: Vec<Variable>,
    #[serde(default)]
    pub item: Vec<CollectionNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(rename = "_postman_id")]
    pub postman_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub schema: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub key: String,
    pub value: String,
    #[serde(rename = "type", default = "Variable::default_type")]
    pub kind: String,
}

impl Variable {
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind: Self::default_type(),
        }
    }

    fn default_type() -> String {
        "string".to_string()
    }
}

/// collection 树中的节点：要么是文件夹，要么是请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CollectionNode {
    Folder(Folder),
    Request(RequestItem),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    pub item: Vec<CollectionNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestItem {
    pub name: String,
    pub request: RequestSpec,
    /// 保存的示例响应，生成时总是为空
    #[serde(default)]
    pub response: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestSpec {
    pub method: Method,
    #[serde(default)]
    pub header: Vec<Header>,
    pub url: RequestUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestUrl {
    pub raw: String,
    #[serde(default)]
    pub host: Vec<String>,
    #[serde(default)]
    pub path: Vec<String>,
}

impl CollectionNode {
    pub fn name(&self) -> &str {
        match self {
            CollectionNode::Folder(folder) => &folder.name,
            CollectionNode::Request(item) => &item.name,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            CollectionNode::Folder(folder) => Some(folder),
            CollectionNode::Request(_) => None,
        }
    }

    pub fn as_request(&self) -> Option<&RequestItem> {
        match self {
            CollectionNode::Request(item) => Some(item),
            CollectionNode::Folder(_) => None,
        }
    }

    fn is_folder_named(&self, name: &str) -> bool {
        matches!(self, CollectionNode::Folder(folder) if folder.name == name)
    }
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            item: Vec::new(),
        }
    }
}

/// 在 `level` 中查找同名文件夹，不存在则追加一个，返回其子节点列表
pub(crate) fn folder_children<'a>(
    level: &'a mut Vec<CollectionNode>,
    name: &str,
) -> &'a mut Vec<CollectionNode> {
    let index = level
        .iter()
        .position(|node| node.is_folder_named(name))
        .unwrap_or_else(|| {
            level.push(CollectionNode::Folder(Folder::new(name)));
            level.len() - 1
        });

    match &mut level[index] {
        CollectionNode::Folder(folder) => &mut folder.item,
        CollectionNode::Request(_) => unreachable!("index always points at a folder"),
    }
}

impl Collection {
    /// 深度优先、先序遍历所有请求节点
    pub fn requests(&self) -> Vec<&RequestItem> {
        fn walk<'a>(nodes: &'a [CollectionNode], out: &mut Vec<&'a RequestItem>) {
            for node in nodes {
                match node {
                    CollectionNode::Folder(folder) => walk(&folder.item, out),
                    CollectionNode::Request(item) => out.push(item),
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.item, &mut out);
        out
    }

    pub fn variable(&self, key: &str) -> Option<&str> {
        self.variable
            .iter()
            .find(|v| v.key == key)
            .map(|v| v.value.as_str())
    }
}
