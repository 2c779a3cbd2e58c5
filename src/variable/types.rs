use std::collections::HashMap;

use crate::collection::Collection;

/// 变量上下文，存储所有可用变量
#[derive(Debug, Clone, Default)]
pub struct VariableContext {
    variables: HashMap<String, String>,
}

impl VariableContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用 collection 自带的变量（baseUrl、token）构建上下文
    pub fn from_collection(collection: &Collection) -> Self {
        let mut context = Self::new();
        for variable in &collection.variable {
            context.insert(variable.key.clone(), variable.value.clone());
        }
        context
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::CollectionBuilder;
    use crate::openapi::ApiSpec;

    #[test]
    fn test_variable_context_basic() {
        let mut ctx = VariableContext::new();
        assert!(ctx.is_empty());

        ctx.insert("key", "value");
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.get("key"), Some("value"));
        assert_eq!(ctx.get("missing"), None);
    }

    #[test]
    fn test_from_collection() {
        let spec = ApiSpec::from_json(r#"{"paths": {}}"#).unwrap();
        let collection = CollectionBuilder::new("http://localhost:3000")
            .with_token("secret")
            .build(&spec);

        let ctx = VariableContext::from_collection(&collection);
        assert_eq!(ctx.get("baseUrl"), Some("http://localhost:3000"));
        assert_eq!(ctx.get("token"), Some("secret"));
    }
}
