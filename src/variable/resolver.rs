use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::variable::types::VariableContext;

/// 占位符替换：`{{name}}` 取 collection 变量，`${NAME}` 取系统环境变量
///
/// 找不到值的占位符保持原样。
pub struct VariableResolver;

impl VariableResolver {
    pub fn substitute(text: &str, context: &VariableContext) -> String {
        static VAR_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = VAR_REGEX.get_or_init(|| {
            Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_]*)\}\}").expect("valid variable regex")
        });

        replace_with(re, text, |name| context.get(name).map(str::to_string))
    }

    pub fn resolve_env_vars(text: &str) -> String {
        static ENV_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = ENV_REGEX
            .get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid env regex"));

        replace_with(re, text, |name| std::env::var(name).ok())
    }
}

fn replace_with(re: &Regex, text: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    re.replace_all(text, |caps: &Captures| {
        lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}
