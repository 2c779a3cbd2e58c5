use std::fs;
use std::path::Path;

use crate::config::types::SyncConfig;
use crate::variable::VariableResolver;
use crate::{Result, SyncError};

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "swagger-sync.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<SyncConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        Self::parse(&content)
    }

    /// 解析配置内容，字符串中的 `${VAR}` 会用系统环境变量展开
    pub fn parse(content: &str) -> Result<SyncConfig> {
        let mut config: SyncConfig = toml::from_str(content)
            .map_err(|e| SyncError::Config(format!("Failed to parse config file: {}", e)))?;

        expand(&mut config.api_key);
        expand(&mut config.base_url);
        expand(&mut config.collection_name);
        expand(&mut config.token);
        config.postman_api_url = VariableResolver::resolve_env_vars(&config.postman_api_url);

        Ok(config)
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录
    /// 2. 父目录递归查找
    /// 3. 用户配置目录 ~/.config/swagger-sync/
    pub fn find_and_load() -> Option<SyncConfig> {
        if let Some(config) = Self::try_load_from_current_dir() {
            return Some(config);
        }

        Self::try_load_from_user_dir()
    }

    fn try_load_from_current_dir() -> Option<SyncConfig> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Self::load_logged(&config_path);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    fn try_load_from_user_dir() -> Option<SyncConfig> {
        let home = dirs::home_dir()?;
        let config_path = home
            .join(".config")
            .join("swagger-sync")
            .join(Self::CONFIG_FILE);

        if config_path.exists() {
            Self::load_logged(&config_path)
        } else {
            None
        }
    }

    fn load_logged(path: &Path) -> Option<SyncConfig> {
        match Self::load_from_path(path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "Loaded config file");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                None
            }
        }
    }

    /// 用环境变量覆盖配置
    ///
    /// - `SWAGGER_SYNC_API_KEY`（或 `POSTMAN_API_KEY`）
    /// - `SWAGGER_SYNC_BASE_URL`
    /// - `SWAGGER_SYNC_TOKEN`
    pub fn apply_env(config: &mut SyncConfig) {
        Self::apply_vars(config, |name| std::env::var(name).ok());
    }

    fn apply_vars(config: &mut SyncConfig, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("SWAGGER_SYNC_API_KEY").or_else(|| lookup("POSTMAN_API_KEY")) {
            config.api_key = Some(key);
        }
        if let Some(url) = lookup("SWAGGER_SYNC_BASE_URL") {
            config.base_url = Some(url);
        }
        if let Some(token) = lookup("SWAGGER_SYNC_TOKEN") {
            config.token = Some(token);
        }
    }
}

fn expand(value: &mut Option<String>) {
    if let Some(v) = value.as_mut() {
        *v = VariableResolver::resolve_env_vars(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_path() {
        let config_content = r#"
api_key = "PMAK-test"
base_url = "http://localhost:8080"
collection_name = "Orders"
ignore_bearer_token_paths = ["/auth/login", "/health"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = ConfigLoader::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("PMAK-test"));
        assert_eq!(config.base_url(), "http://localhost:8080");
        assert_eq!(config.collection_name.as_deref(), Some("Orders"));
        assert_eq!(config.ignore_bearer_token_paths.len(), 2);
        assert_eq!(config.swagger_path, "swagger");
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConfigLoader::load_from_path("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = ConfigLoader::parse("run_tests = \"maybe\"").unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[test]
    fn test_parse_expands_env_vars() {
        unsafe {
            std::env::set_var("SWAGGER_SYNC_TEST_KEY", "from-env");
        }

        let config = ConfigLoader::parse(r#"api_key = "${SWAGGER_SYNC_TEST_KEY}""#).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-env"));

        unsafe {
            std::env::remove_var("SWAGGER_SYNC_TEST_KEY");
        }
    }

    #[test]
    fn test_apply_vars_overrides() {
        let vars: HashMap<&str, &str> = [
            ("POSTMAN_API_KEY", "fallback-key"),
            ("SWAGGER_SYNC_BASE_URL", "https://staging.example.com"),
        ]
        .into_iter()
        .collect();

        let mut config = SyncConfig::default();
        ConfigLoader::apply_vars(&mut config, |name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.api_key.as_deref(), Some("fallback-key"));
        assert_eq!(config.base_url(), "https://staging.example.com");
        assert!(config.token.is_none());
    }
}
