use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use swagger_sync::config::{ConfigLoader, SyncConfig, TestBackendKind};
use swagger_sync::logger::default_logger;
use swagger_sync::sync::{SyncOrchestrator, SyncOutcome};

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub overrides: Overrides,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 拉取文档、测试并发布到 Postman（默认）
    Sync,
    /// 只生成 collection JSON
    Build {
        /// 输出文件，缺省打印到 stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// 拉取文档并执行测试，不发布
    Test,
}

/// 命令行覆盖项，优先级高于配置文件和环境变量
#[derive(Args, Default)]
pub struct Overrides {
    /// 配置文件路径（缺省查找 swagger-sync.toml）
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(long, global = true)]
    pub api_key: Option<String>,

    #[arg(long, global = true)]
    pub swagger_path: Option<String>,

    #[arg(long, global = true)]
    pub collection_name: Option<String>,

    #[arg(long, global = true)]
    pub token: Option<String>,

    /// 跳过测试步骤
    #[arg(long, global = true)]
    pub no_tests: bool,

    #[arg(long, value_enum, global = true)]
    pub backend: Option<TestBackendKind>,

    /// 不附带 Authorization 头的路径（可重复）
    #[arg(long = "ignore-bearer", global = true)]
    pub ignore_bearer: Vec<String>,
}

impl Overrides {
    fn apply(&self, config: &mut SyncConfig) {
        if let Some(url) = &self.base_url {
            config.base_url = Some(url.clone());
        }
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(path) = &self.swagger_path {
            config.swagger_path = path.clone();
        }
        if let Some(name) = &self.collection_name {
            config.collection_name = Some(name.clone());
        }
        if let Some(token) = &self.token {
            config.token = Some(token.clone());
        }
        if self.no_tests {
            config.run_tests = false;
        }
        if let Some(backend) = self.backend {
            config.test_backend = backend;
        }
        if !self.ignore_bearer.is_empty() {
            config.ignore_bearer_token_paths = self.ignore_bearer.clone();
        }
    }
}

/// 配置优先级：CLI > 环境变量 > 配置文件 > 默认值
pub fn load_config(overrides: &Overrides) -> Result<SyncConfig> {
    let mut config = match &overrides.config {
        Some(path) => ConfigLoader::load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ConfigLoader::find_and_load().unwrap_or_default(),
    };
    ConfigLoader::apply_env(&mut config);
    overrides.apply(&mut config);
    Ok(config)
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.overrides)?;
    let logger = default_logger();

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => {
            let orchestrator = SyncOrchestrator::new(config, logger)?;
            match orchestrator.sync().await? {
                SyncOutcome::Completed {
                    collection_name,
                    action,
                    tests,
                } => {
                    tracing::info!(
                        collection = %collection_name,
                        uid = %action.uid(),
                        tested = tests.is_some(),
                        "Swagger documentation synced with Postman"
                    );
                }
                SyncOutcome::AlreadyRunning => tracing::warn!("Sync already in progress"),
            }
        }
        Commands::Build { output } => {
            let orchestrator = SyncOrchestrator::without_publisher(config, logger)?;
            let collection = orchestrator.build_collection().await?;
            let json = serde_json::to_string_pretty(&collection)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!(path = %path.display(), "Collection written");
                }
                None => println!("{}", json),
            }
        }
        Commands::Test => {
            let orchestrator = SyncOrchestrator::without_publisher(config, logger)?;
            if let Some(report) = orchestrator.run_tests_only().await?
                && report.summary.failure_count > 0
            {
                anyhow::bail!("{} request(s) failed", report.summary.failure_count);
            }
        }
    }

    Ok(())
}
