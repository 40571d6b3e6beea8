//! # 命令行接口
//!
//! 解析参数 → 读取缓存 → 合并配置 → 连接两侧数据库 → 运行流水线 → 输出报告

use clap::{Args, Parser, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::{
    ConfigOverrides, DEFAULT_BATCH_SIZE, DEFAULT_CONFIG_PATH, DatabaseOverrides, MigrationOptions,
    ResolvedConfig, load_cached_config, resolve_config, save_cached_config,
};
use crate::error::{MigrateError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::pipeline::MigrationPipeline;
use crate::report::{MigrationFailure, MigrationOutcome};
use crate::repository::{DatabaseRepository, RecordRepository};
use crate::types::SourceTimezone;
use crate::{linfo, lwarn};

/// 成功或旧库为空
pub const EXIT_SUCCESS: i32 = 0;
/// 任意错误
pub const EXIT_FAILURE: i32 = 1;
/// 被 Ctrl-C 中断
pub const EXIT_CANCELLED: i32 = 130;

/// 报告输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// 人类可读文本
    #[default]
    Text,
    /// JSON
    Json,
}

/// 旧库连接参数
#[derive(Args, Debug, Clone, Default)]
pub struct OldDatabaseArgs {
    /// 旧库主机
    #[arg(id = "old_host", long = "old-host", env = "MIGRATE_OLD_HOST")]
    pub host: Option<String>,
    /// 旧库端口
    #[arg(id = "old_port", long = "old-port", env = "MIGRATE_OLD_PORT")]
    pub port: Option<u16>,
    /// 旧库用户名
    #[arg(id = "old_user", long = "old-user", env = "MIGRATE_OLD_USER")]
    pub user: Option<String>,
    /// 旧库密码（不会写入缓存）
    #[arg(
        id = "old_password",
        long = "old-password",
        env = "MIGRATE_OLD_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,
    /// 旧库数据库名
    #[arg(
        id = "old_database",
        long = "old-database",
        env = "MIGRATE_OLD_DATABASE"
    )]
    pub database: Option<String>,
}

/// 新库连接参数
#[derive(Args, Debug, Clone, Default)]
pub struct NewDatabaseArgs {
    /// 新库主机
    #[arg(id = "new_host", long = "new-host", env = "MIGRATE_NEW_HOST")]
    pub host: Option<String>,
    /// 新库端口
    #[arg(id = "new_port", long = "new-port", env = "MIGRATE_NEW_PORT")]
    pub port: Option<u16>,
    /// 新库用户名
    #[arg(id = "new_user", long = "new-user", env = "MIGRATE_NEW_USER")]
    pub user: Option<String>,
    /// 新库密码（不会写入缓存）
    #[arg(
        id = "new_password",
        long = "new-password",
        env = "MIGRATE_NEW_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,
    /// 新库数据库名
    #[arg(
        id = "new_database",
        long = "new-database",
        env = "MIGRATE_NEW_DATABASE"
    )]
    pub database: Option<String>,
}

/// Marzban 用户迁移工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "marzban-migrate",
    version,
    about = "Migrate Marzban users into the proxy_settings schema"
)]
pub struct Cli {
    /// 连接参数缓存文件
    #[arg(long, env = "MIGRATE_CONFIG_PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// 不保存连接参数缓存
    #[arg(long)]
    pub no_save_config: bool,

    /// 旧库连接参数
    #[command(flatten)]
    pub old: OldDatabaseArgs,

    /// 新库连接参数
    #[command(flatten)]
    pub new: NewDatabaseArgs,

    /// 旧库时间所在时区：utc | europe/moscow
    #[arg(long, env = "MIGRATE_SOURCE_TIMEZONE", default_value = "utc")]
    pub source_timezone: SourceTimezone,

    /// 迁移用户到期时间
    #[arg(long, env = "MIGRATE_TRANSFER_EXPIRE")]
    pub transfer_expire: bool,

    /// 每条 INSERT 语句的行数
    #[arg(long, env = "MIGRATE_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// 报告输出格式
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// 日志级别（RUST_LOG 优先）
    #[arg(long, env = "MIGRATE_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// 命令行 / 环境变量给出的连接参数
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            old: DatabaseOverrides {
                host: self.old.host.clone(),
                port: self.old.port,
                user: self.old.user.clone(),
                password: self.old.password.clone(),
                database: self.old.database.clone(),
            },
            new: DatabaseOverrides {
                host: self.new.host.clone(),
                port: self.new.port,
                user: self.new.user.clone(),
                password: self.new.password.clone(),
                database: self.new.database.clone(),
            },
        }
    }

    /// 本次运行的迁移选项
    #[must_use]
    pub fn options(&self) -> MigrationOptions {
        MigrationOptions::new(self.transfer_expire, self.source_timezone)
            .with_batch_size(self.batch_size)
    }
}

/// 读取缓存并合并命令行参数；缓存读写失败只记录警告
pub fn load_resolved_config(cli: &Cli) -> Result<ResolvedConfig> {
    let cached = match load_cached_config(&cli.config) {
        Ok(cached) => cached,
        Err(e) => {
            lwarn!(
                "system",
                LogStage::Config,
                LogComponent::Config,
                "load_cache",
                "配置缓存不可用，已忽略",
                path = cli.config.display().to_string(),
                error = e.chain_message()
            );
            None
        }
    };

    let resolved = resolve_config(cached.as_ref(), &cli.overrides())?;
    linfo!(
        "system",
        LogStage::Config,
        LogComponent::Config,
        "resolve",
        "连接参数已确定",
        old = resolved.old.describe(),
        new = resolved.new.describe()
    );

    if !cli.no_save_config {
        persist_cache(&cli.config, &resolved);
    }
    Ok(resolved)
}

fn persist_cache(path: &Path, resolved: &ResolvedConfig) {
    if let Err(e) = save_cached_config(path, &resolved.into()) {
        lwarn!(
            "system",
            LogStage::Config,
            LogComponent::Config,
            "save_cache",
            "保存配置缓存失败",
            path = path.display().to_string(),
            error = e.chain_message()
        );
    }
}

/// 连接旧库并执行迁移
///
/// 新库在旧库读出数据后才连接；旧库为空时不会访问新库。
/// 无论迁移是否成功都会关闭连接。
pub async fn migrate(
    resolved: &ResolvedConfig,
    pipeline: &MigrationPipeline,
) -> Result<MigrationOutcome> {
    let run_id = pipeline.run_id();
    let batch_size = pipeline.options().batch_size;
    let source = DatabaseRepository::connect(&resolved.old).await?;
    linfo!(run_id, LogStage::Connect, LogComponent::Database, "connect_source", "旧库已连接");

    let outcome = pipeline
        .run_with_destination(&source, || async move {
            let destination = DatabaseRepository::connect(&resolved.new).await?;
            Ok::<_, MigrateError>(destination.with_batch_size(batch_size))
        })
        .await;

    if let Err(e) = source.close().await {
        lwarn!(
            run_id,
            LogStage::Shutdown,
            LogComponent::Database,
            "close",
            "关闭旧库连接失败",
            error = e.chain_message()
        );
    }
    outcome
}

/// 执行一次完整的命令行运行，返回退出码
pub async fn execute(cli: Cli) -> i32 {
    let pipeline = MigrationPipeline::new(cli.options());

    let result = tokio::select! {
        result = run_cli(&cli, &pipeline) => result,
        () = wait_for_ctrl_c() => {
            Err(MigrateError::cancelled("收到 Ctrl-C，未提交的写入已回滚"))
        }
    };

    match result {
        Ok(outcome) => {
            print_outcome(&outcome, cli.output);
            EXIT_SUCCESS
        }
        Err(err) => {
            print_failure(&err, cli.output);
            exit_code(&err)
        }
    }
}

/// 等待 Ctrl-C；无法注册信号时永不返回
async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        lwarn!(
            "system",
            LogStage::Shutdown,
            LogComponent::Main,
            "ctrl_c_error",
            "无法监听 Ctrl-C",
            error = e.to_string()
        );
        std::future::pending::<()>().await;
    }
}

async fn run_cli(cli: &Cli, pipeline: &MigrationPipeline) -> Result<MigrationOutcome> {
    pipeline.options().validate()?;
    let resolved = load_resolved_config(cli)?;
    migrate(&resolved, pipeline).await
}

/// 错误对应的退出码
#[must_use]
pub fn exit_code(err: &MigrateError) -> i32 {
    match err.root() {
        MigrateError::Cancelled { .. } => EXIT_CANCELLED,
        _ => EXIT_FAILURE,
    }
}

fn print_outcome(outcome: &MigrationOutcome, format: OutputFormat) {
    match format {
        OutputFormat::Text => println!("{outcome}"),
        OutputFormat::Json => match outcome.to_json() {
            Ok(json) => println!("{json}"),
            Err(_) => println!("{outcome}"),
        },
    }
}

fn print_failure(err: &MigrateError, format: OutputFormat) {
    let failure = MigrationFailure::from(err);
    match format {
        OutputFormat::Text => eprintln!("{failure}"),
        OutputFormat::Json => match failure.to_json() {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("{failure}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "marzban-migrate",
            "--old-host",
            "10.0.0.1",
            "--old-user",
            "root",
            "--old-password",
            "secret",
            "--new-host",
            "10.0.0.2",
            "--new-port",
            "3307",
            "--new-user",
            "panel",
            "--source-timezone",
            "europe/moscow",
            "--transfer-expire",
            "--batch-size",
            "100",
            "--output",
            "json",
            "--no-save-config",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.old.host.as_deref(), Some("10.0.0.1"));
        assert_eq!(overrides.old.password.as_deref(), Some("secret"));
        assert_eq!(overrides.new.port, Some(3307));

        let options = cli.options();
        assert_eq!(options.source_timezone, SourceTimezone::EuropeMoscow);
        assert!(options.transfer_expire);
        assert_eq!(options.batch_size, 100);
        assert_eq!(cli.output, OutputFormat::Json);
        assert!(cli.no_save_config);
    }

    #[test]
    fn test_rejects_unknown_timezone() {
        let result = Cli::try_parse_from(["marzban-migrate", "--source-timezone", "Asia/Tokyo"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&MigrateError::cancelled("x")), EXIT_CANCELLED);
        assert_eq!(exit_code(&MigrateError::source_query("x")), EXIT_FAILURE);
    }

    #[test]
    fn test_resolves_and_saves_cache_without_password() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.toml");
        let cli = Cli::try_parse_from([
            "marzban-migrate",
            "--config",
            path.to_str().unwrap(),
            "--old-host",
            "old.local",
            "--old-user",
            "root",
            "--old-password",
            "hunter2",
            "--new-host",
            "new.local",
            "--new-user",
            "panel",
        ])
        .unwrap();

        let resolved = load_resolved_config(&cli).unwrap();
        assert_eq!(resolved.old.password, "hunter2");

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("old.local"));
        assert!(!saved.contains("hunter2"));
    }

    #[test]
    fn test_missing_host_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "marzban-migrate",
            "--config",
            dir.path().join("none.toml").to_str().unwrap(),
            "--no-save-config",
        ])
        .unwrap();

        let err = load_resolved_config(&cli).unwrap_err();
        assert_eq!(err.kind(), "CONFIG_ERROR");
    }

    #[tokio::test]
    async fn test_execute_config_error_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "marzban-migrate",
            "--config",
            dir.path().join("none.toml").to_str().unwrap(),
            "--no-save-config",
            "--output",
            "json",
        ])
        .unwrap();

        assert_eq!(execute(cli).await, EXIT_FAILURE);
    }

    #[tokio::test]
    async fn test_execute_rejects_zero_batch_size_before_connecting() {
        let cli = Cli::try_parse_from([
            "marzban-migrate",
            "--old-host",
            "127.0.0.1",
            "--old-user",
            "root",
            "--new-host",
            "127.0.0.1",
            "--new-user",
            "root",
            "--batch-size",
            "0",
            "--no-save-config",
        ])
        .unwrap();

        assert_eq!(execute(cli).await, EXIT_FAILURE);
    }
}
