//! # 配置管理模块
//!
//! 连接参数的解析、校验与缓存：
//! - 缓存文件（TOML，不含密码）提供上一次的参数
//! - 命令行 / 环境变量覆盖缓存
//! - [`resolve_config`] 是二者合并的纯函数

mod cache;
mod database;
mod options;
mod resolve;

pub use cache::{CachedConfig, CachedDatabaseConfig, load_cached_config, save_cached_config};
pub use database::{DEFAULT_DATABASE_NAME, DEFAULT_MYSQL_PORT, DatabaseConfig};
pub use options::{DEFAULT_BATCH_SIZE, MigrationOptions};
pub use resolve::{ConfigOverrides, DatabaseOverrides, ResolvedConfig, resolve_config};

/// 默认缓存文件路径
pub const DEFAULT_CONFIG_PATH: &str = "migrate_db_config.toml";
