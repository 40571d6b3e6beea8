//! # 配置解析
//!
//! （缓存参数, 覆盖参数）→ 完整连接配置。纯函数，不读终端、不读文件。

use serde::Serialize;

use super::cache::{CachedConfig, CachedDatabaseConfig};
use super::database::{DEFAULT_DATABASE_NAME, DEFAULT_MYSQL_PORT, DatabaseConfig};
use crate::error::ConfigError;

/// 单侧数据库的覆盖参数（来自命令行或环境变量）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseOverrides {
    /// 主机
    pub host: Option<String>,
    /// 端口
    pub port: Option<u16>,
    /// 用户名
    pub user: Option<String>,
    /// 密码
    pub password: Option<String>,
    /// 数据库名
    pub database: Option<String>,
}

/// 两侧数据库的覆盖参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// 旧库
    pub old: DatabaseOverrides,
    /// 新库
    pub new: DatabaseOverrides,
}

/// 解析完成的连接配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    /// 旧库（数据来源）
    pub old: DatabaseConfig,
    /// 新库（写入目标）
    pub new: DatabaseConfig,
}

/// 合并缓存与覆盖参数
///
/// 优先级：覆盖参数 > 缓存 > 默认值。空字符串视为未提供。
/// 主机与用户名必填；密码只取覆盖参数。
pub fn resolve_config(
    cached: Option<&CachedConfig>,
    overrides: &ConfigOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    let old = resolve_database("old", cached.and_then(|c| c.old.as_ref()), &overrides.old)?;
    let new = resolve_database("new", cached.and_then(|c| c.new.as_ref()), &overrides.new)?;
    Ok(ResolvedConfig { old, new })
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn resolve_database(
    label: &str,
    cached: Option<&CachedDatabaseConfig>,
    overrides: &DatabaseOverrides,
) -> Result<DatabaseConfig, ConfigError> {
    let cached_field = |pick: fn(&CachedDatabaseConfig) -> Option<&String>| {
        non_empty(cached.and_then(pick))
    };

    let host = non_empty(overrides.host.as_ref())
        .or_else(|| cached_field(|c| c.host.as_ref()))
        .ok_or_else(|| ConfigError::missing(format!("{label}.host")))?;

    let port = match overrides.port {
        Some(0) => {
            return Err(ConfigError::invalid(
                format!("{label}.port"),
                "端口必须在 1-65535 之间",
            ));
        }
        Some(port) => port,
        None => cached
            .and_then(|c| c.port)
            .filter(|port| *port != 0)
            .unwrap_or(DEFAULT_MYSQL_PORT),
    };

    let user = non_empty(overrides.user.as_ref())
        .or_else(|| cached_field(|c| c.user.as_ref()))
        .ok_or_else(|| ConfigError::missing(format!("{label}.user")))?;

    let database = non_empty(overrides.database.as_ref())
        .or_else(|| cached_field(|c| c.database.as_ref()))
        .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());

    let password = overrides.password.clone().unwrap_or_default();

    Ok(DatabaseConfig::new(host, port, user, password, database))
}
