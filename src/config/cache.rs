//! # 配置缓存
//!
//! 保存上一次使用的连接参数，便于下次运行直接复用。结构中没有密码字段，
//! 因此密码在类型层面就不可能被写入文件。

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{DatabaseConfig, ResolvedConfig};
use crate::error::{Context, Result};

/// 单侧数据库的缓存参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CachedDatabaseConfig {
    /// 主机
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// 端口
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// 用户名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// 数据库名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
}

impl From<&DatabaseConfig> for CachedDatabaseConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            host: Some(config.host.clone()),
            port: Some(config.port),
            user: Some(config.user.clone()),
            database: Some(config.database.clone()),
        }
    }
}

/// 缓存文件内容：`[old]` 旧库、`[new]` 新库
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CachedConfig {
    /// 旧库
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old: Option<CachedDatabaseConfig>,
    /// 新库
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new: Option<CachedDatabaseConfig>,
}

impl From<&ResolvedConfig> for CachedConfig {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            old: Some((&config.old).into()),
            new: Some((&config.new).into()),
        }
    }
}

/// 读取缓存文件；文件不存在时返回 `Ok(None)`
pub fn load_cached_config(path: impl AsRef<Path>) -> Result<Option<CachedConfig>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("读取配置缓存失败: {}", path.display()))?;
    let cached: CachedConfig = toml::from_str(&content)
        .with_context(|| format!("解析配置缓存失败: {}", path.display()))?;
    Ok(Some(cached))
}

/// 写入缓存文件（不含密码）
pub fn save_cached_config(path: impl AsRef<Path>, config: &CachedConfig) -> Result<()> {
    let path = path.as_ref();
    let content = toml::to_string_pretty(config)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {}", parent.display()))?;
        }
    }

    std::fs::write(path, content)
        .with_context(|| format!("写入配置缓存失败: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_cached_config(dir.path().join("absent.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load_without_password() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("migrate_db_config.toml");

        let resolved = ResolvedConfig {
            old: DatabaseConfig::new("old-host", 3306, "root", "old-secret", "marzban"),
            new: DatabaseConfig::new("new-host", 3307, "admin", "new-secret", "panel"),
        };
        save_cached_config(&path, &CachedConfig::from(&resolved)).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("secret"));
        assert!(!raw.contains("password"));

        let loaded = load_cached_config(&path).unwrap().unwrap();
        assert_eq!(loaded.old.unwrap().host.as_deref(), Some("old-host"));
        assert_eq!(loaded.new.unwrap().port, Some(3307));
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[old]\nhost = \"10.0.0.5\"\n").unwrap();

        let loaded = load_cached_config(&path).unwrap().unwrap();
        let old = loaded.old.unwrap();
        assert_eq!(old.host.as_deref(), Some("10.0.0.5"));
        assert_eq!(old.port, None);
        assert!(loaded.new.is_none());
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[old\nhost = ").unwrap();

        let err = load_cached_config(&path).unwrap_err();
        assert_eq!(err.kind(), "CONFIG_ERROR");
    }
}
