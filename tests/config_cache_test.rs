//! 配置缓存集成测试

use marzban_migrate::config::{
    CachedConfig, ConfigOverrides, DatabaseOverrides, load_cached_config, resolve_config,
    save_cached_config,
};
use pretty_assertions::assert_eq;

fn overrides(password: &str) -> ConfigOverrides {
    ConfigOverrides {
        old: DatabaseOverrides {
            host: Some("legacy.db".to_string()),
            user: Some("marzban".to_string()),
            password: Some(password.to_string()),
            ..Default::default()
        },
        new: DatabaseOverrides {
            host: Some("panel.db".to_string()),
            port: Some(3307),
            user: Some("panel".to_string()),
            password: Some(password.to_string()),
            database: Some("panel".to_string()),
        },
    }
}

#[test]
fn cache_round_trip_never_stores_password() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("migrate_db_config.toml");

    let resolved = resolve_config(None, &overrides("s3cr3t!")).unwrap();
    save_cached_config(&path, &CachedConfig::from(&resolved)).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("s3cr3t!"));
    assert!(!raw.contains("password"));

    let cached = load_cached_config(&path).unwrap().unwrap();
    let again = resolve_config(Some(&cached), &ConfigOverrides::default()).unwrap();
    assert_eq!(again.old.host, "legacy.db");
    assert_eq!(again.old.port, 3306);
    assert_eq!(again.new.port, 3307);
    assert_eq!(again.new.database, "panel");
    assert_eq!(again.new.password, "");
}

#[test]
fn overrides_beat_cached_values() {
    let cached: CachedConfig = toml::from_str(
        r#"
        [old]
        host = "cached-old"
        user = "cached-user"

        [new]
        host = "cached-new"
        user = "cached-user"
        "#,
    )
    .unwrap();

    let resolved = resolve_config(Some(&cached), &overrides("")).unwrap();
    assert_eq!(resolved.old.host, "legacy.db");
    assert_eq!(resolved.new.host, "panel.db");
}

#[test]
fn corrupt_cache_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[old\nhost = ").unwrap();

    let err = load_cached_config(&path).unwrap_err();
    assert_eq!(err.kind(), "CONFIG_ERROR");
}
