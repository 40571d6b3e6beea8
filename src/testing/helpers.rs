//! # 测试辅助函数
//!
//! 内存 SQLite 库，表结构直接由实体生成

use entity::{LegacyProxies, LegacyUsers, Users};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema};
use std::sync::Once;
use tracing::Level;

static INIT: Once = Once::new();

/// 初始化测试环境
pub fn init_test_env() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    db.execute(backend.build(&schema.create_table_from_entity(entity)))
        .await?;
    Ok(())
}

/// 旧库：`users` + `proxies`
pub async fn create_legacy_db() -> Result<DatabaseConnection, DbErr> {
    init_test_env();
    let db = Database::connect("sqlite::memory:").await?;
    create_table(&db, LegacyUsers).await?;
    create_table(&db, LegacyProxies).await?;
    Ok(db)
}

/// 新库：带 `proxy_settings` 的 `users`
pub async fn create_target_db() -> Result<DatabaseConnection, DbErr> {
    init_test_env();
    let db = Database::connect("sqlite::memory:").await?;
    create_table(&db, Users).await?;
    Ok(db)
}
