//! # 数据仓储模块
//!
//! 迁移流水线只通过 [`RecordRepository`] 访问数据库

mod database;

pub use database::DatabaseRepository;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{LegacyUserRecord, MigratedUserRecord};

/// 用户记录仓储
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// 一次性读取全部旧版用户及其 VLESS 代理配置
    ///
    /// 没有代理配置的用户同样返回，`legacy_proxy_settings` 为 `None`。
    async fn fetch_all_users_with_proxy_settings(&self) -> Result<Vec<LegacyUserRecord>>;

    /// 在单个事务内写入全部新版记录，任意一行失败则整体回滚
    async fn bulk_insert(&self, records: &[MigratedUserRecord]) -> Result<u64>;

    /// 关闭连接
    async fn close(&self) -> Result<()>;
}
