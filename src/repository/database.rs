//! # 基于 Sea-ORM 的仓储实现
//!
//! 旧库：`users` LEFT JOIN `proxies`；新库：`users`（含 `proxy_settings`）

use async_trait::async_trait;
use entity::{legacy_proxies, legacy_users, users};
use sea_orm::{
    ActiveValue::NotSet, ConnectOptions, Database, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryOrder, Set, TransactionTrait,
};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::RecordRepository;
use crate::config::{DEFAULT_BATCH_SIZE, DatabaseConfig};
use crate::destination_error;
use crate::error::{MigrateError, Result};
use crate::types::{LegacyUserRecord, MigratedUserRecord, RawTimestamp};

/// 数据库仓储
#[derive(Debug, Clone)]
pub struct DatabaseRepository {
    db: DatabaseConnection,
    batch_size: usize,
}

impl DatabaseRepository {
    /// 按连接配置建立 MySQL 连接池
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!("正在连接数据库: {}", config.describe());

        let mut options = ConnectOptions::new(config.connection_url());
        options
            .max_connections(config.max_connections)
            .connect_timeout(config.connect_timeout())
            .sqlx_logging(false);

        let db = Database::connect(options).await.map_err(|e| {
            MigrateError::connection_with_source(
                format!("无法连接数据库 {}", config.describe()),
                e,
            )
        })?;

        info!("数据库连接成功: {}", config.describe());
        Ok(Self::from_connection(db))
    }

    /// 直接按连接串建立连接（如 `sqlite::memory:`）
    pub async fn connect_url(database_url: &str) -> Result<Self> {
        let db = Database::connect(database_url).await.map_err(|e| {
            MigrateError::connection_with_source(format!("无法连接数据库 {database_url}"), e)
        })?;
        Ok(Self::from_connection(db))
    }

    /// 复用已有连接
    #[must_use]
    pub const fn from_connection(db: DatabaseConnection) -> Self {
        Self {
            db,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// 设置每条 INSERT 语句的行数
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    async fn insert_chunks(
        &self,
        txn: &DatabaseTransaction,
        models: Vec<users::ActiveModel>,
    ) -> Result<u64> {
        let mut inserted = 0_u64;
        for (index, chunk) in models.chunks(self.batch_size).enumerate() {
            users::Entity::insert_many(chunk.to_vec())
                .exec(txn)
                .await
                .map_err(|e| {
                    MigrateError::destination_write_with_source(
                        format!("第 {} 批写入失败（{} 行）", index + 1, chunk.len()),
                        e,
                    )
                })?;
            inserted += chunk.len() as u64;
            debug!("已写入 {} 行", inserted);
        }
        Ok(inserted)
    }
}

#[async_trait]
impl RecordRepository for DatabaseRepository {
    async fn fetch_all_users_with_proxy_settings(&self) -> Result<Vec<LegacyUserRecord>> {
        let rows = legacy_users::Entity::find()
            .find_also_related(legacy_proxies::Entity)
            .order_by_asc(legacy_users::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| MigrateError::source_query_with_source("读取旧版用户失败", e))?;

        debug!("旧库返回 {} 行（用户 × 代理）", rows.len());
        Ok(collect_legacy_records(rows))
    }

    async fn bulk_insert(&self, records: &[MigratedUserRecord]) -> Result<u64> {
        if self.batch_size == 0 {
            return Err(destination_error!("batch_size 必须大于0"));
        }
        if records.is_empty() {
            return Ok(0);
        }

        let models = records
            .iter()
            .map(to_active_model)
            .collect::<Result<Vec<_>>>()?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| MigrateError::destination_write_with_source("无法开启事务", e))?;

        match self.insert_chunks(&txn, models).await {
            Ok(inserted) => {
                txn.commit()
                    .await
                    .map_err(|e| MigrateError::destination_write_with_source("事务提交失败", e))?;
                info!("事务提交成功，共写入 {} 行", inserted);
                Ok(inserted)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!("事务回滚失败: {}", rollback_err);
                }
                Err(err)
            }
        }
    }

    async fn close(&self) -> Result<()> {
        self.db
            .clone()
            .close()
            .await
            .map_err(|e| MigrateError::connection_with_source("关闭数据库连接失败", e))
    }
}

/// 将 JOIN 结果按用户聚合
///
/// 一个用户可能有多行代理配置，只保留第一条 VLESS 配置；保持用户 id 顺序。
fn collect_legacy_records(
    rows: Vec<(legacy_users::Model, Option<legacy_proxies::Model>)>,
) -> Vec<LegacyUserRecord> {
    let mut order: Vec<(legacy_users::Model, Option<String>)> = Vec::new();
    let mut index_by_id: HashMap<i32, usize> = HashMap::new();

    for (user, proxy) in rows {
        let blob = proxy
            .filter(legacy_proxies::Model::is_vless)
            .map(|proxy| settings_blob(proxy.settings));

        if let Some(&index) = index_by_id.get(&user.id) {
            let slot = &mut order[index].1;
            if slot.is_none() {
                *slot = blob.flatten();
            }
        } else {
            index_by_id.insert(user.id, order.len());
            order.push((user, blob.flatten()));
        }
    }

    order
        .into_iter()
        .map(|(user, blob)| into_legacy_record(user, blob))
        .collect()
}

/// settings 列 → 原始文本；JSON 字符串视为已序列化的文本
fn settings_blob(settings: Option<Value>) -> Option<String> {
    settings.map(|value| match value {
        Value::String(text) => text,
        other => other.to_string(),
    })
}

fn into_legacy_record(user: legacy_users::Model, blob: Option<String>) -> LegacyUserRecord {
    LegacyUserRecord {
        username: user.username,
        status: user.status,
        used_traffic: user.used_traffic,
        data_limit: user.data_limit,
        expire: user.expire.map(RawTimestamp::from),
        created_at: user.created_at.map(RawTimestamp::from),
        admin_id: user.admin_id,
        data_limit_reset_strategy: user.data_limit_reset_strategy,
        note: user.note,
        sub_revoked_at: user.sub_revoked_at.map(RawTimestamp::from),
        sub_updated_at: user.sub_updated_at.map(RawTimestamp::from),
        online_at: user.online_at.map(RawTimestamp::from),
        edit_at: user.edit_at.map(RawTimestamp::from),
        last_status_change: user.last_status_change.map(RawTimestamp::from),
        sub_last_user_agent: user.sub_last_user_agent,
        on_hold_timeout: user.on_hold_timeout,
        on_hold_expire_duration: user.on_hold_expire_duration,
        auto_delete_in_days: user.auto_delete_in_days,
        legacy_proxy_settings: blob,
    }
}

fn to_active_model(record: &MigratedUserRecord) -> Result<users::ActiveModel> {
    let proxy_settings = record.proxy_settings.to_blob().map_err(|e| {
        MigrateError::destination_write_with_source(
            format!("序列化 proxy_settings 失败: {}", record.username),
            e,
        )
    })?;

    Ok(users::ActiveModel {
        id: NotSet,
        username: Set(record.username.clone()),
        status: Set(record.status.clone()),
        used_traffic: Set(record.used_traffic),
        data_limit: Set(record.data_limit),
        expire: Set(record.expire.clone()),
        created_at: Set(record.created_at.clone()),
        admin_id: Set(record.admin_id),
        data_limit_reset_strategy: Set(record.data_limit_reset_strategy.clone()),
        sub_revoked_at: Set(record.sub_revoked_at.clone()),
        note: Set(record.note.clone()),
        sub_updated_at: Set(record.sub_updated_at.clone()),
        sub_last_user_agent: Set(record.sub_last_user_agent.clone()),
        online_at: Set(record.online_at.clone()),
        edit_at: Set(record.edit_at.clone()),
        on_hold_timeout: Set(record.on_hold_timeout),
        on_hold_expire_duration: Set(record.on_hold_expire_duration),
        auto_delete_in_days: Set(record.auto_delete_in_days),
        last_status_change: Set(record.last_status_change.clone()),
        proxy_settings: Set(proxy_settings),
    })
}
