//! # 测试 Mock 对象
//!
//! [`RecordRepository`] 的 mockall 实现，以及内存仓储

use async_trait::async_trait;
use mockall::mock;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{MigrateError, Result};
use crate::repository::RecordRepository;
use crate::types::{LegacyUserRecord, MigratedUserRecord};

mock! {
    pub Repository {}

    #[async_trait]
    impl RecordRepository for Repository {
        async fn fetch_all_users_with_proxy_settings(&self) -> Result<Vec<LegacyUserRecord>>;
        async fn bulk_insert(&self, records: &[MigratedUserRecord]) -> Result<u64>;
        async fn close(&self) -> Result<()>;
    }
}

/// 内存仓储
///
/// 作为源库时返回预置记录；作为目标库时累积写入，
/// 遇到 `fail_on_username` 则整批拒绝。
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    source: Vec<LegacyUserRecord>,
    inserted: Mutex<Vec<MigratedUserRecord>>,
    insert_calls: AtomicUsize,
    fail_on_username: Option<String>,
}

impl InMemoryRepository {
    /// 空仓储
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置源记录
    pub fn with_source(source: Vec<LegacyUserRecord>) -> Self {
        Self {
            source,
            ..Self::default()
        }
    }

    /// 写入包含该用户名时失败
    pub fn failing_on(mut self, username: &str) -> Self {
        self.fail_on_username = Some(username.to_string());
        self
    }

    /// 已写入的记录
    pub fn inserted(&self) -> Vec<MigratedUserRecord> {
        self.inserted
            .lock()
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }

    /// `bulk_insert` 调用次数
    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordRepository for InMemoryRepository {
    async fn fetch_all_users_with_proxy_settings(&self) -> Result<Vec<LegacyUserRecord>> {
        Ok(self.source.clone())
    }

    async fn bulk_insert(&self, records: &[MigratedUserRecord]) -> Result<u64> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(name) = &self.fail_on_username {
            if records.iter().any(|record| &record.username == name) {
                return Err(MigrateError::destination_write(format!(
                    "用户名重复: {name}"
                )));
            }
        }

        let mut rows = self
            .inserted
            .lock()
            .map_err(|_| MigrateError::destination_write("内存仓储锁已损坏"))?;
        rows.extend_from_slice(records);
        Ok(records.len() as u64)
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
