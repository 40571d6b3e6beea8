//! # 迁移选项

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::types::SourceTimezone;

/// 单条 INSERT 语句的默认行数
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// 一次迁移运行的选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MigrationOptions {
    /// 是否迁移用户到期时间
    pub transfer_expire: bool,
    /// 旧库时间所在时区
    pub source_timezone: SourceTimezone,
    /// 运行开始时刻，缺失 created_at 的记录统一使用该值
    pub run_started_at: DateTime<Utc>,
    /// 每条 INSERT 语句写入的行数（同一事务内）
    pub batch_size: usize,
}

impl MigrationOptions {
    /// 以当前时刻作为运行开始时间
    #[must_use]
    pub fn new(transfer_expire: bool, source_timezone: SourceTimezone) -> Self {
        Self {
            transfer_expire,
            source_timezone,
            run_started_at: Utc::now(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// 指定运行开始时刻
    #[must_use]
    pub const fn with_run_started_at(mut self, run_started_at: DateTime<Utc>) -> Self {
        self.run_started_at = run_started_at;
        self
    }

    /// 设置每条 INSERT 语句的行数
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// 校验选项
    pub fn validate(&self) -> Result<()> {
        crate::ensure_config!(
            self.batch_size > 0,
            "batch_size 必须大于0，当前 {}",
            self.batch_size
        );
        Ok(())
    }
}
