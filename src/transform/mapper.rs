//! # 记录映射
//!
//! 旧版用户记录 → 新版用户记录。纯函数：无 IO、无共享状态，可并发调用。

use crate::config::MigrationOptions;
use crate::types::timezone::timezone_utils::format_utc;
use crate::types::{LegacyUserRecord, MigratedUserRecord, RawTimestamp};

use super::credentials::synthesize_proxy_settings;
use super::time::TimeNormalizer;

/// 记录映射器
///
/// 构造时固定时区、是否迁移到期时间，以及整次运行共用的 `created_at` 默认值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMapper {
    normalizer: TimeNormalizer,
    transfer_expire: bool,
    created_at_default: String,
}

impl RecordMapper {
    /// 按运行选项创建映射器
    #[must_use]
    pub fn new(options: &MigrationOptions) -> Self {
        Self {
            normalizer: TimeNormalizer::new(options.source_timezone),
            transfer_expire: options.transfer_expire,
            created_at_default: format_utc(&options.run_started_at),
        }
    }

    /// 缺失 `created_at` 时使用的默认值
    #[must_use]
    pub fn created_at_default(&self) -> &str {
        &self.created_at_default
    }

    /// 映射单条记录
    #[must_use]
    pub fn map(&self, record: &LegacyUserRecord) -> MigratedUserRecord {
        let normalize = |value: Option<&RawTimestamp>| self.normalizer.normalize(value, None);

        let created_at = self
            .normalizer
            .normalize(record.created_at.as_ref(), Some(&self.created_at_default))
            .unwrap_or_else(|| self.created_at_default.clone());

        let expire = if self.transfer_expire {
            normalize(record.expire.as_ref())
        } else {
            None
        };

        MigratedUserRecord {
            username: record.username.clone(),
            status: record.status.clone(),
            used_traffic: record.used_traffic,
            data_limit: record.data_limit,
            expire,
            created_at,
            admin_id: record.admin_id,
            data_limit_reset_strategy: record.data_limit_reset_strategy.clone(),
            note: record.note.clone(),
            sub_revoked_at: normalize(record.sub_revoked_at.as_ref()),
            sub_updated_at: normalize(record.sub_updated_at.as_ref()),
            online_at: normalize(record.online_at.as_ref()),
            edit_at: normalize(record.edit_at.as_ref()),
            last_status_change: normalize(record.last_status_change.as_ref()),
            sub_last_user_agent: record.sub_last_user_agent.clone(),
            on_hold_timeout: record.on_hold_timeout,
            on_hold_expire_duration: record.on_hold_expire_duration,
            auto_delete_in_days: record.auto_delete_in_days,
            proxy_settings: synthesize_proxy_settings(record.legacy_proxy_settings.as_deref()),
        }
    }

    /// 按输入顺序映射全部记录
    #[must_use]
    pub fn map_all(&self, records: &[LegacyUserRecord]) -> Vec<MigratedUserRecord> {
        records.iter().map(|record| self.map(record)).collect()
    }
}

/// 函数形式的入口
#[must_use]
pub fn map_record(record: &LegacyUserRecord, options: &MigrationOptions) -> MigratedUserRecord {
    RecordMapper::new(options).map(record)
}
