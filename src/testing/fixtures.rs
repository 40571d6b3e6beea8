//! # 测试数据 Fixtures
//!
//! 提供测试用的旧版用户记录、实体模型与新版记录

use chrono::{NaiveDate, NaiveDateTime};
use entity::{legacy_proxies, legacy_users};
use sea_orm::Set;
use serde_json::Value;

use crate::transform::synthesize_proxy_settings;
use crate::types::{LegacyUserRecord, MigratedUserRecord, RawTimestamp};

/// 旧版用户记录构建器
#[derive(Debug, Clone)]
pub struct LegacyUserFixture {
    record: LegacyUserRecord,
}

impl Default for LegacyUserFixture {
    fn default() -> Self {
        Self {
            record: LegacyUserRecord {
                username: "test_user".to_string(),
                status: "active".to_string(),
                used_traffic: 1024,
                data_limit: Some(10 * 1024 * 1024 * 1024),
                expire: None,
                created_at: Some(RawTimestamp::from("2024-01-01 00:00:00")),
                admin_id: Some(1),
                data_limit_reset_strategy: "no_reset".to_string(),
                note: None,
                sub_revoked_at: None,
                sub_updated_at: None,
                online_at: None,
                edit_at: None,
                last_status_change: None,
                sub_last_user_agent: Some("v2rayNG/1.8.5".to_string()),
                on_hold_timeout: None,
                on_hold_expire_duration: None,
                auto_delete_in_days: Some(7),
                legacy_proxy_settings: None,
            },
        }
    }
}

impl LegacyUserFixture {
    /// 默认记录
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置用户名
    pub fn username(mut self, username: &str) -> Self {
        self.record.username = username.to_string();
        self
    }

    /// 设置状态
    pub fn status(mut self, status: &str) -> Self {
        self.record.status = status.to_string();
        self
    }

    /// 设置备注
    pub fn note(mut self, note: &str) -> Self {
        self.record.note = Some(note.to_string());
        self
    }

    /// 设置到期时间
    pub fn expire(mut self, expire: RawTimestamp) -> Self {
        self.record.expire = Some(expire);
        self
    }

    /// 设置创建时间
    pub fn created_at(mut self, created_at: RawTimestamp) -> Self {
        self.record.created_at = Some(created_at);
        self
    }

    /// 清空 created_at
    pub fn no_created_at(mut self) -> Self {
        self.record.created_at = None;
        self
    }

    /// 设置最近在线时间
    pub fn online_at(mut self, online_at: RawTimestamp) -> Self {
        self.record.online_at = Some(online_at);
        self
    }

    /// 设置订阅更新时间
    pub fn sub_updated_at(mut self, sub_updated_at: RawTimestamp) -> Self {
        self.record.sub_updated_at = Some(sub_updated_at);
        self
    }

    /// 设置状态变更时间
    pub fn last_status_change(mut self, last_status_change: RawTimestamp) -> Self {
        self.record.last_status_change = Some(last_status_change);
        self
    }

    /// 设置旧版 VLESS settings 原始文本
    pub fn vless_settings(mut self, blob: &str) -> Self {
        self.record.legacy_proxy_settings = Some(blob.to_string());
        self
    }

    /// 构建记录
    pub fn build(self) -> LegacyUserRecord {
        self.record
    }
}

/// 旧库 `users` 实体构建器（写入 SQLite 测试库）
#[derive(Debug, Clone)]
pub struct LegacyUserModelFixture {
    model: legacy_users::Model,
}

impl LegacyUserModelFixture {
    /// 指定 id 与用户名
    pub fn new(id: i32, username: &str) -> Self {
        Self {
            model: legacy_users::Model {
                id,
                username: username.to_string(),
                status: "active".to_string(),
                used_traffic: 0,
                data_limit: None,
                expire: None,
                created_at: Some(fixed_datetime(2024, 1, 1)),
                admin_id: None,
                data_limit_reset_strategy: "no_reset".to_string(),
                sub_revoked_at: None,
                note: None,
                sub_updated_at: None,
                sub_last_user_agent: None,
                online_at: None,
                edit_at: None,
                on_hold_timeout: None,
                on_hold_expire_duration: None,
                auto_delete_in_days: None,
                last_status_change: None,
            },
        }
    }

    /// 设置创建时间
    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.model.created_at = Some(created_at);
        self
    }

    /// 设置 epoch 秒形式的到期时间
    pub fn expire(mut self, seconds: i64) -> Self {
        self.model.expire = Some(seconds);
        self
    }

    /// 构建实体模型
    pub fn build(self) -> legacy_users::Model {
        self.model
    }

    /// 转换为 Sea-ORM ActiveModel
    pub fn to_active_model(self) -> legacy_users::ActiveModel {
        let m = self.model;
        legacy_users::ActiveModel {
            id: Set(m.id),
            username: Set(m.username),
            status: Set(m.status),
            used_traffic: Set(m.used_traffic),
            data_limit: Set(m.data_limit),
            expire: Set(m.expire),
            created_at: Set(m.created_at),
            admin_id: Set(m.admin_id),
            data_limit_reset_strategy: Set(m.data_limit_reset_strategy),
            sub_revoked_at: Set(m.sub_revoked_at),
            note: Set(m.note),
            sub_updated_at: Set(m.sub_updated_at),
            sub_last_user_agent: Set(m.sub_last_user_agent),
            online_at: Set(m.online_at),
            edit_at: Set(m.edit_at),
            on_hold_timeout: Set(m.on_hold_timeout),
            on_hold_expire_duration: Set(m.on_hold_expire_duration),
            auto_delete_in_days: Set(m.auto_delete_in_days),
            last_status_change: Set(m.last_status_change),
        }
    }
}

/// 旧库 `proxies` 行
pub fn legacy_proxy(
    id: i32,
    user_id: i32,
    proxy_type: &str,
    settings: Option<Value>,
) -> legacy_proxies::ActiveModel {
    legacy_proxies::ActiveModel {
        id: Set(id),
        user_id: Set(Some(user_id)),
        proxy_type: Set(proxy_type.to_string()),
        settings: Set(settings),
    }
}

/// 可直接写入新库的记录，凭据随机生成
pub fn migrated_record(username: &str) -> MigratedUserRecord {
    MigratedUserRecord {
        username: username.to_string(),
        status: "active".to_string(),
        used_traffic: 0,
        data_limit: None,
        expire: None,
        created_at: "2024-01-01 00:00:00".to_string(),
        admin_id: None,
        data_limit_reset_strategy: "no_reset".to_string(),
        note: None,
        sub_revoked_at: None,
        sub_updated_at: None,
        online_at: None,
        edit_at: None,
        last_status_change: None,
        sub_last_user_agent: None,
        on_hold_timeout: None,
        on_hold_expire_duration: None,
        auto_delete_in_days: None,
        proxy_settings: synthesize_proxy_settings(None),
    }
}

fn fixed_datetime(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}
