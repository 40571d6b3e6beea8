//! # 迁移记录类型
//!
//! 旧库行在仓储边界被校验为 [`LegacyUserRecord`]，映射后得到 [`MigratedUserRecord`]

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::proxy::ProxySettings;
use super::timezone::CANONICAL_FORMAT;

/// 旧库中的时间值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// epoch 秒（整数列）
    Epoch(i64),
    /// 无时区时间文本（DATETIME 列读出后的文本形式）
    Text(String),
}

impl From<i64> for RawTimestamp {
    fn from(seconds: i64) -> Self {
        Self::Epoch(seconds)
    }
}

impl From<&str> for RawTimestamp {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<NaiveDateTime> for RawTimestamp {
    fn from(dt: NaiveDateTime) -> Self {
        Self::Text(dt.format(CANONICAL_FORMAT).to_string())
    }
}

/// 旧版用户记录（只读）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyUserRecord {
    /// 用户名（唯一）
    pub username: String,
    /// 用户状态
    pub status: String,
    /// 已用流量（字节）
    pub used_traffic: i64,
    /// 流量上限（字节）
    pub data_limit: Option<i64>,
    /// 到期时间
    pub expire: Option<RawTimestamp>,
    /// 创建时间
    pub created_at: Option<RawTimestamp>,
    /// 所属管理员
    pub admin_id: Option<i32>,
    /// 流量重置策略
    pub data_limit_reset_strategy: String,
    /// 备注
    pub note: Option<String>,
    /// 订阅吊销时间
    pub sub_revoked_at: Option<RawTimestamp>,
    /// 订阅更新时间
    pub sub_updated_at: Option<RawTimestamp>,
    /// 最近在线时间
    pub online_at: Option<RawTimestamp>,
    /// 最近编辑时间
    pub edit_at: Option<RawTimestamp>,
    /// 状态变更时间
    pub last_status_change: Option<RawTimestamp>,
    /// 最近一次订阅的 User-Agent
    pub sub_last_user_agent: Option<String>,
    /// 暂停截止时间，原样复制
    pub on_hold_timeout: Option<NaiveDateTime>,
    /// 暂停后的有效时长（秒）
    pub on_hold_expire_duration: Option<i64>,
    /// 过期后自动删除天数
    pub auto_delete_in_days: Option<i32>,
    /// 旧版 VLESS settings 原始 JSON 文本，可能缺失或损坏
    pub legacy_proxy_settings: Option<String>,
}

/// 新版用户记录
///
/// 所有经过规范化的时间字段均为 UTC `YYYY-MM-DD HH:MM:SS` 文本。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigratedUserRecord {
    /// 用户名（唯一）
    pub username: String,
    /// 用户状态
    pub status: String,
    /// 已用流量（字节）
    pub used_traffic: i64,
    /// 流量上限（字节）
    pub data_limit: Option<i64>,
    /// 到期时间
    pub expire: Option<String>,
    /// 创建时间
    pub created_at: String,
    /// 所属管理员
    pub admin_id: Option<i32>,
    /// 流量重置策略
    pub data_limit_reset_strategy: String,
    /// 备注
    pub note: Option<String>,
    /// 订阅吊销时间
    pub sub_revoked_at: Option<String>,
    /// 订阅更新时间
    pub sub_updated_at: Option<String>,
    /// 最近在线时间
    pub online_at: Option<String>,
    /// 最近编辑时间
    pub edit_at: Option<String>,
    /// 状态变更时间
    pub last_status_change: Option<String>,
    /// 最近一次订阅的 User-Agent
    pub sub_last_user_agent: Option<String>,
    /// 暂停截止时间，原样复制
    pub on_hold_timeout: Option<NaiveDateTime>,
    /// 暂停后的有效时长（秒）
    pub on_hold_expire_duration: Option<i64>,
    /// 过期后自动删除天数
    pub auto_delete_in_days: Option<i32>,
    /// 四种协议的凭据
    pub proxy_settings: ProxySettings,
}
