//! # 新版用户实体定义
//!
//! 新版面板 `users` 表。时间列以 `YYYY-MM-DD HH:MM:SS` 文本写入（UTC），
//! 四种协议的凭据合并存放在 `proxy_settings` JSON 列。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 新版用户实体
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub status: String,
    pub used_traffic: i64,
    pub data_limit: Option<i64>,
    #[sea_orm(column_type = "DateTime", nullable)]
    pub expire: Option<String>,
    #[sea_orm(column_type = "DateTime")]
    pub created_at: String,
    pub admin_id: Option<i32>,
    pub data_limit_reset_strategy: String,
    #[sea_orm(column_type = "DateTime", nullable)]
    pub sub_revoked_at: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    #[sea_orm(column_type = "DateTime", nullable)]
    pub sub_updated_at: Option<String>,
    pub sub_last_user_agent: Option<String>,
    #[sea_orm(column_type = "DateTime", nullable)]
    pub online_at: Option<String>,
    #[sea_orm(column_type = "DateTime", nullable)]
    pub edit_at: Option<String>,
    pub on_hold_timeout: Option<DateTime>,
    pub on_hold_expire_duration: Option<i64>,
    pub auto_delete_in_days: Option<i32>,
    #[sea_orm(column_type = "DateTime", nullable)]
    pub last_status_change: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub proxy_settings: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
