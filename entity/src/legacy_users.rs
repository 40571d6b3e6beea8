//! # 旧版用户实体定义
//!
//! 旧版 Marzban 面板 `users` 表的 Sea-ORM 实体模型（只读）

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 旧版用户实体
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
    /// 旧版以 epoch 秒存储
    pub expire: Option<i64>,
    pub created_at: Option<DateTime>,
    pub admin_id: Option<i32>,
    pub data_limit_reset_strategy: String,
    pub sub_revoked_at: Option<DateTime>,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub sub_updated_at: Option<DateTime>,
    pub sub_last_user_agent: Option<String>,
    pub online_at: Option<DateTime>,
    pub edit_at: Option<DateTime>,
    pub on_hold_timeout: Option<DateTime>,
    pub on_hold_expire_duration: Option<i64>,
    pub auto_delete_in_days: Option<i32>,
    pub last_status_change: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::legacy_proxies::Entity")]
    Proxies,
}

impl Related<super::legacy_proxies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proxies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
