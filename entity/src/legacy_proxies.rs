//! # 旧版代理实体定义
//!
//! 旧版面板每个用户每种协议一行，`settings` 为协议凭据 JSON

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// VLESS 协议在 `type` 列中的取值
pub const VLESS_PROXY_TYPE: &str = "VLESS";

/// 旧版代理实体
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "proxies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<i32>,
    #[sea_orm(column_name = "type")]
    pub proxy_type: String,
    pub settings: Option<Json>,
}

impl Model {
    /// 是否为 VLESS 协议配置
    pub fn is_vless(&self) -> bool {
        self.proxy_type.eq_ignore_ascii_case(VLESS_PROXY_TYPE)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::legacy_users::Entity",
        from = "Column::UserId",
        to = "super::legacy_users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::legacy_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
