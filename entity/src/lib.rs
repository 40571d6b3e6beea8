//! # Entity 模块
//!
//! 包含迁移两端的 Sea-ORM 实体定义：
//! - `legacy_users` / `legacy_proxies`：旧版面板的 `users` + `proxies` 表
//! - `users`：新版面板的 `users` 表（代理凭据内联在 `proxy_settings` JSON 列）

pub mod legacy_proxies;
pub mod legacy_users;
pub mod users;

pub use legacy_proxies::Entity as LegacyProxies;
pub use legacy_users::Entity as LegacyUsers;
pub use users::Entity as Users;
