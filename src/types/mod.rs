/// 代理凭据
pub mod proxy;
/// 迁移记录
pub mod record;
/// 时区
pub mod timezone;
pub use proxy::*;
pub use record::*;
pub use timezone::*;
