//! # 记录转换模块
//!
//! 旧版用户记录 → 新版用户记录的纯函数转换：时间规范化、凭据生成、字段映射

/// 凭据生成
pub mod credentials;
/// 记录映射
pub mod mapper;
/// 时间规范化
pub mod time;

pub use credentials::{
    DEFAULT_SECRET_LENGTH, derive_vless_settings, random_secret, synthesize_proxy_settings,
};
pub use mapper::{RecordMapper, map_record};
pub use time::{MAX_EPOCH_SECONDS, TimeNormalizer, normalize};
