//! # Marzban Migrate
//!
//! 将旧版 Marzban 面板的用户与代理凭据迁移到带 `proxy_settings` 的新表结构：
//! 时间统一为 UTC 文本，四种协议凭据合并为一个 JSON，全部写入在单个事务内完成。

/// 命令行接口
pub mod cli;
/// 配置
pub mod config;
/// 错误处理
pub mod error;
/// 日志
pub mod logging;
/// 迁移流水线
pub mod pipeline;
/// 迁移报告
pub mod report;
/// 数据仓储
pub mod repository;
/// 测试工具
pub mod testing;
/// 记录转换
pub mod transform;
/// 领域类型
pub mod types;

pub use error::{MigrateError, Result};
pub use pipeline::{MigrationPipeline, run};
pub use report::{MigrationFailure, MigrationOutcome, MigrationReport};
pub use repository::{DatabaseRepository, RecordRepository};
