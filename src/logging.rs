//! # 日志配置模块
//!
//! 基于 `tracing` 的日志初始化，以及带运行 ID / 阶段 / 组件字段的结构化日志宏

use std::env;
use std::fmt;
use tracing_subscriber::{
    EnvFilter, fmt as fmt_layer, layer::SubscriberExt, util::SubscriberInitExt,
};

/// 迁移运行所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStage {
    /// 启动与初始化
    Startup,
    /// 配置解析与缓存
    Config,
    /// 数据库连接
    Connect,
    /// 读取旧库
    Fetch,
    /// 记录转换
    Transform,
    /// 写入新库
    Insert,
    /// 输出报告
    Report,
    /// 退出
    Shutdown,
}

impl fmt::Display for LogStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Startup => "startup",
            Self::Config => "config",
            Self::Connect => "connect",
            Self::Fetch => "fetch",
            Self::Transform => "transform",
            Self::Insert => "insert",
            Self::Report => "report",
            Self::Shutdown => "shutdown",
        };
        f.write_str(name)
    }
}

/// 产生日志的组件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogComponent {
    /// 命令行入口
    Main,
    /// 配置
    Config,
    /// 数据库仓储
    Database,
    /// 迁移流水线
    Pipeline,
    /// 记录映射
    Mapper,
}

impl fmt::Display for LogComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Main => "main",
            Self::Config => "config",
            Self::Database => "database",
            Self::Pipeline => "pipeline",
            Self::Mapper => "mapper",
        };
        f.write_str(name)
    }
}

/// 结构化 info 日志
///
/// `linfo!(run_id, stage, component, operation, message, key = value, ...)`
#[macro_export]
macro_rules! linfo {
    ($run_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $field:ident = $value:expr)* $(,)?) => {
        ::tracing::info!(
            run_id = %$run_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            $($field = ?$value,)*
            "{}",
            $message
        )
    };
}

/// 结构化 warn 日志
#[macro_export]
macro_rules! lwarn {
    ($run_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $field:ident = $value:expr)* $(,)?) => {
        ::tracing::warn!(
            run_id = %$run_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            $($field = ?$value,)*
            "{}",
            $message
        )
    };
}

/// 结构化 error 日志
#[macro_export]
macro_rules! lerror {
    ($run_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $field:ident = $value:expr)* $(,)?) => {
        ::tracing::error!(
            run_id = %$run_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            $($field = ?$value,)*
            "{}",
            $message
        )
    };
}

/// 结构化 debug 日志
#[macro_export]
macro_rules! ldebug {
    ($run_id:expr, $stage:expr, $component:expr, $operation:expr, $message:expr $(, $field:ident = $value:expr)* $(,)?) => {
        ::tracing::debug!(
            run_id = %$run_id,
            stage = %$stage,
            component = %$component,
            operation = $operation,
            $($field = ?$value,)*
            "{}",
            $message
        )
    };
}

/// 默认过滤规则：屏蔽逐条 SQL 日志
fn default_filter(level: &str) -> String {
    format!("{level},marzban_migrate=debug,sqlx::query=off,sea_orm::query=warn,sqlx=warn")
}

/// 初始化日志系统
///
/// `RUST_LOG` 存在时优先生效；重复调用不会 panic。
pub fn init_logging(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let log_filter = env::var("RUST_LOG").unwrap_or_else(|_| default_filter(level));

    let env_filter = EnvFilter::try_new(&log_filter)
        .unwrap_or_else(|_| EnvFilter::new(default_filter("info")));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt_layer::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_and_component_names() {
        assert_eq!(LogStage::Insert.to_string(), "insert");
        assert_eq!(LogComponent::Pipeline.to_string(), "pipeline");
    }

    #[test]
    fn test_default_filter_silences_sql() {
        let filter = default_filter("warn");
        assert!(filter.starts_with("warn,"));
        assert!(filter.contains("sqlx::query=off"));
    }

    #[test]
    fn test_macros_expand() {
        init_logging(Some("debug"));
        let run_id = "test-run";
        crate::linfo!(run_id, LogStage::Fetch, LogComponent::Database, "fetch", "读取完成", count = 3);
        crate::ldebug!(
            run_id,
            LogStage::Transform,
            LogComponent::Mapper,
            "map",
            &format!("映射 {} 条", 3)
        );
    }
}
