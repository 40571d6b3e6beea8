//! The unified error handling system for the migration tool.

// 1. Core Types
pub use config::ConfigError;
pub use types::MigrateError;

/// A unified `Result` type for the entire crate.
///
/// All functions that can fail should return this type.
pub type Result<T> = std::result::Result<T, MigrateError>;

// 2. Module declarations
/// 配置错误
pub mod config;
/// 错误宏
pub mod macros;
/// 错误类型
pub mod types;

// 3. Context Trait for adding context to errors.
/// 为 `Result` 附加上下文
pub trait Context<T, E> {
    /// 附加固定的上下文描述
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display;

    /// 出错时才生成上下文描述
    #[track_caller]
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E> Context<T, E> for std::result::Result<T, E>
where
    E: Into<MigrateError>,
{
    #[track_caller]
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display,
    {
        self.with_context(|| context)
    }

    #[track_caller]
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => {
                let context_message = context().to_string();
                Err(MigrateError::Context {
                    context: context_message,
                    source: Box::new(error.into()),
                })
            }
        }
    }
}
