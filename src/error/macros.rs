//! # 错误处理宏

/// 快速创建配置错误的宏
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::MigrateError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::MigrateError::config(format!($fmt, $($arg)*))
    };
}

/// 快速创建目标库写入错误的宏
#[macro_export]
macro_rules! destination_error {
    ($msg:expr) => {
        $crate::error::MigrateError::destination_write($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::MigrateError::destination_write(format!($fmt, $($arg)*))
    };
}

/// 确保条件成立，否则返回配置错误
#[macro_export]
macro_rules! ensure_config {
    ($cond:expr, $msg:expr) => {
        if !($cond) {
            return Err($crate::config_error!($msg).into());
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            return Err($crate::config_error!($fmt, $($arg)*).into());
        }
    };
}
