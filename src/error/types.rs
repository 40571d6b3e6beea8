//! # 错误类型定义

use super::config::ConfigError;
use thiserror::Error;

/// 迁移工具主要错误类型
#[derive(Debug, Error)]
pub enum MigrateError {
    /// 配置相关错误（缺参、非法取值），立即终止，不重试
    #[error("配置错误: {message}")]
    Config {
        /// 错误描述
        message: String,
        /// 底层错误
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 无法建立数据库连接
    #[error("连接错误: {message}")]
    Connection {
        /// 错误描述
        message: String,
        /// 底层错误
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 读取旧库失败，此时新库尚未写入
    #[error("源库查询错误: {message}")]
    SourceQuery {
        /// 错误描述
        message: String,
        /// 底层错误
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 写入新库失败，整批回滚
    #[error("目标库写入错误: {message}")]
    DestinationWrite {
        /// 错误描述
        message: String,
        /// 底层错误
        #[source]
        source: Option<anyhow::Error>,
    },

    /// IO相关错误
    #[error("IO错误: {message}")]
    Io {
        /// 错误描述
        message: String,
        /// 底层错误
        #[source]
        source: std::io::Error,
    },

    /// 序列化/反序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        /// 错误描述
        message: String,
        /// 底层错误
        #[source]
        source: anyhow::Error,
    },

    /// 运行被中断（Ctrl-C），未提交任何数据
    #[error("迁移已取消: {message}")]
    Cancelled {
        /// 取消原因
        message: String,
    },

    /// 附加上下文的错误
    #[error("{context}")]
    Context {
        /// 上下文描述
        context: String,
        /// 底层错误
        #[source]
        source: Box<MigrateError>,
    },
}

impl MigrateError {
    /// 结构化错误代码，用于报告输出
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config { .. } => "CONFIG_ERROR",
            Self::Connection { .. } => "CONNECTION_ERROR",
            Self::SourceQuery { .. } => "SOURCE_QUERY_ERROR",
            Self::DestinationWrite { .. } => "DESTINATION_WRITE_ERROR",
            Self::Io { .. } => "IO_ERROR",
            Self::Serialization { .. } => "SERIALIZATION_ERROR",
            Self::Cancelled { .. } => "CANCELLED",
            Self::Context { source, .. } => source.kind(),
        }
    }

    /// 剥离上下文包装后的根错误
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// 包含完整来源链的错误描述
    ///
    /// 依次拼接各层 `source()`，已出现在前文中的描述不再重复。
    #[must_use]
    pub fn chain_message(&self) -> String {
        let mut message = self.to_string();
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            let text = err.to_string();
            if !text.is_empty() && !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            cause = err.source();
        }
        message
    }

    /// 创建配置错误
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的配置错误
    pub fn config_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建连接错误
    pub fn connection<T: Into<String>>(message: T) -> Self {
        Self::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的连接错误
    pub fn connection_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Connection {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建源库查询错误
    pub fn source_query<T: Into<String>>(message: T) -> Self {
        Self::SourceQuery {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的源库查询错误
    pub fn source_query_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::SourceQuery {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建目标库写入错误
    pub fn destination_write<T: Into<String>>(message: T) -> Self {
        Self::DestinationWrite {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的目标库写入错误
    pub fn destination_write_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::DestinationWrite {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建取消错误
    pub fn cancelled<T: Into<String>>(message: T) -> Self {
        Self::Cancelled {
            message: message.into(),
        }
    }
}

impl From<ConfigError> for MigrateError {
    fn from(err: ConfigError) -> Self {
        Self::Config {
            message: err.to_string(),
            source: Some(err.into()),
        }
    }
}

impl From<std::io::Error> for MigrateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: "文件操作失败".to_string(),
            source: err,
        }
    }
}

impl From<toml::de::Error> for MigrateError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config {
            message: "TOML解析失败".to_string(),
            source: Some(err.into()),
        }
    }
}

impl From<toml::ser::Error> for MigrateError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            message: "TOML序列化失败".to_string(),
            source: err.into(),
        }
    }
}

impl From<serde_json::Error> for MigrateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON序列化失败".to_string(),
            source: err.into(),
        }
    }
}
