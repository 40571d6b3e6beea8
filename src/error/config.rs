use thiserror::Error;

/// 配置解析阶段的细分错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 缺少必填参数
    #[error("缺少必填参数: {0}")]
    MissingField(String),

    /// 参数取值无效
    #[error("参数取值无效 {field}: {reason}")]
    InvalidValue {
        /// 参数名
        field: String,
        /// 无效原因
        reason: String,
    },

    /// TOML 解析失败
    #[error("Configuration parse failed: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// 缺少必填参数
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// 参数取值无效
    #[must_use]
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
