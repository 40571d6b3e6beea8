//! # 时区类型和工具
//!
//! 旧库时间所在时区，以及统一的 `YYYY-MM-DD HH:MM:SS` 格式化工具

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// 新库统一使用的时间文本格式
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 旧库时间数据所在的时区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SourceTimezone {
    /// UTC（推荐）
    #[default]
    #[serde(rename = "UTC")]
    Utc,
    /// 莫斯科时间（UTC+3）
    #[serde(rename = "Europe/Moscow")]
    EuropeMoscow,
}

impl SourceTimezone {
    /// 对应的 IANA 时区
    #[must_use]
    pub const fn tz(self) -> Tz {
        match self {
            Self::Utc => Tz::UTC,
            Self::EuropeMoscow => Tz::Europe__Moscow,
        }
    }

    /// IANA 名称
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utc => "UTC",
            Self::EuropeMoscow => "Europe/Moscow",
        }
    }

    /// 是否为 UTC
    #[must_use]
    pub const fn is_utc(self) -> bool {
        matches!(self, Self::Utc)
    }
}

impl fmt::Display for SourceTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceTimezone {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" | "1" => Ok(Self::Utc),
            "europe/moscow" | "europe-moscow" | "moscow" | "msk" | "2" => Ok(Self::EuropeMoscow),
            other => Err(ConfigError::invalid(
                "source_timezone",
                format!("不支持的时区 '{other}'，可选 UTC / Europe/Moscow"),
            )),
        }
    }
}

/// 时区工具函数
pub mod timezone_utils {
    use super::CANONICAL_FORMAT;
    use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};

    /// 按统一格式解析无时区的时间文本
    ///
    /// 年份必须恰好四位数字且位于开头：不接受前导空白或正负号。
    #[must_use]
    pub fn parse_canonical(datetime_str: &str) -> Option<NaiveDateTime> {
        let (year, _) = datetime_str.split_once('-')?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        NaiveDateTime::parse_from_str(datetime_str, CANONICAL_FORMAT).ok()
    }

    /// 按统一格式输出；年份超出四位时返回 None
    #[must_use]
    pub fn format_canonical(dt: &NaiveDateTime) -> Option<String> {
        (1..=9999)
            .contains(&dt.year())
            .then(|| dt.format(CANONICAL_FORMAT).to_string())
    }

    /// 将 `DateTime<Utc>` 格式化为统一格式
    #[must_use]
    pub fn format_utc(dt: &DateTime<Utc>) -> String {
        dt.format(CANONICAL_FORMAT).to_string()
    }

    /// epoch 秒 → UTC 时间
    #[must_use]
    pub fn utc_from_epoch(seconds: i64) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(seconds, 0).single()
    }
}
