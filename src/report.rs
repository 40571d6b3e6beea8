//! # 迁移报告
//!
//! 成功 / 源库为空 / 失败三种结果，支持文本与 JSON 两种输出

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::MigrateError;
use crate::types::SourceTimezone;

/// 新库时间统一使用的时区
pub const TARGET_TIMEZONE: &str = "UTC";

/// 一次成功迁移的摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    /// 运行 ID
    pub run_id: Uuid,
    /// 写入新库的记录数
    pub migrated: u64,
    /// 旧库时区
    pub source_timezone: SourceTimezone,
    /// 新库时区
    pub target_timezone: String,
    /// 是否迁移了到期时间
    pub expire_transferred: bool,
    /// 运行开始时刻
    pub started_at: DateTime<Utc>,
    /// 耗时（毫秒）
    pub elapsed_ms: u64,
}

/// 迁移结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MigrationOutcome {
    /// 迁移完成
    Migrated(MigrationReport),
    /// 旧库没有用户，新库未被写入
    NoSourceRecords { run_id: Uuid },
}

impl MigrationOutcome {
    /// 写入的记录数
    #[must_use]
    pub const fn migrated(&self) -> u64 {
        match self {
            Self::Migrated(report) => report.migrated,
            Self::NoSourceRecords { .. } => 0,
        }
    }

    /// 运行 ID
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        match self {
            Self::Migrated(report) => report.run_id,
            Self::NoSourceRecords { run_id } => *run_id,
        }
    }

    /// 渲染为 JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for MigrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Migrated(report) => {
                writeln!(f, "迁移完成 (run {})", report.run_id)?;
                writeln!(f, "  迁移用户数: {}", report.migrated)?;
                writeln!(
                    f,
                    "  时区转换: {} -> {}",
                    report.source_timezone, report.target_timezone
                )?;
                writeln!(
                    f,
                    "  到期时间: {}",
                    if report.expire_transferred {
                        "已迁移"
                    } else {
                        "未迁移"
                    }
                )?;
                write!(f, "  耗时: {} ms", report.elapsed_ms)
            }
            Self::NoSourceRecords { run_id } => {
                write!(f, "旧库中没有用户，未写入任何数据 (run {run_id})")
            }
        }
    }
}

/// 失败结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationFailure {
    /// 固定为 `failed`
    pub status: String,
    /// 错误类别代码
    pub kind: String,
    /// 错误描述，含来源链
    pub message: String,
}

impl MigrationFailure {
    /// 渲染为 JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&MigrateError> for MigrationFailure {
    fn from(err: &MigrateError) -> Self {
        Self {
            status: "failed".to_string(),
            kind: err.kind().to_string(),
            message: err.chain_message(),
        }
    }
}

impl fmt::Display for MigrationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
