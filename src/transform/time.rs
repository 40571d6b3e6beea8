//! # 时间规范化
//!
//! 将旧库中的 epoch 数值或无时区文本转换为 `YYYY-MM-DD HH:MM:SS` 文本。
//!
//! 非 UTC 源时区沿用旧工具的行为：
//! - 数值：按 UTC 解释后换算为源时区的墙上时间，直接作为结果
//! - 文本：在源时区本地化后原样输出墙上时间（不做真实的 UTC 换算）

use chrono::TimeZone;

use crate::types::timezone::timezone_utils::{format_canonical, parse_canonical, utc_from_epoch};
use crate::types::{RawTimestamp, SourceTimezone};

/// 允许的最大 epoch 秒（9999-12-31 23:59:59 UTC）
pub const MAX_EPOCH_SECONDS: i64 = 253_402_300_799;

/// 时间规范化器，绑定旧库时区
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeNormalizer {
    timezone: SourceTimezone,
}

impl TimeNormalizer {
    /// 绑定旧库时区
    #[must_use]
    pub const fn new(timezone: SourceTimezone) -> Self {
        Self { timezone }
    }

    /// 旧库时区
    #[must_use]
    pub const fn timezone(&self) -> SourceTimezone {
        self.timezone
    }

    /// 规范化单个时间值
    ///
    /// 空值、0、超范围数值以及无法解析的文本都返回 `default`，从不报错。
    #[must_use]
    pub fn normalize(&self, value: Option<&RawTimestamp>, default: Option<&str>) -> Option<String> {
        let fallback = || default.map(str::to_string);
        match value {
            None | Some(RawTimestamp::Epoch(0)) => fallback(),
            Some(RawTimestamp::Epoch(seconds)) => self.normalize_epoch(*seconds).or_else(fallback),
            Some(RawTimestamp::Text(text)) => self.normalize_text(text).or_else(fallback),
        }
    }

    fn normalize_epoch(&self, seconds: i64) -> Option<String> {
        if !(1..=MAX_EPOCH_SECONDS).contains(&seconds) {
            return None;
        }
        let utc = utc_from_epoch(seconds)?;
        if self.timezone.is_utc() {
            return format_canonical(&utc.naive_utc());
        }
        let wall_clock = utc.with_timezone(&self.timezone.tz()).naive_local();
        format_canonical(&wall_clock)
    }

    fn normalize_text(&self, text: &str) -> Option<String> {
        let naive = parse_canonical(text)?;
        if self.timezone.is_utc() {
            return Some(text.to_string());
        }
        // 夏令时空档内的本地时间无法定位，墙上时间保持不变
        let localized = self
            .timezone
            .tz()
            .from_local_datetime(&naive)
            .earliest()
            .map_or(naive, |dt| dt.naive_local());
        format_canonical(&localized)
    }
}

/// 函数形式的入口
#[must_use]
pub fn normalize(
    value: Option<&RawTimestamp>,
    timezone: SourceTimezone,
    default: Option<&str>,
) -> Option<String> {
    TimeNormalizer::new(timezone).normalize(value, default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use rstest::rstest;

    const DEFAULT: Option<&str> = Some("2000-01-01 00:00:00");

    fn epoch(seconds: i64) -> RawTimestamp {
        RawTimestamp::Epoch(seconds)
    }

    fn text(value: &str) -> RawTimestamp {
        RawTimestamp::Text(value.to_string())
    }

    #[rstest]
    #[case::null(None)]
    #[case::zero(Some(epoch(0)))]
    #[case::negative(Some(epoch(-5)))]
    #[case::too_large(Some(epoch(MAX_EPOCH_SECONDS + 1)))]
    #[case::iso_t(Some(text("2024-01-01T00:00:00")))]
    #[case::date_only(Some(text("2024-01-01")))]
    #[case::garbage(Some(text("yesterday")))]
    #[case::empty(Some(text("")))]
    #[case::leading_space(Some(text(" 2025-01-01 00:00:00")))]
    #[case::signed_year(Some(text("+2025-01-01 00:00:00")))]
    #[case::five_digit_year(Some(text("12025-01-01 00:00:00")))]
    fn test_falls_back_to_default(#[case] value: Option<RawTimestamp>) {
        for tz in [SourceTimezone::Utc, SourceTimezone::EuropeMoscow] {
            assert_eq!(
                normalize(value.as_ref(), tz, DEFAULT).as_deref(),
                DEFAULT,
                "tz = {tz}"
            );
            assert_eq!(normalize(value.as_ref(), tz, None), None);
        }
    }

    #[test]
    fn test_epoch_utc() {
        let value = epoch(1_735_689_600);
        assert_eq!(
            normalize(Some(&value), SourceTimezone::Utc, None).as_deref(),
            Some("2025-01-01 00:00:00")
        );
    }

    #[test]
    fn test_epoch_upper_bound_utc() {
        let value = epoch(MAX_EPOCH_SECONDS);
        assert_eq!(
            normalize(Some(&value), SourceTimezone::Utc, None).as_deref(),
            Some("9999-12-31 23:59:59")
        );
    }

    #[test]
    fn test_epoch_moscow_reports_wall_clock() {
        let value = epoch(1_735_689_600);
        assert_eq!(
            normalize(Some(&value), SourceTimezone::EuropeMoscow, None).as_deref(),
            Some("2025-01-01 03:00:00")
        );
    }

    #[test]
    fn test_epoch_moscow_overflowing_year_uses_default() {
        let value = epoch(MAX_EPOCH_SECONDS);
        assert_eq!(
            normalize(Some(&value), SourceTimezone::EuropeMoscow, DEFAULT).as_deref(),
            DEFAULT
        );
    }

    #[test]
    fn test_text_utc_returned_unchanged() {
        let value = text("2025-01-01 00:00:00");
        assert_eq!(
            normalize(Some(&value), SourceTimezone::Utc, None).as_deref(),
            Some("2025-01-01 00:00:00")
        );
    }

    #[test]
    fn test_text_moscow_keeps_wall_clock() {
        let value = text("2025-06-15 12:30:45");
        assert_eq!(
            normalize(Some(&value), SourceTimezone::EuropeMoscow, None).as_deref(),
            Some("2025-06-15 12:30:45")
        );
    }

    #[test]
    fn test_normalizer_reports_timezone() {
        let normalizer = TimeNormalizer::new(SourceTimezone::EuropeMoscow);
        assert_eq!(normalizer.timezone(), SourceTimezone::EuropeMoscow);
    }

    proptest! {
        #[test]
        fn prop_epoch_utc_matches_chrono(seconds in 1_i64..=MAX_EPOCH_SECONDS) {
            let expected = Utc
                .timestamp_opt(seconds, 0)
                .single()
                .unwrap()
                .format("%Y-%m-%d %H:%M:%S")
                .to_string();
            let value = epoch(seconds);
            prop_assert_eq!(normalize(Some(&value), SourceTimezone::Utc, DEFAULT), Some(expected));
        }

        #[test]
        fn prop_text_never_panics(input in "\\PC{0,24}") {
            let value = RawTimestamp::Text(input);
            let _ = normalize(Some(&value), SourceTimezone::EuropeMoscow, None);
        }
    }
}
