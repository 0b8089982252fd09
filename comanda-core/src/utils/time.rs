//! 时间工具函数 - 业务时区转换
//!
//! 数据库只存 `i64` Unix millis；"今天" 与订单号中的日期
//! 一律按业务时区计算。

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// 业务时区的今天
pub fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Unix millis → 业务时区日期时间
///
/// 超出范围的时间戳回退到 Unix 纪元。
pub fn to_local(millis: i64, tz: Tz) -> DateTime<Tz> {
    let utc = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default();
    utc.with_timezone(&tz)
}

/// 按业务时区格式化时间戳
pub fn format_millis(millis: i64, tz: Tz, fmt: &str) -> String {
    to_local(millis, tz).format(fmt).to_string()
}

/// 日期 + 时分秒 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn date_hms_to_millis(date: NaiveDate, hour: u32, min: u32, sec: u32, tz: Tz) -> i64 {
    let naive = date
        .and_hms_opt(hour, min, sec)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN));
    tz.from_local_datetime(&naive)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    date_hms_to_millis(date, 0, 0, 0, tz)
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    date_hms_to_millis(next_day, 0, 0, 0, tz)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bounds_madrid() {
        let tz = chrono_tz::Europe::Madrid;
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        // CET = UTC+1
        assert_eq!(day_start_millis(date, tz), 1_705_273_200_000);
        assert_eq!(day_end_millis(date, tz) - day_start_millis(date, tz), 86_400_000);
    }

    #[test]
    fn test_dst_day_is_short() {
        let tz = chrono_tz::Europe::Madrid;
        let date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(day_end_millis(date, tz) - day_start_millis(date, tz), 23 * 3_600_000);
    }

    #[test]
    fn test_format_millis() {
        let tz = chrono_tz::Europe::Madrid;
        assert_eq!(format_millis(1_705_273_200_000, tz, "%Y%m%d %H:%M"), "20240115 00:00");
    }
}
