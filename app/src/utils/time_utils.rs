use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Timelike};

use crate::models::UNKNOWN_TIME;

/// 统一的发布时间输出格式
pub const PUBLISHED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 可识别的无时区时间格式
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// 解析微博时间字符串
///
/// 微博API返回格式: "Mon Oct 07 12:34:56 +0800 2025"
/// 保留原始时区偏移,不转换为UTC
pub fn parse_weibo_time(time_str: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_str(time_str, "%a %b %d %H:%M:%S %z %Y")
}

/// 解析帖子的发布时间
///
/// 返回当地墙上时间 (naive),带时区的格式保留其自身的小时,不做时区换算。
/// "N/A" 或无法解析时返回 `None`。
pub fn parse_published_at(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() || raw == UNKNOWN_TIME {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    if let Ok(dt) = parse_weibo_time(raw) {
        return Some(dt.naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// 发布时间所在的小时 (0-23)
pub fn hour_of_day(raw: &str) -> Option<u32> {
    parse_published_at(raw).map(|dt| dt.hour())
}

/// 规范化微博接口返回的发布时间
///
/// 移动端接口返回的时间形式多样,相对时间以 `now` 为基准换算:
/// - "Mon Oct 07 12:34:56 +0800 2025" → "2025-10-07 12:34:56"
/// - "刚刚" / "5分钟前" / "3小时前"
/// - "今天 12:30" / "昨天 08:15"
/// - "10-07" (仅日期,取最近一次) → "2025-10-07"
///
/// 仅日期的结果没有小时,`parse_published_at` 不接受,不计入小时分布。
///
/// 缺失时返回 "N/A";无法识别的形式原样保留,统计时会被跳过。
pub fn normalize_weibo_time(raw: Option<&str>, now: NaiveDateTime) -> String {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return UNKNOWN_TIME.to_string(),
    };

    if let Ok(dt) = parse_weibo_time(raw) {
        return dt.naive_local().format(PUBLISHED_AT_FORMAT).to_string();
    }

    if raw == "刚刚" {
        return now.format(PUBLISHED_AT_FORMAT).to_string();
    }

    if let Some(minutes) = raw.strip_suffix("分钟前").and_then(|n| n.trim().parse::<i64>().ok()) {
        return (now - Duration::minutes(minutes))
            .format(PUBLISHED_AT_FORMAT)
            .to_string();
    }

    if let Some(hours) = raw.strip_suffix("小时前").and_then(|n| n.trim().parse::<i64>().ok()) {
        return (now - Duration::hours(hours))
            .format(PUBLISHED_AT_FORMAT)
            .to_string();
    }

    let day_offset = if raw.starts_with("今天") {
        Some((0, "今天"))
    } else if raw.starts_with("昨天") {
        Some((1, "昨天"))
    } else {
        None
    };
    if let Some((days, prefix)) = day_offset {
        let time_part = raw[prefix.len()..].trim();
        if let Ok(time) = chrono::NaiveTime::parse_from_str(time_part, "%H:%M") {
            let date = now.date() - Duration::days(days);
            return date.and_time(time).format(PUBLISHED_AT_FORMAT).to_string();
        }
    }

    if let Some(date) = recent_month_day(raw, now) {
        return date.format("%Y-%m-%d").to_string();
    }

    raw.to_string()
}

/// "MM-DD" 取不晚于 `now` 的最近一次,跨年时落到去年
fn recent_month_day(raw: &str, now: NaiveDateTime) -> Option<NaiveDate> {
    [now.year(), now.year() - 1]
        .into_iter()
        .filter_map(|year| NaiveDate::parse_from_str(&format!("{}-{}", year, raw), "%Y-%m-%d").ok())
        .find(|date| *date <= now.date())
}

/// 导出文件名中的时间戳
///
/// 输出格式: YYYYmmdd_HHMMSS (例: 20251007_123456)
pub fn export_timestamp(now: NaiveDateTime) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}
