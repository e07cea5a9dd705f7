use serde::{Deserialize, Serialize};

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_MINUTE: i64 = 60;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Unit suffixes appended by [`format_duration`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationUnits {
    pub day: String,
    pub hour: String,
    pub minute: String,
    pub second: String,
}

impl DurationUnits {
    pub fn english() -> Self {
        Self {
            day: "d".to_string(),
            hour: "h".to_string(),
            minute: "m".to_string(),
            second: "s".to_string(),
        }
    }

    pub fn chinese() -> Self {
        Self {
            day: "天".to_string(),
            hour: "小时".to_string(),
            minute: "分".to_string(),
            second: "秒".to_string(),
        }
    }
}

impl Default for DurationUnits {
    fn default() -> Self {
        Self::english()
    }
}

/// Formats a number of seconds as at most three of its most significant
/// non-zero units, e.g. `1d2h3m` or `5m7s`.
///
/// Zero renders as `0s`. Negative input is reported as `N/A`.
pub fn format_duration(seconds: i64, units: &DurationUnits) -> String {
    if seconds < 0 {
        return "N/A".to_string();
    }

    let days = seconds / SECS_PER_DAY;
    let hours = (seconds % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (seconds % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let secs = seconds % SECS_PER_MINUTE;

    let mut parts = Vec::with_capacity(4);
    if days > 0 {
        parts.push(format!("{}{}", days, units.day));
    }
    if hours > 0 {
        parts.push(format!("{}{}", hours, units.hour));
    }
    if minutes > 0 {
        parts.push(format!("{}{}", minutes, units.minute));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{}{}", secs, units.second));
    }

    parts.truncate(3);
    parts.concat()
}

pub fn bytes_to_gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Percentage rounded to one decimal place, `0.0` when `total` is zero.
pub fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((part as f64 / total as f64) * 1000.0).round() / 10.0
}
