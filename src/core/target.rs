use crate::domain::model::{NaiveZone, TargetInstant};
use crate::utils::error::{CountdownError, Result};
use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// 解析目標時間字串，例如 `2021-02-15 22:08:00` 或 RFC 3339
///
/// Strings carrying an offset keep it; naive strings are placed in `zone`.
pub fn parse_target(input: &str, zone: NaiveZone) -> Result<TargetInstant> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CountdownError::invalid_target(input, "missing target instant"));
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(TargetInstant::new(at.with_timezone(&Utc)));
    }

    let naive = parse_naive(trimmed).ok_or_else(|| {
        CountdownError::invalid_target(
            input,
            "expected 'YYYY-MM-DD HH:MM:SS', 'YYYY-MM-DD' or an RFC 3339 timestamp",
        )
    })?;

    let at = match zone {
        NaiveZone::Utc => Utc.from_utc_datetime(&naive),
        NaiveZone::Local => match Local.from_local_datetime(&naive) {
            LocalResult::Single(at) => at.with_timezone(&Utc),
            // 夏令時間重疊時取較早的時刻
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                return Err(CountdownError::invalid_target(
                    input,
                    "local time does not exist (daylight saving gap)",
                ))
            }
        },
    };

    Ok(TargetInstant::new(at))
}

fn parse_naive(input: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
