use crate::domain::model::RemainingDuration;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Breaks a second count down into days, hours, minutes and seconds.
///
/// Expired or non-positive input yields [`RemainingDuration::ZERO`].
///
/// Days are rounded to the nearest whole day (half up) rather than
/// truncated, so 23h59m58s reads as `1d 23h 59m 58s`. Hours, minutes and
/// seconds are the usual remainders.
pub fn format(seconds_remaining: i64, is_expired: bool) -> RemainingDuration {
    if is_expired || seconds_remaining <= 0 {
        return RemainingDuration::ZERO;
    }

    let days = seconds_remaining / SECONDS_PER_DAY
        + i64::from(seconds_remaining % SECONDS_PER_DAY >= SECONDS_PER_DAY / 2);
    let hours = (seconds_remaining % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (seconds_remaining % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = seconds_remaining % SECONDS_PER_MINUTE;

    // 以上皆為正數，轉型不會溢位
    RemainingDuration {
        days: days as u64,
        hours: hours as u8,
        minutes: minutes as u8,
        seconds: seconds as u8,
    }
}
