use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Remaining time until the target, broken down for display.
///
/// `hours`, `minutes` and `seconds` are always within their clock ranges;
/// once the target is reached every field is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RemainingDuration {
    pub days: u64,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl RemainingDuration {
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for RemainingDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {:02}h {:02}m {:02}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

/// The fixed point in time a session counts down to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetInstant(DateTime<Utc>);

impl TargetInstant {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.0
    }

    /// Whole seconds left until the target, rounded up so that a value of
    /// zero or less coincides with the target having been reached.
    pub fn seconds_until(&self, now: DateTime<Utc>) -> i64 {
        const NANOS_PER_SECOND: i64 = 1_000_000_000;

        let delta = self.0 - now;
        match delta.num_nanoseconds() {
            Some(nanos) => {
                nanos.div_euclid(NANOS_PER_SECOND)
                    + i64::from(nanos.rem_euclid(NANOS_PER_SECOND) != 0)
            }
            // 超過約 292 年，奈秒溢位；此時秒數精度已足夠
            None => delta.num_seconds(),
        }
    }

    pub fn is_reached(&self, now: DateTime<Utc>) -> bool {
        now >= self.0
    }
}

impl From<DateTime<Utc>> for TargetInstant {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl fmt::Display for TargetInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Per-session counter observed once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub seconds_remaining: i64,
    pub is_expired: bool,
}

impl SessionState {
    pub fn observe(target: &TargetInstant, now: DateTime<Utc>) -> Self {
        let seconds_remaining = target.seconds_until(now);
        Self {
            seconds_remaining: seconds_remaining.max(0),
            is_expired: seconds_remaining <= 0,
        }
    }

    pub fn remaining(&self) -> RemainingDuration {
        crate::core::formatter::format(self.seconds_remaining, self.is_expired)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Running,
    Expired,
    Cancelled,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// How date strings without an explicit offset are placed on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum NaiveZone {
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ClockKind {
    #[default]
    System,
    Monotonic,
}
