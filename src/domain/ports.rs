use crate::domain::model::{ClockKind, NaiveZone, OutputFormat};
use chrono::{DateTime, Utc};

/// Wall-clock source a session re-reads on every tick.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

pub trait CountdownSettings: Send + Sync {
    fn event_date(&self) -> Option<&str>;
    fn naive_zone(&self) -> NaiveZone;
    fn output_format(&self) -> OutputFormat;
    fn clock_kind(&self) -> ClockKind;
}
