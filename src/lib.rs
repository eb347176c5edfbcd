pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::clock::{SystemClock, TokioClock};
pub use config::toml_config::TomlConfig;
pub use crate::core::{
    formatter::format,
    scheduler::{CountdownHandle, CountdownScheduler},
    target::parse_target,
};
pub use domain::model::{NaiveZone, RemainingDuration, SessionStatus, TargetInstant};
pub use utils::error::{CountdownError, Result};
