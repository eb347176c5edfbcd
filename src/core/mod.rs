pub mod formatter;
pub mod scheduler;
pub mod target;

pub use crate::domain::model::{RemainingDuration, SessionState, SessionStatus, TargetInstant};
pub use crate::domain::ports::{Clock, CountdownSettings};
pub use crate::utils::error::Result;
