use thiserror::Error;

#[derive(Error, Debug)]
pub enum CountdownError {
    #[error("Invalid target instant '{input}': {reason}")]
    InvalidTarget { input: String, reason: String },

    #[error("Timer unavailable: {reason}")]
    TimerUnavailable { reason: String },

    #[error("Countdown session failed: {reason}")]
    SessionFailed { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CountdownError {
    pub fn invalid_target(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidTarget { .. } => ErrorCategory::Input,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::TimerUnavailable { .. }
            | Self::SessionFailed { .. }
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SerializationError(_) => ErrorSeverity::Medium,
            Self::InvalidTarget { .. }
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::High,
            Self::TimerUnavailable { .. } | Self::SessionFailed { .. } | Self::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::InvalidTarget { .. } => {
                "Use a date like '2021-02-15 22:08:00' or an RFC 3339 timestamp"
            }
            Self::TimerUnavailable { .. } => "Start the countdown from inside a tokio runtime",
            Self::SessionFailed { .. } => "Check the tick handler for panics",
            Self::IoError(_) => "Check that the file exists and is readable",
            Self::SerializationError(_) => "Check the output format setting",
            Self::ConfigError { .. } | Self::ConfigValidationError { .. } => {
                "Check the TOML syntax of the configuration file"
            }
            Self::InvalidConfigValueError { .. } => "Fix the value named in the error",
            Self::MissingConfigError { .. } => {
                "Pass --event-date or set countdown.event_date in the config file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidTarget { input, .. } => {
                format!("Cannot understand the event date '{}'", input)
            }
            Self::MissingConfigError { field } => format!("No value given for {}", field),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CountdownError>;
