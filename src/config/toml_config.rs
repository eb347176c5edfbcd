use crate::domain::model::{ClockKind, NaiveZone, OutputFormat};
use crate::domain::ports::CountdownSettings;
use crate::utils::error::{CountdownError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_required_field, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountdownConfig {
    pub event_date: Option<String>,
    #[serde(default)]
    pub naive_zone: NaiveZone,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub clock: ClockKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CountdownError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CountdownError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${EVENT_DATE})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CountdownError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn verbose_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl CountdownSettings for TomlConfig {
    fn event_date(&self) -> Option<&str> {
        self.countdown.event_date.as_deref()
    }

    fn naive_zone(&self) -> NaiveZone {
        self.countdown.naive_zone
    }

    fn output_format(&self) -> OutputFormat {
        self.display.format
    }

    fn clock_kind(&self) -> ClockKind {
        self.runtime.clock
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        let event_date = validate_required_field("countdown.event_date", &self.countdown.event_date)?;
        validate_non_empty_string("countdown.event_date", event_date)
    }
}
