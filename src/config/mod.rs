pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use super::toml_config::{LoggingConfig, TomlConfig};
    use crate::domain::model::{ClockKind, NaiveZone, OutputFormat};
    use crate::utils::error::Result;
    use crate::utils::validation::{validate_file_extension, validate_path, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
    #[command(name = "event-countdown")]
    #[command(about = "Count down to a fixed date, refreshing once per second")]
    pub struct CliConfig {
        /// Target date, e.g. "2021-02-15 22:08:00" or an RFC 3339 timestamp
        #[arg(long)]
        pub event_date: Option<String>,

        /// Path to TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// Time zone for dates without an explicit offset
        #[arg(long, value_enum)]
        pub naive_zone: Option<NaiveZone>,

        #[arg(long, value_enum)]
        pub format: Option<OutputFormat>,

        #[arg(long, value_enum)]
        pub clock: Option<ClockKind>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub log_json: bool,
    }

    impl CliConfig {
        /// 載入設定檔 (若有)，再套用命令列覆蓋設定
        pub fn into_settings(self) -> Result<TomlConfig> {
            let mut settings = match &self.config {
                Some(path) => TomlConfig::from_file(path)?,
                None => TomlConfig::default(),
            };

            if let Some(event_date) = self.event_date {
                settings.countdown.event_date = Some(event_date);
            }
            if let Some(zone) = self.naive_zone {
                settings.countdown.naive_zone = zone;
            }
            if let Some(format) = self.format {
                settings.display.format = format;
            }
            if let Some(clock) = self.clock {
                settings.runtime.clock = clock;
            }
            if self.verbose || self.log_json {
                let logging = settings.logging.get_or_insert_with(LoggingConfig::default);
                if self.verbose {
                    logging.verbose = Some(true);
                }
                if self.log_json {
                    logging.json = Some(true);
                }
            }

            Ok(settings)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            if let Some(path) = &self.config {
                validate_path("config", path)?;
                validate_file_extension("config", path, &["toml"])?;
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::domain::ports::CountdownSettings;
        use std::io::Write;
        use tempfile::Builder;

        #[test]
        fn test_parse_cli_flags() {
            let config = CliConfig::parse_from([
                "event-countdown",
                "--event-date",
                "2021-02-15 22:08:00",
                "--naive-zone",
                "utc",
                "--format",
                "json",
            ]);

            assert!(config.validate().is_ok());

            let settings = config.into_settings().unwrap();
            assert_eq!(settings.event_date(), Some("2021-02-15 22:08:00"));
            assert_eq!(settings.naive_zone(), NaiveZone::Utc);
            assert_eq!(settings.output_format(), OutputFormat::Json);
            assert_eq!(settings.clock_kind(), ClockKind::System);
        }

        #[test]
        fn test_flags_override_file() {
            let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
            file.write_all(
                br#"
[countdown]
event_date = "2030-01-01 00:00:00"
naive_zone = "utc"

[display]
format = "json"
"#,
            )
            .unwrap();

            let config = CliConfig {
                event_date: Some("2031-01-01 00:00:00".to_string()),
                config: Some(file.path().to_str().unwrap().to_string()),
                verbose: true,
                ..CliConfig::default()
            };
            assert!(config.validate().is_ok());

            let settings = config.into_settings().unwrap();
            assert_eq!(settings.event_date(), Some("2031-01-01 00:00:00"));
            assert_eq!(settings.naive_zone(), NaiveZone::Utc);
            assert_eq!(settings.output_format(), OutputFormat::Json);
            assert!(settings.verbose_logging());
        }

        #[test]
        fn test_rejects_non_toml_config_path() {
            let config = CliConfig {
                config: Some("countdown.yaml".to_string()),
                ..CliConfig::default()
            };
            assert!(config.validate().is_err());
        }
    }
}
