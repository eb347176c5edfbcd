use chrono::{Duration as ChronoDuration, Utc};
use event_countdown::domain::model::OutputFormat;
use event_countdown::domain::ports::{Clock, CountdownSettings};
use event_countdown::utils::validation::Validate;
use event_countdown::{CountdownScheduler, RemainingDuration, SessionStatus, TokioClock, TomlConfig};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[tokio::test(start_paused = true)]
async fn test_end_to_end_countdown_from_toml_file() {
    let temp_dir = TempDir::new().unwrap();
    let clock = TokioClock::anchored_at(Utc::now());
    let target = clock.now() + ChronoDuration::seconds(5);

    let config_content = format!(
        r#"
[countdown]
event_date = "{}"
naive_zone = "utc"

[display]
format = "json"
"#,
        target.format("%Y-%m-%d %H:%M:%S%.f")
    );
    let config_path = temp_dir.path().join("countdown.toml");
    tokio::fs::write(&config_path, config_content).await.unwrap();

    let settings = TomlConfig::from_file(&config_path).unwrap();
    assert!(settings.validate().is_ok());
    assert_eq!(settings.output_format(), OutputFormat::Json);

    // 以 JSON 行輸出，模擬 CLI 主程式的行為
    let lines: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let scheduler = CountdownScheduler::new(clock);
    let handle = scheduler
        .start_countdown(
            settings.event_date().unwrap(),
            settings.naive_zone(),
            move |remaining| {
                sink.lock()
                    .unwrap()
                    .push(serde_json::to_string(&remaining).unwrap())
            },
        )
        .unwrap();

    assert_eq!(handle.wait().await.unwrap(), SessionStatus::Expired);

    let lines = lines.lock().unwrap();
    assert_eq!(lines.len(), 6);
    assert_eq!(
        lines[0],
        r#"{"days":0,"hours":0,"minutes":0,"seconds":5}"#
    );
    let last: RemainingDuration = serde_json::from_str(lines.last().unwrap()).unwrap();
    assert!(last.is_zero());
}

#[test]
fn test_missing_config_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = TomlConfig::from_file(temp_dir.path().join("absent.toml"));
    assert!(matches!(
        result,
        Err(event_countdown::CountdownError::IoError(_))
    ));
}
