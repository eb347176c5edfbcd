use clap::Parser;
use event_countdown::adapters::clock::clock_for;
use event_countdown::domain::model::OutputFormat;
use event_countdown::domain::ports::CountdownSettings;
use event_countdown::utils::error::{CountdownError, ErrorSeverity};
use event_countdown::utils::{logger, validation::Validate};
use event_countdown::{CliConfig, CountdownScheduler, RemainingDuration, SessionStatus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(&e));
    }

    // 合併設定檔與命令列參數
    let settings = match config.into_settings() {
        Ok(settings) => settings,
        Err(e) => fail(e),
    };

    // 初始化日誌
    if settings.json_logging() {
        logger::init_json_logger(settings.verbose_logging());
    } else {
        logger::init_cli_logger(settings.verbose_logging());
    }

    tracing::info!("🚀 Starting event-countdown");
    tracing::debug!("Settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        fail(e);
    }

    let event_date = settings.event_date().unwrap_or_default().to_string();
    let format = settings.output_format();
    let scheduler = CountdownScheduler::new(clock_for(settings.clock_kind()));

    let handle = match scheduler.start_countdown(&event_date, settings.naive_zone(), move |remaining| {
        if let Err(e) = print_tick(format, &remaining) {
            tracing::warn!("Failed to write tick: {}", e);
        }
    }) {
        Ok(handle) => handle,
        Err(e) => fail(e),
    };

    if handle.is_finished() {
        tracing::info!("✅ Event date has already passed");
        return Ok(());
    }

    let status = tokio::select! {
        status = handle.wait() => status?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, stopping countdown");
            SessionStatus::Cancelled
        }
    };

    match status {
        SessionStatus::Expired => tracing::info!("✅ Countdown finished"),
        other => tracing::info!("Countdown ended: {:?}", other),
    }

    Ok(())
}

fn print_tick(format: OutputFormat, remaining: &RemainingDuration) -> Result<(), CountdownError> {
    match format {
        OutputFormat::Text => println!("{}", remaining),
        OutputFormat::Json => println!("{}", serde_json::to_string(remaining)?),
    }
    Ok(())
}

fn fail(e: CountdownError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(exit_code(&e));
}

fn exit_code(e: &CountdownError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
