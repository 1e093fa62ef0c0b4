mod bot;
mod config;

use std::time::Duration;

use teloxide::Bot;
use tracing::info;
use tracing_subscriber::prelude::*;

use bot::{CurriculumBot, CurriculumFiles, EngineSettings, TelegramGateway, YandexGpt};
use config::Config;

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "curriculum_bot.json".to_string());

    // Configuration problems are the only fatal errors; logging is not up
    // yet, so they go straight to stderr.
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Setup logging. The level was validated at config load.
    let level = config.log_level;
    let log_dir = config.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("curriculum_bot.log"))
        .expect("Failed to open log file");
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(level.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(level.into()),
                ),
        )
        .init();

    info!("🎓 Starting ITMO curriculum bot...");
    info!("Loaded config from {config_path}");
    info!("{}", config.summary());

    let gateway = TelegramGateway::new(Bot::new(&config.telegram_bot_token));
    let completion = YandexGpt::new(
        config.yandex_folder_id.clone(),
        config.yandex_auth_token.clone(),
        config.model_name.clone(),
        Duration::from_secs(config.request_timeout_secs),
    );
    let knowledge = CurriculumFiles::new(&config.curriculum_dir);

    let settings = EngineSettings::new(
        config.temperature,
        config.max_tokens,
        config.max_message_length,
        config.poll_timeout_secs,
    );

    let mut engine = CurriculumBot::new(settings, gateway, completion, knowledge);

    tokio::select! {
        _ = engine.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Bot stopped by user");
        }
    }
}
