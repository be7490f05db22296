use crate::{config::AppConfig, consts};
use logfire::config::{MetricsOptions, SendToLogfire};
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};
use std::{fs, path::Path};

/// Sets up the process logger.
///
/// With a Logfire token, logs and metrics are shipped to Logfire and the
/// returned handler must be shut down before exit. Otherwise logs go to the
/// terminal and are appended to `<log_dir>/app.log`.
pub fn setup_logger(app_config: &AppConfig) -> anyhow::Result<Option<logfire::ShutdownHandler>> {
    if !app_config.logfire_token.is_empty() {
        let shutdown_handler = logfire::configure()
            .install_panic_handler()
            .with_metrics(Some(MetricsOptions::default()))
            .send_to_logfire(SendToLogfire::Yes)
            .with_token(&app_config.logfire_token)
            .finish()?;
        return Ok(Some(shutdown_handler));
    }

    fs::create_dir_all(&app_config.log_dir)?;
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(Path::new(&app_config.log_dir).join(consts::LOG_FILE_NAME))?;

    let level = if app_config.is_prod() {
        LevelFilter::Info
    } else {
        LevelFilter::Debug
    };
    let logger_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("wa_relay")
        .add_filter_allow_str("ntex")
        .build();

    CombinedLogger::init(vec![
        TermLogger::new(
            level,
            logger_config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(level, logger_config, log_file),
    ])?;

    Ok(None)
}
