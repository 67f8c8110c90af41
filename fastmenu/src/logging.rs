use fastmenu_config::LoggingConfig;
use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Install a terminal logger for plugins that run without a host logger.
///
/// Returns `false` when logging is disabled or a logger is already installed.
pub fn init_logger(config: &LoggingConfig) -> bool {
    if !config.enabled {
        return false;
    }

    let mut builder = ConfigBuilder::new();
    if !config.threads {
        builder.set_thread_level(LevelFilter::Off);
    }
    if !config.timestamp {
        builder.set_time_level(LevelFilter::Off);
    }
    let color = if config.color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };

    match TermLogger::init(
        config.level.into(),
        builder.build(),
        TerminalMode::Mixed,
        color,
    ) {
        Ok(()) => true,
        Err(_) => {
            log::debug!("A logger is already installed, keeping it");
            false
        }
    }
}
