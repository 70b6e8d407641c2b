// Logging module
use colored::*;
use log::{Level, LevelFilter};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Format log level with color for console
fn format_level_colored(level: Level) -> ColoredString {
    match level {
        Level::Error => format!("[{:5}]", level).bright_red().bold(),
        Level::Warn => format!("[{:5}]", level).bright_yellow().bold(),
        Level::Info => format!("[{:5}]", level).bright_green().bold(),
        Level::Debug => format!("[{:5}]", level).bright_blue().bold(),
        Level::Trace => format!("[{:5}]", level).bright_magenta().bold(),
    }
}

/// Initialize logging based on configuration
/// Console pattern (colored): [timestamp] [LEVEL] - thread - target:line - message
/// File pattern (plain): [timestamp] [LEVEL] [thread - target:line] - message
pub fn init_logging(level: &str, file_path: &str, log_to_console: bool) -> anyhow::Result<()> {
    let level_filter = parse_log_level(level)?;

    // Create logs directory if it doesn't exist
    if let Some(parent) = Path::new(file_path).parent() {
        fs::create_dir_all(parent)?;
    }

    // Open log file in append mode
    let log_file = OpenOptions::new().create(true).append(true).open(file_path)?;

    let base_config = fern::Dispatch::new()
        .level(level_filter)
        // Quiet noisy third-party targets
        .level_for("actix_server", LevelFilter::Info)
        .level_for("actix_web", LevelFilter::Info)
        .level_for("mio", LevelFilter::Warn);

    let file_config = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}] [{:5}] [{} - {}:{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                std::thread::current().name().unwrap_or("main"),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        })
        .chain(log_file);

    if log_to_console {
        let console_config = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} {} - {} - {}",
                    format!("[{}]", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
                        .bright_green()
                        .bold(),
                    format_level_colored(record.level()),
                    format!(
                        "{} - {}:{}",
                        std::thread::current().name().unwrap_or("main"),
                        record.target(),
                        record.line().unwrap_or(0)
                    )
                    .bright_magenta(),
                    message
                ))
            })
            .chain(std::io::stdout());

        base_config.chain(console_config).chain(file_config).apply()?;
    } else {
        base_config.chain(file_config).apply()?;
    }

    log::trace!(
        "Logging initialized: level={}, console={}, file={}",
        level,
        log_to_console,
        file_path
    );

    Ok(())
}

/// Parse log level string to LevelFilter
fn parse_log_level(level: &str) -> anyhow::Result<LevelFilter> {
    match level.to_lowercase().as_str() {
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        _ => Err(anyhow::anyhow!("Invalid log level: {}", level)),
    }
}

#[allow(dead_code)]
/// Initialize simple logging for development (console only)
pub fn init_simple_logging() -> anyhow::Result<()> {
    use env_logger::Builder;

    Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .try_init()?;

    Ok(())
}
