// Rowcast server entrypoint
//!
//! The heavy lifting (bootstrap, middleware wiring, graceful shutdown)
//! lives in dedicated modules so this file remains a thin orchestrator.

mod lifecycle;
mod logging;

use anyhow::Result;
use lifecycle::{bootstrap, run};
use log::info;
use rowcast_server::config::ServerConfig;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load configuration (fallback to defaults when config file missing)
    let config = match ServerConfig::from_file("config.toml") {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Warning: Failed to load config.toml: {}", e);
            eprintln!("Using defaults");
            ServerConfig::default()
        }
    };

    // Logging before any other side effects
    logging::init_logging(
        &config.logging.level,
        &config.logging.file_path,
        config.logging.log_to_console,
    )?;

    let version = env!("CARGO_PKG_VERSION");
    let commit = env!("GIT_COMMIT_HASH");
    let build_date = env!("BUILD_DATE");
    let branch = env!("GIT_BRANCH");

    info!("Rowcast Server v{}", version);
    info!("Commit: {} ({})  Built: {}", commit, branch, build_date);
    info!("Host: {}  Port: {}", config.server.host, config.server.port);

    // Build application state
    let components = bootstrap(&config).await?;

    // Run HTTP server until termination signal is received
    run(&config, components).await
}
