// Configuration module
use rowcast_commons::EngineSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub performance: PerformanceSettings,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Worker count; 0 means one per CPU core
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    pub file_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
}

/// Performance settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSettings {
    /// Keep-alive timeout in seconds
    #[serde(default = "default_keepalive_timeout")]
    pub keepalive_timeout: u64,

    /// Time allowed for a client to send the full request head, in seconds
    #[serde(default = "default_request_head_timeout")]
    pub request_head_timeout: u64,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            keepalive_timeout: default_keepalive_timeout(),
            request_head_timeout: default_request_head_timeout(),
        }
    }
}

// Default value functions
fn default_workers() -> usize {
    0
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_keepalive_timeout() -> u64 {
    75
}

fn default_request_head_timeout() -> u64 {
    5
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        let mut config: ServerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        // Override with environment variables if present
        config.apply_env_overrides()?;

        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides for deployment configuration
    ///
    /// Supported environment variables:
    /// - ROWCAST_SERVER_HOST: Override server.host
    /// - ROWCAST_SERVER_PORT: Override server.port
    /// - ROWCAST_LOG_LEVEL: Override logging.level
    /// - ROWCAST_LOG_FILE: Override logging.file_path
    /// - ROWCAST_LOG_TO_CONSOLE: Override logging.log_to_console
    ///
    /// Environment variables take precedence over config.toml values
    fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        use std::env;

        if let Ok(host) = env::var("ROWCAST_SERVER_HOST") {
            self.server.host = host;
        }

        if let Ok(port_str) = env::var("ROWCAST_SERVER_PORT") {
            self.server.port = port_str
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid ROWCAST_SERVER_PORT value: {}", port_str))?;
        }

        if let Ok(level) = env::var("ROWCAST_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(path) = env::var("ROWCAST_LOG_FILE") {
            self.logging.file_path = path;
        }

        if let Ok(val) = env::var("ROWCAST_LOG_TO_CONSOLE") {
            self.logging.log_to_console =
                val.to_lowercase() == "true" || val == "1" || val.to_lowercase() == "yes";
        }

        Ok(())
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            ));
        }

        self.engine
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid engine settings: {}", e))?;

        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 8080,
                workers: 0,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                file_path: "./logs/rowcast.log".to_string(),
                log_to_console: true,
            },
            engine: EngineSettings::default(),
            performance: PerformanceSettings::default(),
        }
    }
}
