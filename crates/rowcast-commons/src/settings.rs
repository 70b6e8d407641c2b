//! Engine tuning options.

use crate::errors::CommonError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Emit a `row-batch` event every N rows (default: 5000)
    #[serde(default = "default_row_batch_event_interval")]
    pub row_batch_event_interval: u64,

    /// Command timeout in seconds handed to the cursor source (default: 30s).
    /// Enforcement belongs to the source; the engine only forwards it.
    #[serde(default = "default_command_timeout")]
    pub command_timeout: u64,

    /// Serve array-pattern columns of unsupported type through the string
    /// fallback codec instead of dropping them (default: true)
    #[serde(default = "default_array_element_fallback")]
    pub array_element_fallback_to_string: bool,

    /// Treat missing or mismatched columns as compile errors (default: false)
    #[serde(default)]
    pub strict_schema: bool,
}

impl EngineSettings {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout)
    }

    /// Validate settings ranges.
    pub fn validate(&self) -> Result<(), CommonError> {
        if self.row_batch_event_interval == 0 {
            return Err(CommonError::configuration(
                "row_batch_event_interval must be positive",
            ));
        }
        if self.command_timeout == 0 {
            return Err(CommonError::configuration("command_timeout must be positive"));
        }
        Ok(())
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            row_batch_event_interval: default_row_batch_event_interval(),
            command_timeout: default_command_timeout(),
            array_element_fallback_to_string: default_array_element_fallback(),
            strict_schema: false,
        }
    }
}

fn default_row_batch_event_interval() -> u64 {
    5000
}

fn default_command_timeout() -> u64 {
    30
}

fn default_array_element_fallback() -> bool {
    true
}
