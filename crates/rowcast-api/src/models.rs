//! Response models for the error surface.

use serde::{Deserialize, Serialize};

/// Short JSON error body returned before any stream bytes have been sent.
///
/// Once row bytes are on the wire the status can no longer change; errors
/// after that point drop the connection instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g. "SHAPE_NOT_FOUND")
    pub code: String,

    /// Human-readable error message
    pub message: String,
}

impl ErrorBody {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}
