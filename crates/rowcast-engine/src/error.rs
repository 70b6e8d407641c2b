//! Engine error taxonomy.
//!
//! The compiler returns [`CompileError`] synchronously and never fails during
//! execution; the executor and driver surface [`CursorError`] and
//! [`WriterError`] without recovering. Cancellation is a clean terminal
//! carried by [`StreamError::Canceled`].

use thiserror::Error;

/// Malformed shape descriptor, rejected at ingestion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("shape '{shape}' has no fields")]
    EmptyShape { shape: String },

    #[error("field in shape '{shape}' has an empty JSON name")]
    EmptyJsonName { shape: String },

    #[error("field '{field}' in shape '{shape}' has an empty column name")]
    EmptyColumnName { shape: String, field: String },

    #[error("array pattern '{field}' in shape '{shape}' has an empty prefix")]
    EmptyPrefix { shape: String, field: String },
}

/// Descriptor-to-plan compilation failure.
///
/// In non-strict mode schema mismatches degrade to omitted fields plus an
/// event, so the only compile failures are descriptor problems; strict mode
/// elevates mismatches to the variants below.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error("column '{column}' referenced by field '{field}' not found in cursor schema")]
    ColumnNotFound { field: String, column: String },

    #[error("column '{column}' has unsupported type {type_name} in strict mode")]
    UnsupportedType { column: String, type_name: String },
}

/// Failure reported by the row cursor or its source.
#[derive(Error, Debug, Clone)]
pub enum CursorError {
    #[error("failed to open cursor: {0}")]
    Open(String),

    #[error("cursor read failed: {0}")]
    Read(String),

    #[error("cursor already closed")]
    Closed,
}

/// Downstream write failure; terminates the stream.
#[derive(Error, Debug, Clone)]
pub enum WriterError {
    #[error("downstream writer closed")]
    Closed,

    #[error("write failed: {0}")]
    Io(String),
}

/// Terminal outcome of a stream that did not complete.
#[derive(Error, Debug, Clone)]
pub enum StreamError {
    #[error("stream canceled after {rows} rows")]
    Canceled { rows: u64 },

    #[error(transparent)]
    Cursor(#[from] CursorError),

    #[error(transparent)]
    Writer(#[from] WriterError),
}

impl StreamError {
    pub fn is_canceled(&self) -> bool {
        matches!(self, StreamError::Canceled { .. })
    }
}
