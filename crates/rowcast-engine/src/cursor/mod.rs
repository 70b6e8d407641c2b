//! Row cursor contract.
//!
//! A cursor is a forward-only, single-pass source of columnar rows with
//! typed accessors. Cursors stay on row N until [`RowCursor::advance`]
//! returns `true`, at which point all columns of row N+1 are readable.
//! Accessors are only called for ordinals whose column type matches and
//! whose value is not null; the compiled plan guarantees both.

pub mod arrow;
pub mod mem;

use crate::error::CursorError;
use async_trait::async_trait;
use rowcast_commons::{ColumnType, CorrelationId};
use std::time::Duration;
use uuid::Uuid;

/// One column of a cursor schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub column_type: ColumnType,
}

/// Ordinal-ordered column metadata of a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CursorSchema {
    columns: Vec<ColumnInfo>,
}

impl CursorSchema {
    pub fn new(columns: Vec<ColumnInfo>) -> Self {
        Self { columns }
    }

    /// Convenience constructor from `(name, type)` pairs in ordinal order.
    pub fn from_pairs(pairs: Vec<(&str, ColumnType)>) -> Self {
        Self {
            columns: pairs
                .into_iter()
                .map(|(name, column_type)| ColumnInfo {
                    name: name.to_string(),
                    column_type,
                })
                .collect(),
        }
    }

    pub fn field_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, ordinal: usize) -> &ColumnInfo {
        &self.columns[ordinal]
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Ordinal of the column with the given name, if present.
    pub fn ordinal_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Ordinals of all columns whose name starts with `prefix`, ascending.
    pub fn ordinals_with_prefix(&self, prefix: &str) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.name.starts_with(prefix))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Forward-only row source with typed accessors.
///
/// `advance()` is the only suspension point; the accessors read the current
/// row synchronously. Implementations release their underlying resources in
/// [`RowCursor::close`] (invoked by the driver on every exit path) and again
/// on drop as a safety net.
#[async_trait]
pub trait RowCursor: Send {
    fn schema(&self) -> &CursorSchema;

    /// Whether reads within a row must be non-decreasing by ordinal.
    /// Plans always read in ascending ordinal order, so this is advisory.
    fn sequential_access(&self) -> bool {
        false
    }

    /// Move to the next row. `Ok(false)` means the cursor is exhausted.
    async fn advance(&mut self) -> Result<bool, CursorError>;

    fn is_null(&self, ordinal: usize) -> bool;

    fn get_bool(&self, ordinal: usize) -> bool;
    fn get_i8(&self, ordinal: usize) -> i8;
    fn get_i16(&self, ordinal: usize) -> i16;
    fn get_i32(&self, ordinal: usize) -> i32;
    fn get_i64(&self, ordinal: usize) -> i64;
    fn get_u8(&self, ordinal: usize) -> u8;
    fn get_f32(&self, ordinal: usize) -> f32;
    fn get_f64(&self, ordinal: usize) -> f64;
    /// Unscaled 128-bit decimal value; the scale comes from the schema.
    fn get_decimal(&self, ordinal: usize) -> i128;
    /// Microseconds since the Unix epoch, UTC.
    fn get_timestamp(&self, ordinal: usize) -> i64;
    fn get_uuid(&self, ordinal: usize) -> Uuid;
    fn get_string(&self, ordinal: usize) -> String;
    fn get_char(&self, ordinal: usize) -> char;

    /// Untyped accessor used by the fallback codec: the value's string form.
    fn get_opaque(&self, ordinal: usize) -> String;

    /// Release the cursor and whatever connection backs it.
    async fn close(&mut self) -> Result<(), CursorError> {
        Ok(())
    }
}

/// The external executor contract: opens cursors for the engine.
///
/// Connection management, retry policy, and timeout enforcement live behind
/// this trait; the engine only forwards the per-request context.
#[async_trait]
pub trait CursorSource: Send + Sync {
    async fn open(&self, ctx: &StreamContext) -> Result<Box<dyn RowCursor>, CursorError>;
}

/// Per-request context handed to the cursor source.
#[derive(Debug, Clone)]
pub struct StreamContext {
    pub correlation_id: CorrelationId,
    pub command_timeout: Duration,
}

impl StreamContext {
    pub fn new(correlation_id: CorrelationId, command_timeout: Duration) -> Self {
        Self {
            correlation_id,
            command_timeout,
        }
    }
}
