//! In-memory cursor over pre-built rows.
//!
//! Used by the test suites and as the development seed source; rows are
//! vectors of [`Slot`]s in schema ordinal order.

use super::{CursorSchema, CursorSource, RowCursor, StreamContext};
use crate::error::CursorError;
use crate::slot::Slot;
use async_trait::async_trait;
use uuid::Uuid;

/// Forward-only cursor over an owned row list.
pub struct InMemoryCursor {
    schema: CursorSchema,
    rows: Vec<Vec<Slot>>,
    /// Index of the current row; `None` before the first `advance()`.
    position: Option<usize>,
    /// Fail the advance that would reach this row index (error-path tests).
    fail_at_row: Option<usize>,
    closed: bool,
}

impl InMemoryCursor {
    pub fn new(schema: CursorSchema, rows: Vec<Vec<Slot>>) -> Self {
        Self {
            schema,
            rows,
            position: None,
            fail_at_row: None,
            closed: false,
        }
    }

    /// Make the advance onto row `row` (zero-based) return an error.
    pub fn failing_at_row(mut self, row: usize) -> Self {
        self.fail_at_row = Some(row);
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn current(&self, ordinal: usize) -> &Slot {
        let row = self.position.expect("cursor read before advance");
        &self.rows[row][ordinal]
    }
}

#[async_trait]
impl RowCursor for InMemoryCursor {
    fn schema(&self) -> &CursorSchema {
        &self.schema
    }

    async fn advance(&mut self) -> Result<bool, CursorError> {
        if self.closed {
            return Err(CursorError::Closed);
        }
        let next = self.position.map(|p| p + 1).unwrap_or(0);
        if self.fail_at_row == Some(next) {
            return Err(CursorError::Read(format!("injected failure at row {}", next)));
        }
        if next < self.rows.len() {
            self.position = Some(next);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn is_null(&self, ordinal: usize) -> bool {
        self.current(ordinal).is_null()
    }

    fn get_bool(&self, ordinal: usize) -> bool {
        matches!(self.current(ordinal), Slot::Bool(v) if *v)
    }

    fn get_i8(&self, ordinal: usize) -> i8 {
        match self.current(ordinal) {
            Slot::I8(v) => *v,
            _ => 0,
        }
    }

    fn get_i16(&self, ordinal: usize) -> i16 {
        match self.current(ordinal) {
            Slot::I16(v) => *v,
            _ => 0,
        }
    }

    fn get_i32(&self, ordinal: usize) -> i32 {
        match self.current(ordinal) {
            Slot::I32(v) => *v,
            _ => 0,
        }
    }

    fn get_i64(&self, ordinal: usize) -> i64 {
        match self.current(ordinal) {
            Slot::I64(v) => *v,
            _ => 0,
        }
    }

    fn get_u8(&self, ordinal: usize) -> u8 {
        match self.current(ordinal) {
            Slot::U8(v) => *v,
            _ => 0,
        }
    }

    fn get_f32(&self, ordinal: usize) -> f32 {
        match self.current(ordinal) {
            Slot::F32(v) => *v,
            _ => 0.0,
        }
    }

    fn get_f64(&self, ordinal: usize) -> f64 {
        match self.current(ordinal) {
            Slot::F64(v) => *v,
            _ => 0.0,
        }
    }

    fn get_decimal(&self, ordinal: usize) -> i128 {
        match self.current(ordinal) {
            Slot::Decimal { unscaled, .. } => *unscaled,
            _ => 0,
        }
    }

    fn get_timestamp(&self, ordinal: usize) -> i64 {
        match self.current(ordinal) {
            Slot::Timestamp(v) => *v,
            _ => 0,
        }
    }

    fn get_uuid(&self, ordinal: usize) -> Uuid {
        match self.current(ordinal) {
            Slot::Uuid(v) => *v,
            _ => Uuid::nil(),
        }
    }

    fn get_string(&self, ordinal: usize) -> String {
        match self.current(ordinal) {
            Slot::Text(v) => v.clone(),
            _ => String::new(),
        }
    }

    fn get_char(&self, ordinal: usize) -> char {
        match self.current(ordinal) {
            Slot::Char(v) => *v,
            _ => ' ',
        }
    }

    fn get_opaque(&self, ordinal: usize) -> String {
        match self.current(ordinal) {
            Slot::Text(v) | Slot::Opaque(v) => v.clone(),
            Slot::Bool(v) => v.to_string(),
            Slot::I8(v) => v.to_string(),
            Slot::I16(v) => v.to_string(),
            Slot::I32(v) => v.to_string(),
            Slot::I64(v) => v.to_string(),
            Slot::U8(v) => v.to_string(),
            Slot::F32(v) => v.to_string(),
            Slot::F64(v) => v.to_string(),
            Slot::Uuid(v) => v.to_string(),
            Slot::Char(v) => v.to_string(),
            Slot::Timestamp(v) => v.to_string(),
            Slot::Decimal { unscaled, .. } => unscaled.to_string(),
            Slot::Null => String::new(),
        }
    }

    async fn close(&mut self) -> Result<(), CursorError> {
        self.closed = true;
        Ok(())
    }
}

/// Cursor source serving a fixed row set; each open clones the rows into a
/// fresh cursor.
pub struct InMemoryCursorSource {
    schema: CursorSchema,
    rows: Vec<Vec<Slot>>,
}

impl InMemoryCursorSource {
    pub fn new(schema: CursorSchema, rows: Vec<Vec<Slot>>) -> Self {
        Self { schema, rows }
    }

    pub fn schema(&self) -> &CursorSchema {
        &self.schema
    }
}

#[async_trait]
impl CursorSource for InMemoryCursorSource {
    async fn open(&self, _ctx: &StreamContext) -> Result<Box<dyn RowCursor>, CursorError> {
        Ok(Box::new(InMemoryCursor::new(
            self.schema.clone(),
            self.rows.clone(),
        )))
    }
}
