//! Shared fixtures for the engine integration suites.
#![allow(dead_code)]

use async_trait::async_trait;
use rowcast_commons::{CorrelationId, EngineSettings, RecordingSink};
use rowcast_engine::cursor::mem::InMemoryCursor;
use rowcast_engine::cursor::{CursorSchema, RowCursor};
use rowcast_engine::error::{CursorError, StreamError};
use rowcast_engine::json::BufferSink;
use rowcast_engine::{stream_rows, SerializationPlan, StreamSummary};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Cursor wrapper that reports closure and can trip a cancellation token
/// after a given number of delivered rows.
pub struct TrackedCursor {
    inner: InMemoryCursor,
    delivered: usize,
    cancel_after: Option<(CancellationToken, usize)>,
    closed: Arc<AtomicBool>,
}

impl TrackedCursor {
    pub fn new(inner: InMemoryCursor) -> (Self, Arc<AtomicBool>) {
        let closed = Arc::new(AtomicBool::new(false));
        (
            Self {
                inner,
                delivered: 0,
                cancel_after: None,
                closed: closed.clone(),
            },
            closed,
        )
    }

    /// Cancel `token` once `rows` rows have been delivered.
    pub fn cancel_after(mut self, token: CancellationToken, rows: usize) -> Self {
        self.cancel_after = Some((token, rows));
        self
    }
}

#[async_trait]
impl RowCursor for TrackedCursor {
    fn schema(&self) -> &CursorSchema {
        self.inner.schema()
    }

    async fn advance(&mut self) -> Result<bool, CursorError> {
        let advanced = self.inner.advance().await?;
        if advanced {
            self.delivered += 1;
            if let Some((token, rows)) = &self.cancel_after {
                if self.delivered == *rows {
                    token.cancel();
                }
            }
        }
        Ok(advanced)
    }

    fn is_null(&self, ordinal: usize) -> bool {
        self.inner.is_null(ordinal)
    }

    fn get_bool(&self, ordinal: usize) -> bool {
        self.inner.get_bool(ordinal)
    }

    fn get_i8(&self, ordinal: usize) -> i8 {
        self.inner.get_i8(ordinal)
    }

    fn get_i16(&self, ordinal: usize) -> i16 {
        self.inner.get_i16(ordinal)
    }

    fn get_i32(&self, ordinal: usize) -> i32 {
        self.inner.get_i32(ordinal)
    }

    fn get_i64(&self, ordinal: usize) -> i64 {
        self.inner.get_i64(ordinal)
    }

    fn get_u8(&self, ordinal: usize) -> u8 {
        self.inner.get_u8(ordinal)
    }

    fn get_f32(&self, ordinal: usize) -> f32 {
        self.inner.get_f32(ordinal)
    }

    fn get_f64(&self, ordinal: usize) -> f64 {
        self.inner.get_f64(ordinal)
    }

    fn get_decimal(&self, ordinal: usize) -> i128 {
        self.inner.get_decimal(ordinal)
    }

    fn get_timestamp(&self, ordinal: usize) -> i64 {
        self.inner.get_timestamp(ordinal)
    }

    fn get_uuid(&self, ordinal: usize) -> Uuid {
        self.inner.get_uuid(ordinal)
    }

    fn get_string(&self, ordinal: usize) -> String {
        self.inner.get_string(ordinal)
    }

    fn get_char(&self, ordinal: usize) -> char {
        self.inner.get_char(ordinal)
    }

    fn get_opaque(&self, ordinal: usize) -> String {
        self.inner.get_opaque(ordinal)
    }

    async fn close(&mut self) -> Result<(), CursorError> {
        self.closed.store(true, Ordering::SeqCst);
        self.inner.close().await
    }
}

/// Run a full stream over the given cursor and return the produced body.
pub async fn run_stream(
    plan: &SerializationPlan,
    cursor: Box<dyn RowCursor>,
    cancel: &CancellationToken,
    events: &RecordingSink,
    correlation: &CorrelationId,
) -> (Result<StreamSummary, StreamError>, String) {
    let mut sink = BufferSink::new();
    let settings = EngineSettings::default();
    let result = stream_rows(plan, cursor, &mut sink, cancel, &settings, events, correlation).await;
    (result, sink.into_string())
}
