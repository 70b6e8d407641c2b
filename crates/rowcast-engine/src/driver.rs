//! Streaming driver.
//!
//! Wraps the plan executor with the outer JSON array, cooperative
//! cancellation, flush policy, lifecycle events, and resource release. The
//! cursor (and whatever connection backs it) is closed on every exit path:
//! success, cursor/writer failure, and cancellation.

use crate::cursor::RowCursor;
use crate::error::{StreamError, WriterError};
use crate::executor;
use crate::json::{ByteSink, JsonWriter};
use crate::plan::SerializationPlan;
use rowcast_commons::{CorrelationId, EngineEvent, EngineSettings, EventCategory, EventSink};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Flush to the sink once this many bytes are buffered.
const FLUSH_THRESHOLD: usize = 8 * 1024;

/// Completed-stream accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub rows: u64,
    pub bytes: u64,
    pub elapsed: Duration,
}

/// Stream every cursor row through the plan into the sink as one JSON array.
///
/// The cancellation token is checked before each `advance()`. Once any row
/// bytes have been emitted, a cancelled stream is left without its closing
/// `]` so the client cannot mistake a truncated response for a complete one;
/// a cancelled stream with zero rows still closes the empty array.
pub async fn stream_rows(
    plan: &SerializationPlan,
    mut cursor: Box<dyn RowCursor>,
    sink: &mut dyn ByteSink,
    cancel: &CancellationToken,
    settings: &EngineSettings,
    events: &dyn EventSink,
    correlation: &CorrelationId,
) -> Result<StreamSummary, StreamError> {
    let start = Instant::now();
    let mut rows: u64 = 0;
    let mut bytes: u64 = 0;

    events.record(EngineEvent::new(EventCategory::StreamStart, correlation.clone()));

    let mut writer = plan.new_writer();
    let mut scratch = plan.new_slot_buffer();
    writer.begin_array();

    let outcome: Result<(), StreamError> = loop {
        if cancel.is_cancelled() {
            break Err(StreamError::Canceled { rows });
        }
        match cursor.advance().await {
            Ok(true) => {
                executor::emit_row(plan, cursor.as_ref(), &mut writer, &mut scratch);
                rows += 1;
                if rows % settings.row_batch_event_interval == 0 {
                    events.record(
                        EngineEvent::new(EventCategory::RowBatch, correlation.clone())
                            .with_rows(rows)
                            .with_elapsed(start.elapsed()),
                    );
                }
                if writer.buffered() >= FLUSH_THRESHOLD {
                    if let Err(e) = flush(&mut writer, sink, &mut bytes).await {
                        break Err(StreamError::Writer(e));
                    }
                }
            }
            Ok(false) => break Ok(()),
            Err(e) => break Err(StreamError::Cursor(e)),
        }
    };

    match outcome {
        Ok(()) => {
            writer.end_array();
            let flushed = flush(&mut writer, sink, &mut bytes).await;
            release(cursor.as_mut()).await;
            match flushed {
                Ok(()) => {
                    let elapsed = start.elapsed();
                    events.record(
                        EngineEvent::new(EventCategory::StreamComplete, correlation.clone())
                            .with_rows(rows)
                            .with_elapsed(elapsed),
                    );
                    Ok(StreamSummary { rows, bytes, elapsed })
                }
                Err(e) => {
                    events.record(
                        EngineEvent::new(EventCategory::StreamError, correlation.clone())
                            .with_rows(rows)
                            .with_elapsed(start.elapsed())
                            .with_detail(e.to_string()),
                    );
                    Err(StreamError::Writer(e))
                }
            }
        }
        Err(StreamError::Canceled { .. }) => {
            if rows == 0 {
                writer.end_array();
            }
            // Best effort: the client that cancelled is usually gone.
            let _ = flush(&mut writer, sink, &mut bytes).await;
            release(cursor.as_mut()).await;
            events.record(
                EngineEvent::new(EventCategory::StreamCanceled, correlation.clone())
                    .with_rows(rows)
                    .with_elapsed(start.elapsed()),
            );
            Err(StreamError::Canceled { rows })
        }
        Err(e) => {
            // Push out the complete rows already buffered, never the `]`.
            let _ = flush(&mut writer, sink, &mut bytes).await;
            release(cursor.as_mut()).await;
            events.record(
                EngineEvent::new(EventCategory::StreamError, correlation.clone())
                    .with_rows(rows)
                    .with_elapsed(start.elapsed())
                    .with_detail(e.to_string()),
            );
            Err(e)
        }
    }
}

async fn flush(
    writer: &mut JsonWriter,
    sink: &mut dyn ByteSink,
    bytes: &mut u64,
) -> Result<(), WriterError> {
    if writer.buffered() == 0 {
        return Ok(());
    }
    let chunk = writer.take();
    *bytes += chunk.len() as u64;
    sink.send(chunk).await
}

async fn release(cursor: &mut dyn RowCursor) {
    if let Err(e) = cursor.close().await {
        log::warn!(target: "rowcast::engine", "cursor close failed: {}", e);
    }
}
