//! Structured engine events.
//!
//! The compiler, executor, and streaming driver report through an abstract
//! [`EventSink`] so the transport stays out of the engine. The default sink
//! writes key=value lines through `log` with a dedicated target; tests use
//! [`RecordingSink`] to assert on exactly what was emitted.

use crate::ids::CorrelationId;
use std::sync::Mutex;
use std::time::Duration;

/// Every event the engine can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    StreamStart,
    RowBatch,
    StreamComplete,
    StreamCanceled,
    StreamError,
    UnsupportedType,
    ColumnNotFound,
    TypeCoerced,
    EmptyArrayPattern,
    PlanCacheHit,
    PlanCacheMiss,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::StreamStart => "stream-start",
            EventCategory::RowBatch => "row-batch",
            EventCategory::StreamComplete => "stream-complete",
            EventCategory::StreamCanceled => "stream-canceled",
            EventCategory::StreamError => "stream-error",
            EventCategory::UnsupportedType => "unsupported-type",
            EventCategory::ColumnNotFound => "column-not-found",
            EventCategory::TypeCoerced => "type-coerced",
            EventCategory::EmptyArrayPattern => "empty-array-pattern",
            EventCategory::PlanCacheHit => "plan-cache-hit",
            EventCategory::PlanCacheMiss => "plan-cache-miss",
        }
    }

    /// Whether this category describes a degraded outcome worth a `warn!`.
    fn is_warning(&self) -> bool {
        matches!(
            self,
            EventCategory::StreamError
                | EventCategory::UnsupportedType
                | EventCategory::ColumnNotFound
                | EventCategory::TypeCoerced
                | EventCategory::EmptyArrayPattern
        )
    }
}

/// One structured event with the context the caller supplied.
#[derive(Debug, Clone)]
pub struct EngineEvent {
    pub category: EventCategory,
    pub correlation_id: CorrelationId,
    /// Rows emitted at the time of the event (zero for compile-time events).
    pub row_count: u64,
    /// Wall-clock time since stream start (zero for compile-time events).
    pub elapsed: Duration,
    /// Free-form context, e.g. the offending column name.
    pub detail: Option<String>,
}

impl EngineEvent {
    pub fn new(category: EventCategory, correlation_id: CorrelationId) -> Self {
        Self {
            category,
            correlation_id,
            row_count: 0,
            elapsed: Duration::ZERO,
            detail: None,
        }
    }

    pub fn with_rows(mut self, row_count: u64) -> Self {
        self.row_count = row_count;
        self
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Abstract structured-event recorder.
pub trait EventSink: Send + Sync {
    fn record(&self, event: EngineEvent);
}

/// Default sink: one key=value line per event through the `log` facade.
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn record(&self, event: EngineEvent) {
        let detail = event.detail.as_deref().unwrap_or("-");
        if event.category.is_warning() {
            log::warn!(
                target: "rowcast::engine",
                "[{}] correlation_id={} rows={} took={:.3}ms detail={}",
                event.category.as_str(),
                event.correlation_id,
                event.row_count,
                event.elapsed.as_secs_f64() * 1000.0,
                detail
            );
        } else {
            log::info!(
                target: "rowcast::engine",
                "[{}] correlation_id={} rows={} took={:.3}ms detail={}",
                event.category.as_str(),
                event.correlation_id,
                event.row_count,
                event.elapsed.as_secs_f64() * 1000.0,
                detail
            );
        }
    }
}

/// Test sink that keeps every event for later assertions.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<EngineEvent> {
        self.events.lock().expect("event sink poisoned").clone()
    }

    /// Number of recorded events in the given category.
    pub fn count(&self, category: EventCategory) -> usize {
        self.events
            .lock()
            .expect("event sink poisoned")
            .iter()
            .filter(|e| e.category == category)
            .count()
    }

    /// Last recorded event in the given category, if any.
    pub fn last(&self, category: EventCategory) -> Option<EngineEvent> {
        self.events
            .lock()
            .expect("event sink poisoned")
            .iter()
            .rev()
            .find(|e| e.category == category)
            .cloned()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: EngineEvent) {
        self.events.lock().expect("event sink poisoned").push(event);
    }
}
