//! Streaming projection handler for `GET /v1/api/streams/{shape}`.
//!
//! The handler opens a cursor, fetches (or compiles) the plan, and spawns
//! the engine's streaming driver against a bounded channel whose receiver
//! backs the response body. Client disconnects drop the body stream, which
//! trips the cancellation token through a drop guard; channel backpressure
//! stalls the driver's flushes, which stalls the read loop.

use crate::models::ErrorBody;
use crate::registry::ShapeRegistry;
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream;
use rowcast_commons::{CorrelationId, EngineSettings, EventSink};
use rowcast_engine::cursor::StreamContext;
use rowcast_engine::error::{StreamError, WriterError};
use rowcast_engine::json::ByteSink;
use rowcast_engine::{stream_rows, CompileOptions, PlanCache};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const CORRELATION_HEADER: &str = "X-Correlation-Id";
const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// Chunks in flight between the driver and the response body. Small on
/// purpose: a slow client must stall the cursor read loop, not queue.
const BODY_CHANNEL_CAPACITY: usize = 8;

/// Sink half of the body channel.
struct ChannelSink {
    tx: mpsc::Sender<Result<Bytes, StreamError>>,
}

#[async_trait]
impl ByteSink for ChannelSink {
    async fn send(&mut self, chunk: Bytes) -> Result<(), WriterError> {
        // A dropped receiver means the client went away.
        self.tx.send(Ok(chunk)).await.map_err(|_| WriterError::Closed)
    }
}

fn correlation_from(req: &HttpRequest) -> CorrelationId {
    req.headers()
        .get(CORRELATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(CorrelationId::from)
        .unwrap_or_else(CorrelationId::generate)
}

/// GET /v1/api/streams/{shape} - stream every row of the shape's query as a
/// JSON array
///
/// Responds `200` with `application/json` and starts streaming; errors after
/// the first body bytes terminate the connection without a closing `]`. The
/// `X-Correlation-Id` request header (optional) is echoed on the response.
#[get("/streams/{shape}")]
pub async fn stream_shape(
    req: HttpRequest,
    path: web::Path<String>,
    registry: web::Data<Arc<ShapeRegistry>>,
    plan_cache: web::Data<Arc<PlanCache>>,
    settings: web::Data<EngineSettings>,
    events: web::Data<Arc<dyn EventSink>>,
) -> impl Responder {
    let shape_name = path.into_inner();
    let correlation = correlation_from(&req);

    let Some(registration) = registry.get(&shape_name) else {
        return HttpResponse::NotFound()
            .insert_header((CORRELATION_HEADER, correlation.to_string()))
            .json(ErrorBody::new(
                "SHAPE_NOT_FOUND",
                format!("No stream registered for shape '{}'", shape_name),
            ));
    };

    let ctx = StreamContext::new(correlation.clone(), settings.command_timeout());
    let cursor = match registration.source.open(&ctx).await {
        Ok(cursor) => cursor,
        Err(e) => {
            log::warn!(
                target: "rowcast::api",
                "Cursor open failed: shape='{}' correlation_id={} error={}",
                shape_name,
                correlation,
                e
            );
            return HttpResponse::ServiceUnavailable()
                .insert_header((CORRELATION_HEADER, correlation.to_string()))
                .json(ErrorBody::new("CURSOR_OPEN_FAILED", e.to_string()));
        }
    };

    let options = CompileOptions::from_settings(&settings);
    let plan = match plan_cache.get_or_compile(
        &registration.descriptor,
        cursor.schema(),
        &options,
        events.get_ref().as_ref(),
        &correlation,
    ) {
        Ok(plan) => plan,
        Err(e) => {
            log::error!(
                target: "rowcast::api",
                "Plan compilation failed: shape='{}' correlation_id={} error={}",
                shape_name,
                correlation,
                e
            );
            return HttpResponse::InternalServerError()
                .insert_header((CORRELATION_HEADER, correlation.to_string()))
                .json(ErrorBody::new("PLAN_COMPILE_FAILED", e.to_string()));
        }
    };

    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::channel::<Result<Bytes, StreamError>>(BODY_CHANNEL_CAPACITY);

    {
        let cancel = cancel.clone();
        let settings = settings.get_ref().clone();
        let events = events.get_ref().clone();
        let correlation = correlation.clone();
        let shape_name = shape_name.clone();
        tokio::spawn(async move {
            let mut sink = ChannelSink { tx: tx.clone() };
            match stream_rows(
                &plan,
                cursor,
                &mut sink,
                &cancel,
                &settings,
                events.as_ref(),
                &correlation,
            )
            .await
            {
                Ok(summary) => log::info!(
                    target: "rowcast::api",
                    "Stream complete: shape='{}' rows={} bytes={} took={:.3}ms correlation_id={}",
                    shape_name,
                    summary.rows,
                    summary.bytes,
                    summary.elapsed.as_secs_f64() * 1000.0,
                    correlation
                ),
                Err(e) if e.is_canceled() => log::info!(
                    target: "rowcast::api",
                    "Stream canceled: shape='{}' correlation_id={} ({})",
                    shape_name,
                    correlation,
                    e
                ),
                Err(e) => {
                    log::warn!(
                        target: "rowcast::api",
                        "Stream failed: shape='{}' correlation_id={} error={}",
                        shape_name,
                        correlation,
                        e
                    );
                    // Abort the connection; the client detects truncation
                    // through the missing closing bracket.
                    let _ = tx.send(Err(e)).await;
                }
            }
        });
    }

    // Dropping the body (client disconnect) cancels the driver.
    let guard = cancel.drop_guard();
    let body = stream::unfold((rx, guard), |(mut rx, guard)| async move {
        rx.recv().await.map(|item| (item, (rx, guard)))
    });

    HttpResponse::Ok()
        .content_type(CONTENT_TYPE_JSON)
        .insert_header((CORRELATION_HEADER, correlation.to_string()))
        .streaming(body)
}
