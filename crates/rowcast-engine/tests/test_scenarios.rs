//! End-to-end streaming scenarios with literal expected bodies.

mod common;

use common::{run_stream, TrackedCursor};
use rowcast_commons::{ColumnType, CorrelationId, EventCategory, RecordingSink};
use rowcast_engine::cursor::mem::InMemoryCursor;
use rowcast_engine::cursor::CursorSchema;
use rowcast_engine::{compile, CompileOptions, ShapeDescriptor, Slot};
use tokio_util::sync::CancellationToken;

fn compile_plan(
    descriptor: &ShapeDescriptor,
    schema: &CursorSchema,
    sink: &RecordingSink,
) -> rowcast_engine::SerializationPlan {
    compile(
        descriptor,
        schema,
        &CompileOptions::default(),
        sink,
        &CorrelationId::new("scenario"),
    )
    .unwrap()
}

#[tokio::test]
async fn test_primitives_only() {
    let schema = CursorSchema::from_pairs(vec![
        ("Id", ColumnType::Int64),
        ("Name", ColumnType::Utf8),
        ("Price", ColumnType::Decimal { precision: 18, scale: 2 }),
    ]);
    let descriptor = ShapeDescriptor::builder("products")
        .field("id", "Id", ColumnType::Int64)
        .field("name", "Name", ColumnType::Utf8)
        .field("price", "Price", ColumnType::Decimal { precision: 18, scale: 2 })
        .build()
        .unwrap();

    let events = RecordingSink::new();
    let plan = compile_plan(&descriptor, &schema, &events);
    let cursor = InMemoryCursor::new(
        schema,
        vec![
            vec![
                Slot::I64(7),
                Slot::Text("Widget".to_string()),
                Slot::Decimal { unscaled: 1995, scale: 2 },
            ],
            vec![Slot::I64(8), Slot::Null, Slot::Decimal { unscaled: 0, scale: 2 }],
        ],
    );

    let (result, body) = run_stream(
        &plan,
        Box::new(cursor),
        &CancellationToken::new(),
        &events,
        &CorrelationId::new("scenario-a"),
    )
    .await;

    assert_eq!(result.unwrap().rows, 2);
    assert_eq!(
        body,
        r#"[{"id":7,"name":"Widget","price":19.95},{"id":8,"name":null,"price":0}]"#
    );
}

#[tokio::test]
async fn test_nested_object() {
    let schema = CursorSchema::from_pairs(vec![
        ("Id", ColumnType::Int64),
        ("CName", ColumnType::Utf8),
        ("CCity", ColumnType::Utf8),
    ]);
    let descriptor = ShapeDescriptor::builder("orders")
        .field("id", "Id", ColumnType::Int64)
        .object("customer", |o| {
            o.field("name", "CName", ColumnType::Utf8)
                .field("city", "CCity", ColumnType::Utf8)
        })
        .build()
        .unwrap();

    let events = RecordingSink::new();
    let plan = compile_plan(&descriptor, &schema, &events);
    let cursor = InMemoryCursor::new(
        schema,
        vec![vec![
            Slot::I64(1),
            Slot::Text("Ada".to_string()),
            Slot::Text("Paris".to_string()),
        ]],
    );

    let (result, body) = run_stream(
        &plan,
        Box::new(cursor),
        &CancellationToken::new(),
        &events,
        &CorrelationId::new("scenario-b"),
    )
    .await;

    assert_eq!(result.unwrap().rows, 1);
    assert_eq!(body, r#"[{"id":1,"customer":{"name":"Ada","city":"Paris"}}]"#);
}

#[tokio::test]
async fn test_flattened_object() {
    let schema = CursorSchema::from_pairs(vec![
        ("Id", ColumnType::Int64),
        ("CName", ColumnType::Utf8),
        ("CCity", ColumnType::Utf8),
    ]);
    let descriptor = ShapeDescriptor::builder("orders-flat")
        .field("id", "Id", ColumnType::Int64)
        .flatten(|f| {
            f.field("name", "CName", ColumnType::Utf8)
                .field("city", "CCity", ColumnType::Utf8)
        })
        .build()
        .unwrap();

    let events = RecordingSink::new();
    let plan = compile_plan(&descriptor, &schema, &events);
    let cursor = InMemoryCursor::new(
        schema,
        vec![vec![
            Slot::I64(1),
            Slot::Text("Ada".to_string()),
            Slot::Text("Paris".to_string()),
        ]],
    );

    let (result, body) = run_stream(
        &plan,
        Box::new(cursor),
        &CancellationToken::new(),
        &events,
        &CorrelationId::new("scenario-c"),
    )
    .await;

    assert_eq!(result.unwrap().rows, 1);
    assert_eq!(body, r#"[{"id":1,"name":"Ada","city":"Paris"}]"#);
}

#[tokio::test]
async fn test_array_pattern() {
    let schema = CursorSchema::from_pairs(vec![
        ("Id", ColumnType::Int64),
        ("Tag_01", ColumnType::Utf8),
        ("Tag_02", ColumnType::Utf8),
        ("Tag_03", ColumnType::Utf8),
    ]);
    let descriptor = ShapeDescriptor::builder("tagged")
        .field("id", "Id", ColumnType::Int64)
        .array_pattern("tags", "Tag_")
        .build()
        .unwrap();

    let events = RecordingSink::new();
    let plan = compile_plan(&descriptor, &schema, &events);
    let cursor = InMemoryCursor::new(
        schema,
        vec![vec![
            Slot::I64(42),
            Slot::Text("red".to_string()),
            Slot::Null,
            Slot::Text("blue".to_string()),
        ]],
    );

    let (result, body) = run_stream(
        &plan,
        Box::new(cursor),
        &CancellationToken::new(),
        &events,
        &CorrelationId::new("scenario-d"),
    )
    .await;

    assert_eq!(result.unwrap().rows, 1);
    assert_eq!(body, r#"[{"id":42,"tags":["red",null,"blue"]}]"#);
}

#[tokio::test]
async fn test_missing_column_is_omitted_everywhere() {
    let schema = CursorSchema::from_pairs(vec![("Id", ColumnType::Int64)]);
    let descriptor = ShapeDescriptor::builder("partial")
        .field("id", "Id", ColumnType::Int64)
        .field("gone", "Missing", ColumnType::Utf8)
        .build()
        .unwrap();

    let events = RecordingSink::new();
    let plan = compile_plan(&descriptor, &schema, &events);
    assert_eq!(events.count(EventCategory::ColumnNotFound), 1);

    let cursor = InMemoryCursor::new(schema, vec![vec![Slot::I64(1)], vec![Slot::I64(2)]]);
    let (result, body) = run_stream(
        &plan,
        Box::new(cursor),
        &CancellationToken::new(),
        &events,
        &CorrelationId::new("scenario-e"),
    )
    .await;

    assert_eq!(result.unwrap().rows, 2);
    assert_eq!(body, r#"[{"id":1},{"id":2}]"#);
    // The event fired at compile time only; streaming added none.
    assert_eq!(events.count(EventCategory::ColumnNotFound), 1);
}

#[tokio::test]
async fn test_cancellation_mid_stream_leaves_array_open() {
    let schema = CursorSchema::from_pairs(vec![("N", ColumnType::Int64)]);
    let descriptor = ShapeDescriptor::builder("numbers")
        .field("n", "N", ColumnType::Int64)
        .build()
        .unwrap();

    let events = RecordingSink::new();
    let plan = compile_plan(&descriptor, &schema, &events);

    let rows: Vec<Vec<Slot>> = (1..=10).map(|n| vec![Slot::I64(n)]).collect();
    let cancel = CancellationToken::new();
    let (cursor, closed) = TrackedCursor::new(InMemoryCursor::new(schema, rows));
    let cursor = cursor.cancel_after(cancel.clone(), 3);

    let (result, body) = run_stream(
        &plan,
        Box::new(cursor),
        &cancel,
        &events,
        &CorrelationId::new("scenario-f"),
    )
    .await;

    let err = result.unwrap_err();
    assert!(err.is_canceled());
    assert_eq!(body, r#"[{"n":1},{"n":2},{"n":3}"#);
    assert!(!body.ends_with(']'));

    let event = events.last(EventCategory::StreamCanceled).unwrap();
    assert_eq!(event.row_count, 3);
    assert!(closed.load(std::sync::atomic::Ordering::SeqCst));
}

#[tokio::test]
async fn test_cancellation_before_first_row_closes_empty_array() {
    let schema = CursorSchema::from_pairs(vec![("N", ColumnType::Int64)]);
    let descriptor = ShapeDescriptor::builder("numbers")
        .field("n", "N", ColumnType::Int64)
        .build()
        .unwrap();

    let events = RecordingSink::new();
    let plan = compile_plan(&descriptor, &schema, &events);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let (cursor, closed) =
        TrackedCursor::new(InMemoryCursor::new(schema, vec![vec![Slot::I64(1)]]));
    let (result, body) = run_stream(
        &plan,
        Box::new(cursor),
        &cancel,
        &events,
        &CorrelationId::new("scenario-f2"),
    )
    .await;

    assert!(result.unwrap_err().is_canceled());
    // Zero rows on the wire: closing the empty array is safe.
    assert_eq!(body, "[]");
    assert!(closed.load(std::sync::atomic::Ordering::SeqCst));
}

#[tokio::test]
async fn test_cursor_error_releases_and_reports() {
    let schema = CursorSchema::from_pairs(vec![("N", ColumnType::Int64)]);
    let descriptor = ShapeDescriptor::builder("numbers")
        .field("n", "N", ColumnType::Int64)
        .build()
        .unwrap();

    let events = RecordingSink::new();
    let plan = compile_plan(&descriptor, &schema, &events);

    let inner = InMemoryCursor::new(
        schema,
        vec![vec![Slot::I64(1)], vec![Slot::I64(2)], vec![Slot::I64(3)]],
    )
    .failing_at_row(2);
    let (cursor, closed) = TrackedCursor::new(inner);

    let (result, body) = run_stream(
        &plan,
        Box::new(cursor),
        &CancellationToken::new(),
        &events,
        &CorrelationId::new("scenario-err"),
    )
    .await;

    assert!(matches!(
        result.unwrap_err(),
        rowcast_engine::StreamError::Cursor(_)
    ));
    // Complete rows were flushed; the array is left open.
    assert_eq!(body, r#"[{"n":1},{"n":2}"#);
    let event = events.last(EventCategory::StreamError).unwrap();
    assert_eq!(event.row_count, 2);
    assert!(closed.load(std::sync::atomic::Ordering::SeqCst));
}
