//! Universal engine properties checked over non-trivial shapes.

mod common;

use common::run_stream;
use rowcast_commons::{ColumnType, CorrelationId, RecordingSink};
use rowcast_engine::cursor::mem::InMemoryCursor;
use rowcast_engine::cursor::CursorSchema;
use rowcast_engine::{compile, CompileOptions, ShapeDescriptor, Slot};
use tokio_util::sync::CancellationToken;

fn wide_schema() -> CursorSchema {
    CursorSchema::from_pairs(vec![
        ("Id", ColumnType::Int64),
        ("Flag", ColumnType::Boolean),
        ("Score", ColumnType::Float64),
        ("CName", ColumnType::Utf8),
        ("CCity", ColumnType::Utf8),
        ("Tag_01", ColumnType::Utf8),
        ("Tag_02", ColumnType::Utf8),
        ("Stamp", ColumnType::Timestamp),
    ])
}

fn wide_descriptor(id: &str) -> ShapeDescriptor {
    ShapeDescriptor::builder(id)
        .field("id", "Id", ColumnType::Int64)
        .object("customer", |o| {
            o.field("name", "CName", ColumnType::Utf8)
                .field("city", "CCity", ColumnType::Utf8)
        })
        .array_pattern("tags", "Tag_")
        .flatten(|f| {
            f.field("flag", "Flag", ColumnType::Boolean)
                .field("score", "Score", ColumnType::Float64)
        })
        .field("stamp", "Stamp", ColumnType::Timestamp)
        .build()
        .unwrap()
}

fn wide_rows(count: i64) -> Vec<Vec<Slot>> {
    (0..count)
        .map(|n| {
            vec![
                Slot::I64(n),
                Slot::Bool(n % 2 == 0),
                Slot::F64(n as f64 * 0.5),
                Slot::Text(format!("name-{n}")),
                if n % 3 == 0 { Slot::Null } else { Slot::Text("city".to_string()) },
                Slot::Text(format!("t{n}")),
                Slot::Null,
                Slot::Timestamp(1_609_459_200_000_000 + n),
            ]
        })
        .collect()
}

async fn stream_body(descriptor: &ShapeDescriptor, rows: Vec<Vec<Slot>>) -> String {
    let events = RecordingSink::new();
    let correlation = CorrelationId::new("props");
    let plan = compile(
        descriptor,
        &wide_schema(),
        &CompileOptions::default(),
        &events,
        &correlation,
    )
    .unwrap();
    let cursor = InMemoryCursor::new(wide_schema(), rows);
    let (result, body) = run_stream(
        &plan,
        Box::new(cursor),
        &CancellationToken::new(),
        &events,
        &correlation,
    )
    .await;
    result.unwrap();
    body
}

#[tokio::test]
async fn test_row_to_object_bijection() {
    for count in [0i64, 1, 7, 123] {
        let body = stream_body(&wide_descriptor("bijection"), wide_rows(count)).await;
        let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        let array = parsed.as_array().unwrap();
        assert_eq!(array.len(), count as usize);
        // Order preserved: ids are 0..count ascending.
        for (i, obj) in array.iter().enumerate() {
            assert_eq!(obj["id"], serde_json::json!(i));
        }
    }
}

#[tokio::test]
async fn test_plan_determinism_produces_identical_bytes() {
    let first = stream_body(&wide_descriptor("det"), wide_rows(25)).await;
    let second = stream_body(&wide_descriptor("det"), wide_rows(25)).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_reads_never_regress_ordinals() {
    let events = RecordingSink::new();
    let plan = compile(
        &wide_descriptor("ordinals"),
        &wide_schema(),
        &CompileOptions::default(),
        &events,
        &CorrelationId::new("props"),
    )
    .unwrap();

    let ordinals: Vec<usize> = plan.reads().iter().map(|r| r.ordinal).collect();
    let mut sorted = ordinals.clone();
    sorted.sort_unstable();
    assert_eq!(ordinals, sorted);
    assert_eq!(plan.reads().len(), plan.slot_count());
}

#[tokio::test]
async fn test_flatten_equivalence() {
    let schema = wide_schema();
    let nested_as_flat = ShapeDescriptor::builder("flat-a")
        .field("id", "Id", ColumnType::Int64)
        .flatten(|f| {
            f.field("name", "CName", ColumnType::Utf8)
                .field("city", "CCity", ColumnType::Utf8)
        })
        .build()
        .unwrap();
    let inlined = ShapeDescriptor::builder("flat-b")
        .field("id", "Id", ColumnType::Int64)
        .field("name", "CName", ColumnType::Utf8)
        .field("city", "CCity", ColumnType::Utf8)
        .build()
        .unwrap();

    let events = RecordingSink::new();
    let correlation = CorrelationId::new("flatten");
    let options = CompileOptions::default();
    let plan_a = compile(&nested_as_flat, &schema, &options, &events, &correlation).unwrap();
    let plan_b = compile(&inlined, &schema, &options, &events, &correlation).unwrap();

    let rows = wide_rows(9);
    let (res_a, body_a) = run_stream(
        &plan_a,
        Box::new(InMemoryCursor::new(schema.clone(), rows.clone())),
        &CancellationToken::new(),
        &events,
        &correlation,
    )
    .await;
    let (res_b, body_b) = run_stream(
        &plan_b,
        Box::new(InMemoryCursor::new(schema, rows)),
        &CancellationToken::new(),
        &events,
        &correlation,
    )
    .await;

    res_a.unwrap();
    res_b.unwrap();
    assert_eq!(body_a, body_b);
}

#[tokio::test]
async fn test_array_pattern_elements_follow_ordinal_order() {
    // Tag columns deliberately interleaved with others in the schema.
    let schema = CursorSchema::from_pairs(vec![
        ("Tag_03", ColumnType::Utf8),
        ("Id", ColumnType::Int64),
        ("Tag_01", ColumnType::Utf8),
        ("Tag_02", ColumnType::Utf8),
    ]);
    let descriptor = ShapeDescriptor::builder("order")
        .field("id", "Id", ColumnType::Int64)
        .array_pattern("tags", "Tag_")
        .build()
        .unwrap();

    let events = RecordingSink::new();
    let correlation = CorrelationId::new("order");
    let plan = compile(
        &descriptor,
        &schema,
        &CompileOptions::default(),
        &events,
        &correlation,
    )
    .unwrap();

    let cursor = InMemoryCursor::new(
        schema,
        vec![vec![
            Slot::Text("third".to_string()),
            Slot::I64(1),
            Slot::Text("first".to_string()),
            Slot::Text("second".to_string()),
        ]],
    );
    let (result, body) = run_stream(
        &plan,
        Box::new(cursor),
        &CancellationToken::new(),
        &events,
        &correlation,
    )
    .await;

    result.unwrap();
    // Ordinal order of the matched columns, not name order.
    assert_eq!(body, r#"[{"id":1,"tags":["third","first","second"]}]"#);
}

#[tokio::test]
async fn test_nulls_become_json_null_in_fields_and_arrays() {
    let body = stream_body(&wide_descriptor("nulls"), wide_rows(3)).await;
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();

    // Row 0: CCity is null (0 % 3 == 0); Tag_02 is always null.
    assert!(parsed[0]["customer"]["city"].is_null());
    for obj in parsed.as_array().unwrap() {
        let tags = obj["tags"].as_array().unwrap();
        assert_eq!(tags.len(), 2);
        assert!(tags[1].is_null());
    }
}

#[tokio::test]
async fn test_timestamps_render_iso_8601_utc() {
    let body = stream_body(&wide_descriptor("stamps"), wide_rows(1)).await;
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed[0]["stamp"], "2021-01-01T00:00:00.000000Z");
}
