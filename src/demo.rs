//! Development seed shape.
//!
//! Registers a sample document-metadata stream (patterned `Tag_NN` and
//! `Comment_NN` column groups included) so the server streams end-to-end
//! out of the box. Purely illustrative; production deployments register
//! shapes against their own cursor sources.

use rowcast_commons::ColumnType;
use rowcast_engine::cursor::mem::InMemoryCursorSource;
use rowcast_engine::cursor::CursorSchema;
use rowcast_engine::error::DescriptorError;
use rowcast_engine::{ShapeDescriptor, Slot};
use uuid::Uuid;

// 2024-03-01T09:30:00Z in epoch microseconds.
const SEED_BASE_MICROS: i64 = 1_709_285_400_000_000;

const DECIMAL_AMOUNT: ColumnType = ColumnType::Decimal {
    precision: 18,
    scale: 2,
};

pub fn documents_descriptor() -> Result<ShapeDescriptor, DescriptorError> {
    ShapeDescriptor::builder("documents")
        .field("id", "Id", ColumnType::Int64)
        .field("fileName", "FileName", ColumnType::Utf8)
        .field("documentId", "DocumentId", ColumnType::Uuid)
        .object("loan", |o| {
            o.field("borrower", "Borrower", ColumnType::Utf8)
                .field("amount", "Amount", DECIMAL_AMOUNT)
                .field("funded", "Funded", ColumnType::Boolean)
        })
        .field("createdAt", "CreatedAt", ColumnType::Timestamp)
        .array_pattern("tags", "Tag_")
        .array_pattern("comments", "Comment_")
        .build()
}

pub fn documents_source() -> InMemoryCursorSource {
    let schema = CursorSchema::from_pairs(vec![
        ("Id", ColumnType::Int64),
        ("FileName", ColumnType::Utf8),
        ("DocumentId", ColumnType::Uuid),
        ("Borrower", ColumnType::Utf8),
        ("Amount", DECIMAL_AMOUNT),
        ("Funded", ColumnType::Boolean),
        ("CreatedAt", ColumnType::Timestamp),
        ("Tag_01", ColumnType::Utf8),
        ("Tag_02", ColumnType::Utf8),
        ("Tag_03", ColumnType::Utf8),
        ("Comment_01", ColumnType::Utf8),
        ("Comment_02", ColumnType::Utf8),
    ]);

    let rows = vec![
        document_row(
            1,
            "closing-disclosure.pdf",
            Uuid::from_u128(0x11111111_2222_3333_4444_555555555555),
            "Ada Lovelace",
            412_500_00,
            true,
            0,
            [Some("refinance"), Some("primary"), None],
            [Some("Reviewed by underwriting"), None],
        ),
        document_row(
            2,
            "appraisal-report.pdf",
            Uuid::from_u128(0x66666666_7777_8888_9999_aaaaaaaaaaaa),
            "Grace Hopper",
            287_900_00,
            false,
            86_400_000_000,
            [Some("purchase"), None, Some("jumbo")],
            [None, Some("Pending borrower signature")],
        ),
        document_row(
            3,
            "title-commitment.pdf",
            Uuid::from_u128(0xbbbbbbbb_cccc_dddd_eeee_ffffffffffff),
            "Katherine Johnson",
            150_000_00,
            true,
            172_800_000_000,
            [None, None, None],
            [Some("Cleared to close"), Some("Final")],
        ),
    ];

    InMemoryCursorSource::new(schema, rows)
}

#[allow(clippy::too_many_arguments)]
fn document_row(
    id: i64,
    file_name: &str,
    document_id: Uuid,
    borrower: &str,
    amount_cents: i128,
    funded: bool,
    created_offset_micros: i64,
    tags: [Option<&str>; 3],
    comments: [Option<&str>; 2],
) -> Vec<Slot> {
    let mut row = vec![
        Slot::I64(id),
        Slot::Text(file_name.to_string()),
        Slot::Uuid(document_id),
        Slot::Text(borrower.to_string()),
        Slot::Decimal {
            unscaled: amount_cents,
            scale: 2,
        },
        Slot::Bool(funded),
        Slot::Timestamp(SEED_BASE_MICROS + created_offset_micros),
    ];
    row.extend(tags.iter().map(|tag| match tag {
        Some(text) => Slot::Text(text.to_string()),
        None => Slot::Null,
    }));
    row.extend(comments.iter().map(|comment| match comment {
        Some(text) => Slot::Text(text.to_string()),
        None => Slot::Null,
    }));
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_descriptor_is_valid() {
        assert!(documents_descriptor().is_ok());
    }

    #[test]
    fn test_seed_rows_match_schema_width() {
        let source = documents_source();
        assert_eq!(source.schema().field_count(), 12);
    }
}
