//! Arrow record-batch cursor adapter.
//!
//! Query engines hand results back as ordered `RecordBatch`es; this adapter
//! exposes them through the [`RowCursor`] contract so the projection engine
//! never sees the columnar layout. Accessors downcast the current batch's
//! column to its concrete array type and read one value.

use super::{ColumnInfo, CursorSchema, RowCursor};
use crate::error::CursorError;
use arrow::array::{
    Array, BooleanArray, Decimal128Array, FixedSizeBinaryArray, Float32Array, Float64Array,
    Int16Array, Int32Array, Int64Array, Int8Array, LargeStringArray, StringArray,
    TimestampMicrosecondArray, TimestampMillisecondArray, TimestampNanosecondArray,
    TimestampSecondArray, UInt8Array,
};
use arrow::datatypes::{DataType, SchemaRef};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use async_trait::async_trait;
use rowcast_commons::ColumnType;
use uuid::Uuid;

/// Map an Arrow data type onto the engine's column type tag.
///
/// Anything without a dedicated codec maps to `Unsupported` and is served
/// by the fallback string codec.
pub fn column_type_from_arrow(data_type: &DataType) -> ColumnType {
    match data_type {
        DataType::Boolean => ColumnType::Boolean,
        DataType::Int8 => ColumnType::Int8,
        DataType::Int16 => ColumnType::Int16,
        DataType::Int32 => ColumnType::Int32,
        DataType::Int64 => ColumnType::Int64,
        DataType::UInt8 => ColumnType::UInt8,
        DataType::Float32 => ColumnType::Float32,
        DataType::Float64 => ColumnType::Float64,
        DataType::Decimal128(precision, scale) => ColumnType::Decimal {
            precision: *precision,
            scale: *scale,
        },
        DataType::Timestamp(_, _) => ColumnType::Timestamp,
        DataType::Utf8 | DataType::LargeUtf8 => ColumnType::Utf8,
        DataType::FixedSizeBinary(16) => ColumnType::Uuid,
        other => ColumnType::Unsupported(format!("{other:?}")),
    }
}

/// Derive a cursor schema from an Arrow schema.
pub fn cursor_schema_from_arrow(schema: &SchemaRef) -> CursorSchema {
    CursorSchema::new(
        schema
            .fields()
            .iter()
            .map(|field| ColumnInfo {
                name: field.name().clone(),
                column_type: column_type_from_arrow(field.data_type()),
            })
            .collect(),
    )
}

/// Forward-only cursor over a sequence of record batches.
pub struct RecordBatchCursor {
    schema: CursorSchema,
    batches: Vec<RecordBatch>,
    batch_index: usize,
    row: usize,
    started: bool,
}

impl RecordBatchCursor {
    pub fn new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self {
            schema: cursor_schema_from_arrow(&schema),
            batches,
            batch_index: 0,
            row: 0,
            started: false,
        }
    }

    fn column(&self, ordinal: usize) -> &dyn Array {
        self.batches[self.batch_index].column(ordinal).as_ref()
    }
}

#[async_trait]
impl RowCursor for RecordBatchCursor {
    fn schema(&self) -> &CursorSchema {
        &self.schema
    }

    async fn advance(&mut self) -> Result<bool, CursorError> {
        if self.started {
            self.row += 1;
        } else {
            self.started = true;
        }
        // Skip over exhausted and empty batches.
        while self.batch_index < self.batches.len()
            && self.row >= self.batches[self.batch_index].num_rows()
        {
            self.batch_index += 1;
            self.row = 0;
        }
        Ok(self.batch_index < self.batches.len())
    }

    fn is_null(&self, ordinal: usize) -> bool {
        self.column(ordinal).is_null(self.row)
    }

    fn get_bool(&self, ordinal: usize) -> bool {
        self.column(ordinal)
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map(|a| a.value(self.row))
            .unwrap_or_default()
    }

    fn get_i8(&self, ordinal: usize) -> i8 {
        self.column(ordinal)
            .as_any()
            .downcast_ref::<Int8Array>()
            .map(|a| a.value(self.row))
            .unwrap_or_default()
    }

    fn get_i16(&self, ordinal: usize) -> i16 {
        self.column(ordinal)
            .as_any()
            .downcast_ref::<Int16Array>()
            .map(|a| a.value(self.row))
            .unwrap_or_default()
    }

    fn get_i32(&self, ordinal: usize) -> i32 {
        self.column(ordinal)
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(self.row))
            .unwrap_or_default()
    }

    fn get_i64(&self, ordinal: usize) -> i64 {
        self.column(ordinal)
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(self.row))
            .unwrap_or_default()
    }

    fn get_u8(&self, ordinal: usize) -> u8 {
        self.column(ordinal)
            .as_any()
            .downcast_ref::<UInt8Array>()
            .map(|a| a.value(self.row))
            .unwrap_or_default()
    }

    fn get_f32(&self, ordinal: usize) -> f32 {
        self.column(ordinal)
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(self.row))
            .unwrap_or_default()
    }

    fn get_f64(&self, ordinal: usize) -> f64 {
        self.column(ordinal)
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(self.row))
            .unwrap_or_default()
    }

    fn get_decimal(&self, ordinal: usize) -> i128 {
        self.column(ordinal)
            .as_any()
            .downcast_ref::<Decimal128Array>()
            .map(|a| a.value(self.row))
            .unwrap_or_default()
    }

    fn get_timestamp(&self, ordinal: usize) -> i64 {
        let column = self.column(ordinal);
        let any = column.as_any();
        if let Some(a) = any.downcast_ref::<TimestampMicrosecondArray>() {
            a.value(self.row)
        } else if let Some(a) = any.downcast_ref::<TimestampMillisecondArray>() {
            a.value(self.row).saturating_mul(1_000)
        } else if let Some(a) = any.downcast_ref::<TimestampNanosecondArray>() {
            a.value(self.row) / 1_000
        } else if let Some(a) = any.downcast_ref::<TimestampSecondArray>() {
            a.value(self.row).saturating_mul(1_000_000)
        } else {
            0
        }
    }

    fn get_uuid(&self, ordinal: usize) -> Uuid {
        self.column(ordinal)
            .as_any()
            .downcast_ref::<FixedSizeBinaryArray>()
            .and_then(|a| Uuid::from_slice(a.value(self.row)).ok())
            .unwrap_or(Uuid::nil())
    }

    fn get_string(&self, ordinal: usize) -> String {
        let column = self.column(ordinal);
        let any = column.as_any();
        if let Some(a) = any.downcast_ref::<StringArray>() {
            a.value(self.row).to_string()
        } else if let Some(a) = any.downcast_ref::<LargeStringArray>() {
            a.value(self.row).to_string()
        } else {
            String::new()
        }
    }

    fn get_char(&self, ordinal: usize) -> char {
        self.get_string(ordinal).chars().next().unwrap_or(' ')
    }

    fn get_opaque(&self, ordinal: usize) -> String {
        array_value_to_string(self.column(ordinal), self.row).unwrap_or_default()
    }
}
