//! Value codec table.
//!
//! One `(read, write)` function-pointer pair per supported primitive type.
//! Readers pull a value from the cursor into a [`Slot`] (null marker when
//! the column is null); writers emit the slot with the correct JSON kind.
//! Dispatch is a bounded match over the column-type tag, selected once at
//! plan compile time; nothing is looked up per row.

use crate::cursor::RowCursor;
use crate::json::JsonWriter;
use crate::slot::Slot;
use rowcast_commons::ColumnType;

pub type ReadFn = fn(&dyn RowCursor, usize) -> Slot;
pub type WriteFn = fn(&mut JsonWriter, &Slot);

/// A reader/writer pair for one primitive type.
#[derive(Debug, Clone, Copy)]
pub struct ValueCodec {
    pub read: ReadFn,
    pub write: WriteFn,
}

/// Codec for the given column type; unsupported types get the fallback.
pub fn codec_for(column_type: &ColumnType) -> ValueCodec {
    match column_type {
        ColumnType::Boolean => ValueCodec { read: read_bool, write: write_bool },
        ColumnType::Int8 => ValueCodec { read: read_i8, write: write_int },
        ColumnType::Int16 => ValueCodec { read: read_i16, write: write_int },
        ColumnType::Int32 => ValueCodec { read: read_i32, write: write_int },
        ColumnType::Int64 => ValueCodec { read: read_i64, write: write_int },
        ColumnType::UInt8 => ValueCodec { read: read_u8, write: write_int },
        ColumnType::Float32 => ValueCodec { read: read_f32, write: write_float },
        ColumnType::Float64 => ValueCodec { read: read_f64, write: write_float },
        ColumnType::Decimal { .. } => ValueCodec { read: read_decimal, write: write_decimal },
        ColumnType::Timestamp => ValueCodec { read: read_timestamp, write: write_timestamp },
        ColumnType::Uuid => ValueCodec { read: read_uuid, write: write_uuid },
        ColumnType::Utf8 => ValueCodec { read: read_string, write: write_string },
        ColumnType::Char => ValueCodec { read: read_char, write: write_char },
        ColumnType::Unsupported(_) => fallback_codec(),
    }
}

/// Reader through the cursor's untyped accessor, writer via string form.
/// Selected at compile time for unsupported column types; that selection is
/// reported once through the `unsupported-type` event, never per row.
pub fn fallback_codec() -> ValueCodec {
    ValueCodec { read: read_opaque, write: write_opaque }
}

fn read_bool(cursor: &dyn RowCursor, ordinal: usize) -> Slot {
    if cursor.is_null(ordinal) {
        Slot::Null
    } else {
        Slot::Bool(cursor.get_bool(ordinal))
    }
}

fn read_i8(cursor: &dyn RowCursor, ordinal: usize) -> Slot {
    if cursor.is_null(ordinal) {
        Slot::Null
    } else {
        Slot::I8(cursor.get_i8(ordinal))
    }
}

fn read_i16(cursor: &dyn RowCursor, ordinal: usize) -> Slot {
    if cursor.is_null(ordinal) {
        Slot::Null
    } else {
        Slot::I16(cursor.get_i16(ordinal))
    }
}

fn read_i32(cursor: &dyn RowCursor, ordinal: usize) -> Slot {
    if cursor.is_null(ordinal) {
        Slot::Null
    } else {
        Slot::I32(cursor.get_i32(ordinal))
    }
}

fn read_i64(cursor: &dyn RowCursor, ordinal: usize) -> Slot {
    if cursor.is_null(ordinal) {
        Slot::Null
    } else {
        Slot::I64(cursor.get_i64(ordinal))
    }
}

fn read_u8(cursor: &dyn RowCursor, ordinal: usize) -> Slot {
    if cursor.is_null(ordinal) {
        Slot::Null
    } else {
        Slot::U8(cursor.get_u8(ordinal))
    }
}

fn read_f32(cursor: &dyn RowCursor, ordinal: usize) -> Slot {
    if cursor.is_null(ordinal) {
        Slot::Null
    } else {
        Slot::F32(cursor.get_f32(ordinal))
    }
}

fn read_f64(cursor: &dyn RowCursor, ordinal: usize) -> Slot {
    if cursor.is_null(ordinal) {
        Slot::Null
    } else {
        Slot::F64(cursor.get_f64(ordinal))
    }
}

fn read_decimal(cursor: &dyn RowCursor, ordinal: usize) -> Slot {
    if cursor.is_null(ordinal) {
        return Slot::Null;
    }
    let scale = match cursor.schema().column(ordinal).column_type {
        ColumnType::Decimal { scale, .. } => scale,
        _ => 0,
    };
    Slot::Decimal {
        unscaled: cursor.get_decimal(ordinal),
        scale,
    }
}

fn read_timestamp(cursor: &dyn RowCursor, ordinal: usize) -> Slot {
    if cursor.is_null(ordinal) {
        Slot::Null
    } else {
        Slot::Timestamp(cursor.get_timestamp(ordinal))
    }
}

fn read_uuid(cursor: &dyn RowCursor, ordinal: usize) -> Slot {
    if cursor.is_null(ordinal) {
        Slot::Null
    } else {
        Slot::Uuid(cursor.get_uuid(ordinal))
    }
}

fn read_string(cursor: &dyn RowCursor, ordinal: usize) -> Slot {
    if cursor.is_null(ordinal) {
        Slot::Null
    } else {
        Slot::Text(cursor.get_string(ordinal))
    }
}

fn read_char(cursor: &dyn RowCursor, ordinal: usize) -> Slot {
    if cursor.is_null(ordinal) {
        Slot::Null
    } else {
        Slot::Char(cursor.get_char(ordinal))
    }
}

fn read_opaque(cursor: &dyn RowCursor, ordinal: usize) -> Slot {
    if cursor.is_null(ordinal) {
        Slot::Null
    } else {
        Slot::Opaque(cursor.get_opaque(ordinal))
    }
}

// Writers tolerate the null marker in every slot position.

fn write_bool(writer: &mut JsonWriter, slot: &Slot) {
    match slot {
        Slot::Bool(v) => writer.put_bool(*v),
        _ => writer.put_null(),
    }
}

fn write_int(writer: &mut JsonWriter, slot: &Slot) {
    match slot {
        Slot::I8(v) => writer.put_i64(*v as i64),
        Slot::I16(v) => writer.put_i64(*v as i64),
        Slot::I32(v) => writer.put_i64(*v as i64),
        Slot::I64(v) => writer.put_i64(*v),
        Slot::U8(v) => writer.put_u64(*v as u64),
        _ => writer.put_null(),
    }
}

fn write_float(writer: &mut JsonWriter, slot: &Slot) {
    match slot {
        Slot::F32(v) => writer.put_f32(*v),
        Slot::F64(v) => writer.put_f64(*v),
        _ => writer.put_null(),
    }
}

fn write_decimal(writer: &mut JsonWriter, slot: &Slot) {
    match slot {
        Slot::Decimal { unscaled, scale } => writer.put_decimal(*unscaled, *scale),
        _ => writer.put_null(),
    }
}

fn write_timestamp(writer: &mut JsonWriter, slot: &Slot) {
    match slot {
        Slot::Timestamp(micros) => writer.put_timestamp_micros(*micros),
        _ => writer.put_null(),
    }
}

fn write_uuid(writer: &mut JsonWriter, slot: &Slot) {
    match slot {
        Slot::Uuid(v) => writer.put_uuid(v),
        _ => writer.put_null(),
    }
}

fn write_string(writer: &mut JsonWriter, slot: &Slot) {
    match slot {
        Slot::Text(v) => writer.put_str(v),
        _ => writer.put_null(),
    }
}

fn write_char(writer: &mut JsonWriter, slot: &Slot) {
    match slot {
        Slot::Char(v) => writer.put_char(*v),
        _ => writer.put_null(),
    }
}

fn write_opaque(writer: &mut JsonWriter, slot: &Slot) {
    match slot {
        Slot::Opaque(v) | Slot::Text(v) => writer.put_str(v),
        _ => writer.put_null(),
    }
}
