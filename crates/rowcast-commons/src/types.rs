//! Column type tags for the supported primitive set.
//!
//! The engine dispatches value reads and JSON writes over this closed enum;
//! a cursor reporting anything outside the supported set lands on
//! [`ColumnType::Unsupported`] and is served by the fallback string codec.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a cursor column.
///
/// Serialization kinds: booleans become JSON booleans, the numeric variants
/// (including `Decimal`) become JSON numbers, everything else becomes a JSON
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    Float32,
    Float64,
    /// Fixed-point decimal carried as a 128-bit unscaled integer.
    Decimal { precision: u8, scale: i8 },
    /// UTC timestamp, microsecond resolution.
    Timestamp,
    Uuid,
    Utf8,
    Char,
    /// Anything the cursor reports that the codec table has no pair for.
    /// The payload is the cursor's own name for the type, kept for events.
    Unsupported(String),
}

impl ColumnType {
    /// Whether a dedicated codec pair exists for this type.
    pub fn is_supported(&self) -> bool {
        !matches!(self, ColumnType::Unsupported(_))
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Boolean => f.write_str("boolean"),
            ColumnType::Int8 => f.write_str("int8"),
            ColumnType::Int16 => f.write_str("int16"),
            ColumnType::Int32 => f.write_str("int32"),
            ColumnType::Int64 => f.write_str("int64"),
            ColumnType::UInt8 => f.write_str("uint8"),
            ColumnType::Float32 => f.write_str("float32"),
            ColumnType::Float64 => f.write_str("float64"),
            ColumnType::Decimal { precision, scale } => {
                write!(f, "decimal({},{})", precision, scale)
            }
            ColumnType::Timestamp => f.write_str("timestamp"),
            ColumnType::Uuid => f.write_str("uuid"),
            ColumnType::Utf8 => f.write_str("utf8"),
            ColumnType::Char => f.write_str("char"),
            ColumnType::Unsupported(name) => write!(f, "unsupported({})", name),
        }
    }
}
