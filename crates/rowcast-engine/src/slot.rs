//! Row-local value slots.
//!
//! One [`Slot`] holds one primitive value between the read pass and the emit
//! pass of a row. The buffer is allocated once per request at the plan's
//! `slot_count` and overwritten in place every row; only variable-length
//! string values allocate.

use uuid::Uuid;

/// Tagged union over the supported primitive set plus the null marker and
/// the opaque fallback representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    F32(f32),
    F64(f64),
    /// 128-bit unscaled value; `scale` digits belong to the fraction.
    Decimal { unscaled: i128, scale: i8 },
    /// Microseconds since the Unix epoch, UTC.
    Timestamp(i64),
    Uuid(Uuid),
    Text(String),
    Char(char),
    /// String form of a value the codec table has no dedicated pair for.
    Opaque(String),
}

impl Slot {
    pub fn is_null(&self) -> bool {
        matches!(self, Slot::Null)
    }
}

/// Fixed-size, reusable per-request buffer of row values.
#[derive(Debug)]
pub struct SlotBuffer {
    slots: Vec<Slot>,
}

impl SlotBuffer {
    /// Allocate a buffer with `slot_count` null slots.
    pub fn with_capacity(slot_count: usize) -> Self {
        Self {
            slots: vec![Slot::Null; slot_count],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn set(&mut self, index: usize, slot: Slot) {
        self.slots[index] = slot;
    }

    pub fn get(&self, index: usize) -> &Slot {
        &self.slots[index]
    }
}
