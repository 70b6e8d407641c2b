//! Compiled serialization plans.
//!
//! A plan is two flat instruction sequences produced by one descriptor walk:
//! `reads` (ascending cursor ordinal, one entry per slot) and `emits`
//! (JSON output order). Property names are pre-encoded as `"name":` bytes so
//! row emission never escapes anything.

use crate::codec::{ReadFn, WriteFn};
use crate::json::JsonWriter;
use crate::slot::SlotBuffer;
use bytes::Bytes;
use rowcast_commons::ShapeId;

/// Read one cursor column into one slot.
#[derive(Debug, Clone, Copy)]
pub struct ReadStep {
    pub slot: usize,
    pub ordinal: usize,
    pub read: ReadFn,
}

/// One JSON output instruction.
#[derive(Debug, Clone)]
pub enum EmitStep {
    BeginObject { key: Bytes },
    EndObject,
    BeginArray { key: Bytes },
    EndArray,
    Field { key: Bytes, slot: usize, write: WriteFn },
    Element { slot: usize, write: WriteFn },
}

/// Row-independent projection program for one `(shape, schema)` pair.
#[derive(Debug, Clone)]
pub struct SerializationPlan {
    shape_id: ShapeId,
    reads: Vec<ReadStep>,
    emits: Vec<EmitStep>,
    slot_count: usize,
    max_depth: usize,
}

impl SerializationPlan {
    pub(crate) fn new(
        shape_id: ShapeId,
        reads: Vec<ReadStep>,
        emits: Vec<EmitStep>,
        slot_count: usize,
        max_depth: usize,
    ) -> Self {
        Self {
            shape_id,
            reads,
            emits,
            slot_count,
            max_depth,
        }
    }

    pub fn shape_id(&self) -> &ShapeId {
        &self.shape_id
    }

    /// Read steps in ascending ordinal order (sequential-access safe).
    pub fn reads(&self) -> &[ReadStep] {
        &self.reads
    }

    /// Emit steps in JSON output order.
    pub fn emits(&self) -> &[EmitStep] {
        &self.emits
    }

    /// Distinct primitive values read per row.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Deepest container nesting within one row object.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Fresh per-request slot buffer sized for this plan.
    pub fn new_slot_buffer(&self) -> SlotBuffer {
        SlotBuffer::with_capacity(self.slot_count)
    }

    /// Fresh per-request writer with comma-state capacity for this plan
    /// (outer array + row object + nested containers).
    pub fn new_writer(&self) -> JsonWriter {
        JsonWriter::with_capacity(8 * 1024, self.max_depth + 2)
    }
}
