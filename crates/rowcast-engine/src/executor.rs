//! Plan executor: one row in, one JSON object out.
//!
//! Two passes per row. The read pass fills the slot buffer in ascending
//! ordinal order (never reading a lower ordinal after a higher one); the
//! emit pass replays the plan's output steps against the writer. Neither
//! pass allocates beyond the string values themselves.

use crate::cursor::RowCursor;
use crate::json::JsonWriter;
use crate::plan::{EmitStep, SerializationPlan};
use crate::slot::SlotBuffer;

/// Emit the cursor's current row as one JSON object.
pub fn emit_row(
    plan: &SerializationPlan,
    cursor: &dyn RowCursor,
    writer: &mut JsonWriter,
    scratch: &mut SlotBuffer,
) {
    for step in plan.reads() {
        scratch.set(step.slot, (step.read)(cursor, step.ordinal));
    }

    writer.begin_object();
    for step in plan.emits() {
        match step {
            EmitStep::BeginObject { key } => {
                writer.key(key);
                writer.begin_object();
            }
            EmitStep::EndObject => writer.end_object(),
            EmitStep::BeginArray { key } => {
                writer.key(key);
                writer.begin_array();
            }
            EmitStep::EndArray => writer.end_array(),
            EmitStep::Field { key, slot, write } => {
                writer.key(key);
                write(writer, scratch.get(*slot));
            }
            EmitStep::Element { slot, write } => write(writer, scratch.get(*slot)),
        }
    }
    writer.end_object();
}
