//! Rowcast projection engine.
//!
//! The engine sits between a forward-only [`cursor::RowCursor`] and a UTF-8
//! JSON byte stream. A user-defined [`shape::ShapeDescriptor`] is compiled
//! once against a cursor schema into a [`plan::SerializationPlan`]; the
//! [`executor`] then runs that plan against every row, and the [`driver`]
//! wraps the whole stream (outer array, cancellation, resource release,
//! lifecycle events). Memory per request is bounded by the slot buffer and
//! the writer buffer regardless of result-set cardinality.
//!
//! ```text
//! RowCursor + ShapeId -> PlanCache (hit | compile) -> SerializationPlan
//!                     -> driver::stream_rows -> per row: executor::emit_row
//! ```

pub mod cache;
pub mod codec;
pub mod compiler;
pub mod cursor;
pub mod driver;
pub mod error;
pub mod executor;
pub mod json;
pub mod plan;
pub mod shape;
pub mod slot;

pub use cache::{PlanCache, SchemaFingerprint};
pub use compiler::{compile, CompileOptions};
pub use cursor::{ColumnInfo, CursorSchema, CursorSource, RowCursor, StreamContext};
pub use driver::{stream_rows, StreamSummary};
pub use error::{CompileError, CursorError, DescriptorError, StreamError, WriterError};
pub use json::{ByteSink, JsonWriter};
pub use plan::SerializationPlan;
pub use shape::{ShapeDescriptor, ShapeNode};
pub use slot::{Slot, SlotBuffer};
