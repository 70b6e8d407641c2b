//! Shared building blocks for the Rowcast workspace.
//!
//! Everything here is dependency-light on purpose: identifiers, the column
//! type tag, the structured event model, the engine settings, and a small
//! shared error type are used by every other crate and must not pull the
//! HTTP or Arrow stacks with them.

pub mod errors;
pub mod events;
pub mod ids;
pub mod settings;
pub mod types;

pub use errors::CommonError;
pub use events::{EngineEvent, EventCategory, EventSink, LogEventSink, RecordingSink};
pub use ids::{CorrelationId, ShapeId};
pub use settings::EngineSettings;
pub use types::ColumnType;
