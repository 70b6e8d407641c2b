//! Descriptor-to-plan compiler.
//!
//! One depth-first walk over the descriptor resolves every column reference
//! against the sample cursor schema, assigns slots, and appends read and
//! emit steps. The output is deterministic: the same `(descriptor, schema)`
//! always produces a plan with identical behaviour. Schema mismatches are
//! non-fatal by default (field omitted, event recorded); strict mode
//! elevates them to [`CompileError`].

use crate::codec::{codec_for, fallback_codec, ValueCodec};
use crate::cursor::CursorSchema;
use crate::error::CompileError;
use crate::json::encode_key;
use crate::plan::{EmitStep, ReadStep, SerializationPlan};
use crate::shape::{ShapeDescriptor, ShapeNode};
use rowcast_commons::{CorrelationId, EngineEvent, EngineSettings, EventCategory, EventSink};
use std::collections::HashSet;

/// Compiler behaviour switches, derived from the engine settings.
#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Elevate missing columns and unsupported field types to errors.
    pub strict: bool,
    /// Serve unsupported array-pattern columns through the string fallback
    /// instead of dropping the element.
    pub array_element_fallback_to_string: bool,
}

impl CompileOptions {
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            strict: settings.strict_schema,
            array_element_fallback_to_string: settings.array_element_fallback_to_string,
        }
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            strict: false,
            array_element_fallback_to_string: true,
        }
    }
}

/// Compile a descriptor against a cursor schema into a serialization plan.
pub fn compile(
    descriptor: &ShapeDescriptor,
    schema: &CursorSchema,
    options: &CompileOptions,
    events: &dyn EventSink,
    correlation: &CorrelationId,
) -> Result<SerializationPlan, CompileError> {
    let mut compilation = Compilation {
        schema,
        options,
        events,
        correlation,
        reads: Vec::new(),
        emits: Vec::new(),
        next_slot: 0,
        field_ordinals: collect_field_ordinals(descriptor.roots(), schema),
    };

    compilation.walk(descriptor.roots())?;

    let Compilation {
        mut reads, emits, next_slot, ..
    } = compilation;

    // Sequential-access cursors require non-decreasing ordinal reads.
    reads.sort_by_key(|step| step.ordinal);

    Ok(SerializationPlan::new(
        descriptor.id().clone(),
        reads,
        emits,
        next_slot,
        max_depth(descriptor.roots()),
    ))
}

/// Ordinals referenced by explicit `Field` nodes anywhere in the tree, used
/// to warn when an array pattern sweeps up a column a field already binds.
fn collect_field_ordinals(nodes: &[ShapeNode], schema: &CursorSchema) -> HashSet<usize> {
    let mut ordinals = HashSet::new();
    fn visit(nodes: &[ShapeNode], schema: &CursorSchema, out: &mut HashSet<usize>) {
        for node in nodes {
            match node {
                ShapeNode::Field { column, .. } => {
                    if let Some(ordinal) = schema.ordinal_of(column) {
                        out.insert(ordinal);
                    }
                }
                ShapeNode::Object { children, .. } | ShapeNode::Flattened { children } => {
                    visit(children, schema, out)
                }
                ShapeNode::ArrayPattern { .. } => {}
            }
        }
    }
    visit(nodes, schema, &mut ordinals);
    ordinals
}

/// Deepest container nesting contributed by the node list.
fn max_depth(nodes: &[ShapeNode]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            ShapeNode::Field { .. } => 0,
            ShapeNode::ArrayPattern { .. } => 1,
            ShapeNode::Object { children, .. } => 1 + max_depth(children),
            ShapeNode::Flattened { children } => max_depth(children),
        })
        .max()
        .unwrap_or(0)
}

struct Compilation<'a> {
    schema: &'a CursorSchema,
    options: &'a CompileOptions,
    events: &'a dyn EventSink,
    correlation: &'a CorrelationId,
    reads: Vec<ReadStep>,
    emits: Vec<EmitStep>,
    next_slot: usize,
    field_ordinals: HashSet<usize>,
}

impl Compilation<'_> {
    fn walk(&mut self, nodes: &[ShapeNode]) -> Result<(), CompileError> {
        for node in nodes {
            match node {
                ShapeNode::Field {
                    json_name,
                    column,
                    declared,
                } => self.compile_field(json_name, column, declared)?,
                ShapeNode::Object {
                    json_name,
                    children,
                } => {
                    self.emits.push(EmitStep::BeginObject {
                        key: encode_key(json_name),
                    });
                    self.walk(children)?;
                    self.emits.push(EmitStep::EndObject);
                }
                ShapeNode::Flattened { children } => self.walk(children)?,
                ShapeNode::ArrayPattern { json_name, prefix } => {
                    self.compile_array_pattern(json_name, prefix)?
                }
            }
        }
        Ok(())
    }

    fn compile_field(
        &mut self,
        json_name: &str,
        column: &str,
        declared: &rowcast_commons::ColumnType,
    ) -> Result<(), CompileError> {
        let Some(ordinal) = self.schema.ordinal_of(column) else {
            self.event(
                EventCategory::ColumnNotFound,
                format!("field={} column={}", json_name, column),
            );
            if self.options.strict {
                return Err(CompileError::ColumnNotFound {
                    field: json_name.to_string(),
                    column: column.to_string(),
                });
            }
            // Non-strict: the JSON simply omits the field.
            return Ok(());
        };

        // The cursor's declared type wins over the descriptor's.
        let actual = &self.schema.column(ordinal).column_type;
        if actual != declared {
            self.event(
                EventCategory::TypeCoerced,
                format!("column={} declared={} actual={}", column, declared, actual),
            );
        }

        let codec = if actual.is_supported() {
            codec_for(actual)
        } else {
            self.event(
                EventCategory::UnsupportedType,
                format!("column={} type={}", column, actual),
            );
            if self.options.strict {
                return Err(CompileError::UnsupportedType {
                    column: column.to_string(),
                    type_name: actual.to_string(),
                });
            }
            fallback_codec()
        };

        let slot = self.assign_slot(ordinal, codec);
        self.emits.push(EmitStep::Field {
            key: encode_key(json_name),
            slot,
            write: codec.write,
        });
        Ok(())
    }

    fn compile_array_pattern(
        &mut self,
        json_name: &str,
        prefix: &str,
    ) -> Result<(), CompileError> {
        let matches = self.schema.ordinals_with_prefix(prefix);
        if matches.is_empty() {
            self.event(EventCategory::EmptyArrayPattern, format!("prefix={}", prefix));
        }

        self.emits.push(EmitStep::BeginArray {
            key: encode_key(json_name),
        });
        for ordinal in matches {
            let column = self.schema.column(ordinal);
            if self.field_ordinals.contains(&ordinal) {
                log::warn!(
                    target: "rowcast::engine",
                    "array pattern '{}' also matches column '{}' referenced by a field",
                    prefix,
                    column.name
                );
            }

            let codec = if column.column_type.is_supported() {
                codec_for(&column.column_type)
            } else {
                self.event(
                    EventCategory::UnsupportedType,
                    format!("column={} type={}", column.name, column.column_type),
                );
                if !self.options.array_element_fallback_to_string {
                    continue;
                }
                fallback_codec()
            };

            let slot = self.assign_slot(ordinal, codec);
            self.emits.push(EmitStep::Element {
                slot,
                write: codec.write,
            });
        }
        self.emits.push(EmitStep::EndArray);
        Ok(())
    }

    fn assign_slot(&mut self, ordinal: usize, codec: ValueCodec) -> usize {
        let slot = self.next_slot;
        self.next_slot += 1;
        self.reads.push(ReadStep {
            slot,
            ordinal,
            read: codec.read,
        });
        slot
    }

    fn event(&self, category: EventCategory, detail: String) {
        self.events.record(
            EngineEvent::new(category, self.correlation.clone()).with_detail(detail),
        );
    }
}
