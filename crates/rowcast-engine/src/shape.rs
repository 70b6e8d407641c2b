//! Shape descriptors.
//!
//! A descriptor is a rooted value tree describing the JSON object produced
//! for every row: primitive fields bound to columns, nested objects,
//! flattened sub-objects, and array patterns that collapse prefix-matched
//! column groups. Construction happens in host code (plain builder calls
//! stand in for attribute annotations); the engine validates on ingestion
//! and never mutates a descriptor afterwards.

use crate::error::DescriptorError;
use rowcast_commons::{ColumnType, ShapeId};

/// One node of the descriptor tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeNode {
    /// Primitive JSON field bound to the column with the literal name.
    Field {
        json_name: String,
        column: String,
        declared: ColumnType,
    },
    /// Nested JSON object emitted under its own property name.
    Object {
        json_name: String,
        children: Vec<ShapeNode>,
    },
    /// Children emitted directly into the enclosing object, no `{}` of its
    /// own.
    Flattened { children: Vec<ShapeNode> },
    /// Every column whose name starts with `prefix` becomes one anonymous
    /// element of a JSON array, in ascending ordinal order.
    ArrayPattern { json_name: String, prefix: String },
}

/// Validated descriptor: an id plus the root node list.
///
/// The root is conceptually a flattened object; its children form the body
/// of each per-row JSON object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeDescriptor {
    id: ShapeId,
    roots: Vec<ShapeNode>,
}

impl ShapeDescriptor {
    /// Validate and freeze a descriptor.
    pub fn new(id: ShapeId, roots: Vec<ShapeNode>) -> Result<Self, DescriptorError> {
        if roots.is_empty() {
            return Err(DescriptorError::EmptyShape {
                shape: id.to_string(),
            });
        }
        validate_nodes(id.as_str(), &roots)?;
        Ok(Self { id, roots })
    }

    pub fn builder(id: impl Into<ShapeId>) -> ShapeBuilder {
        ShapeBuilder {
            id: id.into(),
            nodes: NodeList::new(),
        }
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn roots(&self) -> &[ShapeNode] {
        &self.roots
    }
}

fn validate_nodes(shape: &str, nodes: &[ShapeNode]) -> Result<(), DescriptorError> {
    for node in nodes {
        match node {
            ShapeNode::Field {
                json_name, column, ..
            } => {
                if json_name.is_empty() {
                    return Err(DescriptorError::EmptyJsonName {
                        shape: shape.to_string(),
                    });
                }
                if column.is_empty() {
                    return Err(DescriptorError::EmptyColumnName {
                        shape: shape.to_string(),
                        field: json_name.clone(),
                    });
                }
            }
            ShapeNode::Object {
                json_name,
                children,
            } => {
                if json_name.is_empty() {
                    return Err(DescriptorError::EmptyJsonName {
                        shape: shape.to_string(),
                    });
                }
                validate_nodes(shape, children)?;
            }
            ShapeNode::Flattened { children } => validate_nodes(shape, children)?,
            ShapeNode::ArrayPattern { json_name, prefix } => {
                if json_name.is_empty() {
                    return Err(DescriptorError::EmptyJsonName {
                        shape: shape.to_string(),
                    });
                }
                if prefix.is_empty() {
                    return Err(DescriptorError::EmptyPrefix {
                        shape: shape.to_string(),
                        field: json_name.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Node list under construction; shared by the root builder and nested
/// object/flatten closures.
#[derive(Debug, Default)]
pub struct NodeList {
    nodes: Vec<ShapeNode>,
}

impl NodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(
        mut self,
        json_name: impl Into<String>,
        column: impl Into<String>,
        declared: ColumnType,
    ) -> Self {
        self.nodes.push(ShapeNode::Field {
            json_name: json_name.into(),
            column: column.into(),
            declared,
        });
        self
    }

    pub fn object(
        mut self,
        json_name: impl Into<String>,
        build: impl FnOnce(NodeList) -> NodeList,
    ) -> Self {
        self.nodes.push(ShapeNode::Object {
            json_name: json_name.into(),
            children: build(NodeList::new()).nodes,
        });
        self
    }

    pub fn flatten(mut self, build: impl FnOnce(NodeList) -> NodeList) -> Self {
        self.nodes.push(ShapeNode::Flattened {
            children: build(NodeList::new()).nodes,
        });
        self
    }

    pub fn array_pattern(
        mut self,
        json_name: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        self.nodes.push(ShapeNode::ArrayPattern {
            json_name: json_name.into(),
            prefix: prefix.into(),
        });
        self
    }
}

/// Fluent descriptor builder.
#[derive(Debug)]
pub struct ShapeBuilder {
    id: ShapeId,
    nodes: NodeList,
}

impl ShapeBuilder {
    pub fn field(
        mut self,
        json_name: impl Into<String>,
        column: impl Into<String>,
        declared: ColumnType,
    ) -> Self {
        self.nodes = self.nodes.field(json_name, column, declared);
        self
    }

    pub fn object(
        mut self,
        json_name: impl Into<String>,
        build: impl FnOnce(NodeList) -> NodeList,
    ) -> Self {
        self.nodes = self.nodes.object(json_name, build);
        self
    }

    pub fn flatten(mut self, build: impl FnOnce(NodeList) -> NodeList) -> Self {
        self.nodes = self.nodes.flatten(build);
        self
    }

    pub fn array_pattern(
        mut self,
        json_name: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        self.nodes = self.nodes.array_pattern(json_name, prefix);
        self
    }

    pub fn build(self) -> Result<ShapeDescriptor, DescriptorError> {
        ShapeDescriptor::new(self.id, self.nodes.nodes)
    }
}
