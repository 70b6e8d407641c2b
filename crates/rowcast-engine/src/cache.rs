//! Process-lifetime plan cache.
//!
//! Keyed by `(shape id, schema fingerprint)` so a shape is compiled once per
//! distinct cursor schema. Reads are lock-free; concurrent first compiles of
//! the same key are serialized per shard by the map's entry API, and because
//! compilation is deterministic, whichever plan lands first is equivalent.
//! Plans are small; there is no eviction.

use crate::compiler::{compile, CompileOptions};
use crate::cursor::CursorSchema;
use crate::error::CompileError;
use crate::plan::SerializationPlan;
use crate::shape::ShapeDescriptor;
use dashmap::DashMap;
use rowcast_commons::{CorrelationId, EngineEvent, EventCategory, EventSink, ShapeId};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Hash over `(column name, declared type)` pairs in ordinal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaFingerprint(u64);

impl SchemaFingerprint {
    pub fn of(schema: &CursorSchema) -> Self {
        let mut hasher = DefaultHasher::new();
        for column in schema.columns() {
            column.name.hash(&mut hasher);
            column.column_type.hash(&mut hasher);
        }
        Self(hasher.finish())
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PlanCacheKey {
    shape: ShapeId,
    fingerprint: SchemaFingerprint,
}

/// Shared cache of compiled plans.
#[derive(Default)]
pub struct PlanCache {
    plans: DashMap<PlanCacheKey, Arc<SerializationPlan>>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Cached plan for the `(shape, schema)` pair, compiling on first use.
    pub fn get_or_compile(
        &self,
        descriptor: &ShapeDescriptor,
        schema: &CursorSchema,
        options: &CompileOptions,
        events: &dyn EventSink,
        correlation: &CorrelationId,
    ) -> Result<Arc<SerializationPlan>, CompileError> {
        let key = PlanCacheKey {
            shape: descriptor.id().clone(),
            fingerprint: SchemaFingerprint::of(schema),
        };

        if let Some(plan) = self.plans.get(&key) {
            events.record(
                EngineEvent::new(EventCategory::PlanCacheHit, correlation.clone())
                    .with_detail(format!("shape={}", descriptor.id())),
            );
            return Ok(plan.clone());
        }

        events.record(
            EngineEvent::new(EventCategory::PlanCacheMiss, correlation.clone())
                .with_detail(format!("shape={}", descriptor.id())),
        );
        let plan = Arc::new(compile(descriptor, schema, options, events, correlation)?);
        let entry = self.plans.entry(key).or_insert(plan);
        Ok(entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowcast_commons::{ColumnType, RecordingSink};

    fn schema() -> CursorSchema {
        CursorSchema::from_pairs(vec![
            ("Id", ColumnType::Int64),
            ("Name", ColumnType::Utf8),
        ])
    }

    fn descriptor() -> ShapeDescriptor {
        ShapeDescriptor::builder("cache-test")
            .field("id", "Id", ColumnType::Int64)
            .build()
            .unwrap()
    }

    #[test]
    fn test_fingerprint_is_schema_sensitive() {
        let a = SchemaFingerprint::of(&schema());
        let b = SchemaFingerprint::of(&schema());
        assert_eq!(a, b);

        let widened = CursorSchema::from_pairs(vec![
            ("Id", ColumnType::Int64),
            ("Name", ColumnType::Utf8),
            ("Extra", ColumnType::Boolean),
        ]);
        assert_ne!(a, SchemaFingerprint::of(&widened));

        let retyped = CursorSchema::from_pairs(vec![
            ("Id", ColumnType::Int32),
            ("Name", ColumnType::Utf8),
        ]);
        assert_ne!(a, SchemaFingerprint::of(&retyped));
    }

    #[test]
    fn test_second_lookup_hits() {
        let cache = PlanCache::new();
        let sink = RecordingSink::new();
        let correlation = CorrelationId::new("cache");

        let first = cache
            .get_or_compile(
                &descriptor(),
                &schema(),
                &CompileOptions::default(),
                &sink,
                &correlation,
            )
            .unwrap();
        let second = cache
            .get_or_compile(
                &descriptor(),
                &schema(),
                &CompileOptions::default(),
                &sink,
                &correlation,
            )
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(sink.count(EventCategory::PlanCacheMiss), 1);
        assert_eq!(sink.count(EventCategory::PlanCacheHit), 1);
    }

    #[test]
    fn test_schema_change_compiles_again() {
        let cache = PlanCache::new();
        let sink = RecordingSink::new();
        let correlation = CorrelationId::new("cache");

        cache
            .get_or_compile(
                &descriptor(),
                &schema(),
                &CompileOptions::default(),
                &sink,
                &correlation,
            )
            .unwrap();
        let widened = CursorSchema::from_pairs(vec![
            ("Id", ColumnType::Int64),
            ("Name", ColumnType::Utf8),
            ("Extra", ColumnType::Boolean),
        ]);
        cache
            .get_or_compile(
                &descriptor(),
                &widened,
                &CompileOptions::default(),
                &sink,
                &correlation,
            )
            .unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(sink.count(EventCategory::PlanCacheMiss), 2);
    }
}
