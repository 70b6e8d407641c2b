//! Shape registry.
//!
//! Maps endpoint shape names to their descriptor and cursor source. Shapes
//! are registered once at bootstrap; request handling only reads, so the
//! map is shared lock-free.

use dashmap::DashMap;
use rowcast_engine::cursor::CursorSource;
use rowcast_engine::ShapeDescriptor;
use std::sync::Arc;

/// Everything needed to serve one streaming endpoint.
pub struct StreamRegistration {
    pub descriptor: ShapeDescriptor,
    pub source: Arc<dyn CursorSource>,
}

/// Name-keyed registry of streamable shapes.
#[derive(Default)]
pub struct ShapeRegistry {
    entries: DashMap<String, Arc<StreamRegistration>>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        name: impl Into<String>,
        descriptor: ShapeDescriptor,
        source: Arc<dyn CursorSource>,
    ) {
        self.entries
            .insert(name.into(), Arc::new(StreamRegistration { descriptor, source }));
    }

    pub fn get(&self, name: &str) -> Option<Arc<StreamRegistration>> {
        self.entries.get(name).map(|entry| entry.value().clone())
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowcast_commons::ColumnType;
    use rowcast_engine::cursor::mem::InMemoryCursorSource;
    use rowcast_engine::cursor::CursorSchema;

    #[test]
    fn test_register_and_lookup() {
        let registry = ShapeRegistry::new();
        let descriptor = ShapeDescriptor::builder("things")
            .field("id", "Id", ColumnType::Int64)
            .build()
            .unwrap();
        let schema = CursorSchema::from_pairs(vec![("Id", ColumnType::Int64)]);
        registry.register(
            "things",
            descriptor,
            Arc::new(InMemoryCursorSource::new(schema, Vec::new())),
        );

        assert_eq!(registry.len(), 1);
        assert!(registry.get("things").is_some());
        assert!(registry.get("missing").is_none());
    }
}
