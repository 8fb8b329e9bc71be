//! Bootstrap helpers for wiring serialization registries at application
//! start, including turning the backing store on for everything a registry
//! dispatches to.

use std::sync::Arc;

use crate::serialization::{
    ParseNodeFactory, ParseNodeFactoryRegistry, SerializationWriterFactory,
    SerializationWriterFactoryRegistry,
};
use crate::store::{BackingStoreParseNodeFactory, BackingStoreSerializationWriterProxyFactory};

/// Wraps a single parse-node factory in the backing-store proxy.
pub fn enable_backing_store_for_parse_node_factory(
    original: Arc<dyn ParseNodeFactory>,
) -> Arc<dyn ParseNodeFactory> {
    Arc::new(BackingStoreParseNodeFactory::new(original))
}

/// Wraps a single serialization-writer factory in the backing-store proxy.
pub fn enable_backing_store_for_serialization_writer_factory(
    original: Arc<dyn SerializationWriterFactory>,
) -> Arc<dyn SerializationWriterFactory> {
    Arc::new(BackingStoreSerializationWriterProxyFactory::new(original))
}

/// Wraps every registered parse-node factory in the backing-store proxy.
/// Calling this twice on the same registry is a no-op, so entries never get
/// double-wrapped.
pub fn enable_backing_store_for_parse_node_registry(registry: &mut ParseNodeFactoryRegistry) {
    if registry.backing_store_enabled {
        return;
    }
    for factory in registry.factories.values_mut() {
        *factory = Arc::new(BackingStoreParseNodeFactory::new(factory.clone()));
    }
    registry.backing_store_enabled = true;
}

/// Wraps every registered serialization-writer factory in the backing-store
/// proxy. Idempotent, like the parse-node variant.
pub fn enable_backing_store_for_serialization_writer_registry(
    registry: &mut SerializationWriterFactoryRegistry,
) {
    if registry.backing_store_enabled {
        return;
    }
    for factory in registry.factories.values_mut() {
        *factory = Arc::new(BackingStoreSerializationWriterProxyFactory::new(
            factory.clone(),
        ));
    }
    registry.backing_store_enabled = true;
}
