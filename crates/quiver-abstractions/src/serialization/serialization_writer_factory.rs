use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::SerializationError;
use crate::serialization::content_type::{strip_parameters, vendor_fallback};
use crate::serialization::serialization_writer::{
    SerializationHandler, SerializationWriter, StartObjectSerializationHandler,
};

/// Produces serialization writers for one content type.
pub trait SerializationWriterFactory: Send + Sync {
    /// The content type this factory can produce writers for.
    fn valid_content_type(&self) -> &str;

    fn get_serialization_writer(
        &self,
        content_type: &str,
    ) -> Result<Box<dyn SerializationWriter>, SerializationError>;
}

/// Wraps a concrete factory and registers serialization handlers on every
/// writer it produces. Wrapping is composable: each wrapper's handlers end up
/// ahead of the ones installed by the factories beneath it.
pub struct SerializationWriterProxyFactory {
    concrete: Arc<dyn SerializationWriterFactory>,
    on_before: Option<SerializationHandler>,
    on_after: Option<SerializationHandler>,
    on_start: Option<StartObjectSerializationHandler>,
}

impl SerializationWriterProxyFactory {
    pub fn new(
        concrete: Arc<dyn SerializationWriterFactory>,
        on_before: Option<SerializationHandler>,
        on_after: Option<SerializationHandler>,
        on_start: Option<StartObjectSerializationHandler>,
    ) -> Self {
        Self {
            concrete,
            on_before,
            on_after,
            on_start,
        }
    }
}

impl SerializationWriterFactory for SerializationWriterProxyFactory {
    fn valid_content_type(&self) -> &str {
        self.concrete.valid_content_type()
    }

    fn get_serialization_writer(
        &self,
        content_type: &str,
    ) -> Result<Box<dyn SerializationWriter>, SerializationError> {
        let mut writer = self.concrete.get_serialization_writer(content_type)?;
        if let Some(handler) = &self.on_before {
            writer.register_before_object_serialization(handler.clone());
        }
        if let Some(handler) = &self.on_after {
            writer.register_after_object_serialization(handler.clone());
        }
        if let Some(handler) = &self.on_start {
            writer.register_start_object_serialization(handler.clone());
        }
        Ok(writer)
    }
}

/// Content-type keyed dispatch to concrete serialization-writer factories.
/// Same contract as [`ParseNodeFactoryRegistry`]: a plain value configured at
/// startup, read afterwards.
///
/// [`ParseNodeFactoryRegistry`]: crate::serialization::ParseNodeFactoryRegistry
#[derive(Default)]
pub struct SerializationWriterFactoryRegistry {
    pub(crate) factories: HashMap<String, Arc<dyn SerializationWriterFactory>>,
    pub(crate) backing_store_enabled: bool,
}

impl SerializationWriterFactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under its valid content type. Registering twice
    /// for the same content type replaces the previous entry.
    pub fn register(
        &mut self,
        factory: Arc<dyn SerializationWriterFactory>,
    ) -> Result<(), SerializationError> {
        let content_type = strip_parameters(factory.valid_content_type());
        if content_type.is_empty() {
            return Err(SerializationError::EmptyContentType);
        }
        self.factories.insert(content_type, factory);
        Ok(())
    }

    /// Resolves a factory for the given content type, with the same
    /// parameter-stripping and vendor-suffix fallback as the parse-node
    /// registry.
    pub fn factory_for(
        &self,
        content_type: &str,
    ) -> Result<(String, Arc<dyn SerializationWriterFactory>), SerializationError> {
        let cleaned = strip_parameters(content_type);
        if cleaned.is_empty() {
            return Err(SerializationError::EmptyContentType);
        }
        if let Some(factory) = self.factories.get(&cleaned) {
            return Ok((cleaned, factory.clone()));
        }
        if let Some(fallback) = vendor_fallback(&cleaned)
            && let Some(factory) = self.factories.get(&fallback)
        {
            return Ok((fallback, factory.clone()));
        }
        Err(SerializationError::NoFactoryRegistered(cleaned))
    }

    /// Builds a writer with the factory registered for `content_type`.
    pub fn get_serialization_writer(
        &self,
        content_type: &str,
    ) -> Result<Box<dyn SerializationWriter>, SerializationError> {
        let (resolved, factory) = self.factory_for(content_type)?;
        factory.get_serialization_writer(&resolved)
    }
}

/// A registry is itself a factory, dispatching per call, so it can stand
/// anywhere a single-codec factory is expected, including inside the
/// backing-store proxies.
impl SerializationWriterFactory for SerializationWriterFactoryRegistry {
    /// Empty: a registry serves many content types. This also means a
    /// registry cannot be registered into another registry.
    fn valid_content_type(&self) -> &str {
        ""
    }

    fn get_serialization_writer(
        &self,
        content_type: &str,
    ) -> Result<Box<dyn SerializationWriter>, SerializationError> {
        SerializationWriterFactoryRegistry::get_serialization_writer(self, content_type)
    }
}
