use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::SerializationError;
use crate::serialization::content_type::{strip_parameters, vendor_fallback};
use crate::serialization::parse_node::{AssignFieldValuesHandler, ParseNode};

/// Produces root parse nodes for one content type.
pub trait ParseNodeFactory: Send + Sync {
    /// The content type this factory can parse.
    fn valid_content_type(&self) -> &str;

    fn get_root_parse_node(
        &self,
        content_type: &str,
        content: &[u8],
    ) -> Result<Box<dyn ParseNode>, SerializationError>;
}

/// Wraps a concrete factory and registers assignment handlers on every node
/// it produces. Wrapping is composable: each wrapper's handlers end up ahead
/// of the ones installed by the factories beneath it.
pub struct ParseNodeProxyFactory {
    concrete: Arc<dyn ParseNodeFactory>,
    on_before: Option<AssignFieldValuesHandler>,
    on_after: Option<AssignFieldValuesHandler>,
}

impl ParseNodeProxyFactory {
    pub fn new(
        concrete: Arc<dyn ParseNodeFactory>,
        on_before: Option<AssignFieldValuesHandler>,
        on_after: Option<AssignFieldValuesHandler>,
    ) -> Self {
        Self {
            concrete,
            on_before,
            on_after,
        }
    }
}

impl ParseNodeFactory for ParseNodeProxyFactory {
    fn valid_content_type(&self) -> &str {
        self.concrete.valid_content_type()
    }

    fn get_root_parse_node(
        &self,
        content_type: &str,
        content: &[u8],
    ) -> Result<Box<dyn ParseNode>, SerializationError> {
        let mut node = self.concrete.get_root_parse_node(content_type, content)?;
        if let Some(handler) = &self.on_before {
            node.register_before_assign_field_values(handler.clone());
        }
        if let Some(handler) = &self.on_after {
            node.register_after_assign_field_values(handler.clone());
        }
        Ok(node)
    }
}

/// Content-type keyed dispatch to concrete parse-node factories.
///
/// A registry is a plain value: construct one, register the codecs the
/// application uses, and hand it to whatever builds request adapters. It is
/// meant to be configured once at startup and read afterwards.
#[derive(Default)]
pub struct ParseNodeFactoryRegistry {
    pub(crate) factories: HashMap<String, Arc<dyn ParseNodeFactory>>,
    pub(crate) backing_store_enabled: bool,
}

impl ParseNodeFactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under its valid content type. Registering twice
    /// for the same content type replaces the previous entry.
    pub fn register(&mut self, factory: Arc<dyn ParseNodeFactory>) -> Result<(), SerializationError> {
        let content_type = strip_parameters(factory.valid_content_type());
        if content_type.is_empty() {
            return Err(SerializationError::EmptyContentType);
        }
        self.factories.insert(content_type, factory);
        Ok(())
    }

    /// Resolves a factory for the given content type: parameters are
    /// stripped, then an exact match is tried, then the vendor-suffix
    /// fallback (`application/vnd.api+json` resolves to `application/json`).
    pub fn factory_for(
        &self,
        content_type: &str,
    ) -> Result<(String, Arc<dyn ParseNodeFactory>), SerializationError> {
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

    /// Parses `content` with the factory registered for `content_type`.
    pub fn get_root_parse_node(
        &self,
        content_type: &str,
        content: &[u8],
    ) -> Result<Box<dyn ParseNode>, SerializationError> {
        let (resolved, factory) = self.factory_for(content_type)?;
        factory.get_root_parse_node(&resolved, content)
    }
}

/// A registry is itself a factory, dispatching per call, so it can stand
/// anywhere a single-codec factory is expected, including inside the
/// backing-store proxies.
impl ParseNodeFactory for ParseNodeFactoryRegistry {
    /// Empty: a registry serves many content types. This also means a
    /// registry cannot be registered into another registry.
    fn valid_content_type(&self) -> &str {
        ""
    }

    fn get_root_parse_node(
        &self,
        content_type: &str,
        content: &[u8],
    ) -> Result<Box<dyn ParseNode>, SerializationError> {
        ParseNodeFactoryRegistry::get_root_parse_node(self, content_type, content)
    }
}
