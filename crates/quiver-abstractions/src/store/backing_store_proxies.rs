use std::sync::Arc;

use crate::errors::SerializationError;
use crate::serialization::{
    Parsable, ParseNode, ParseNodeFactory, ParseNodeProxyFactory, SerializationWriter,
    SerializationWriterFactory, SerializationWriterProxyFactory,
};

/// Parse-node factory that arms change-detection suppression around the
/// field-assignment pass of a deserialization.
///
/// Before fields are assigned to a freshly constructed backed model, its
/// store leaves initialization-completed mode so the bulk writes are recorded
/// as unchanged; after assignment the store returns to completed mode and
/// mutations are tracked again. Models without a backing store pass through
/// untouched.
pub struct BackingStoreParseNodeFactory {
    inner: ParseNodeProxyFactory,
}

impl BackingStoreParseNodeFactory {
    pub fn new(concrete: Arc<dyn ParseNodeFactory>) -> Self {
        let inner = ParseNodeProxyFactory::new(
            concrete,
            Some(Arc::new(|model: &dyn Parsable| {
                if let Some(store) = model.backing_store() {
                    store.set_initialization_completed(false);
                }
                Ok(())
            })),
            Some(Arc::new(|model: &dyn Parsable| {
                if let Some(store) = model.backing_store() {
                    store.set_initialization_completed(true);
                }
                Ok(())
            })),
        );
        Self { inner }
    }
}

impl ParseNodeFactory for BackingStoreParseNodeFactory {
    fn valid_content_type(&self) -> &str {
        self.inner.valid_content_type()
    }

    fn get_root_parse_node(
        &self,
        content_type: &str,
        content: &[u8],
    ) -> Result<Box<dyn ParseNode>, SerializationError> {
        self.inner.get_root_parse_node(content_type, content)
    }
}

/// Serialization-writer factory implementing the partial-PATCH contract.
///
/// While a backed model serializes, its store returns only changed values, so
/// untouched fields never reach the writer. The start handler additionally
/// writes an explicit null for every key whose value changed to null; the
/// field-serialize pass would otherwise simply skip those cleared fields.
/// After serialization the store leaves changed-only mode and is marked
/// initialized.
pub struct BackingStoreSerializationWriterProxyFactory {
    inner: SerializationWriterProxyFactory,
}

impl BackingStoreSerializationWriterProxyFactory {
    pub fn new(concrete: Arc<dyn SerializationWriterFactory>) -> Self {
        let inner = SerializationWriterProxyFactory::new(
            concrete,
            Some(Arc::new(|model: &dyn Parsable| {
                if let Some(store) = model.backing_store() {
                    store.set_return_only_changed_values(true);
                }
                Ok(())
            })),
            Some(Arc::new(|model: &dyn Parsable| {
                if let Some(store) = model.backing_store() {
                    store.set_return_only_changed_values(false);
                    store.set_initialization_completed(true);
                }
                Ok(())
            })),
            Some(Arc::new(|model: &dyn Parsable, writer: &mut dyn SerializationWriter| {
                if let Some(store) = model.backing_store() {
                    for key in store.enumerate_keys_for_values_changed_to_null() {
                        writer.write_null_value(&key)?;
                    }
                }
                Ok(())
            })),
        );
        Self { inner }
    }
}

impl SerializationWriterFactory for BackingStoreSerializationWriterProxyFactory {
    fn valid_content_type(&self) -> &str {
        self.inner.valid_content_type()
    }

    fn get_serialization_writer(
        &self,
        content_type: &str,
    ) -> Result<Box<dyn SerializationWriter>, SerializationError> {
        self.inner.get_serialization_writer(content_type)
    }
}
