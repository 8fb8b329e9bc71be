use crate::store::backing_store::BackingStore;

/// Capability contract for change-tracked models: exactly one backing store,
/// owned by the model, created with it, never shared across instances.
///
/// A backed model also returns `Some(self.store())` from
/// [`Parsable::backing_store`] so the proxy factories can reach the store
/// through the association instead of through type inspection.
///
/// [`Parsable::backing_store`]: crate::serialization::Parsable::backing_store
pub trait BackedModel {
    fn store(&self) -> &dyn BackingStore;
}
