//! Backing-store change tracking: the store contract, the in-memory
//! implementation, and the proxy factories that toggle store flags around
//! (de)serialization.

mod backed_model;
mod backing_store;
mod backing_store_factory;
mod backing_store_proxies;
mod in_memory_backing_store;

pub use backed_model::BackedModel;
pub use backing_store::{BackingStore, SubscriptionCallback};
pub use backing_store_factory::{BackingStoreFactory, InMemoryBackingStoreFactory};
pub use backing_store_proxies::{
    BackingStoreParseNodeFactory, BackingStoreSerializationWriterProxyFactory,
};
pub use in_memory_backing_store::InMemoryBackingStore;
