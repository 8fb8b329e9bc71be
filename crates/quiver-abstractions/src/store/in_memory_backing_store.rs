use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value;
use uuid::Uuid;

use crate::store::backing_store::{BackingStore, SubscriptionCallback};

struct StoreInner {
    entries: BTreeMap<String, (bool, Value)>,
    subscriptions: Vec<(String, SubscriptionCallback)>,
    initialization_completed: bool,
    return_only_changed_values: bool,
}

/// In-memory [`BackingStore`] with dirty tracking.
///
/// A fresh store considers initialization completed, so direct writes are
/// tracked as changes until a deserialization pass re-arms the flag.
pub struct InMemoryBackingStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryBackingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for InMemoryBackingStore {
    fn default() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                entries: BTreeMap::new(),
                subscriptions: Vec::new(),
                initialization_completed: true,
                return_only_changed_values: false,
            }),
        }
    }
}

impl InMemoryBackingStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        // A poisoned lock means a panic mid-mutation; the map itself is
        // always left consistent, so keep serving.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl BackingStore for InMemoryBackingStore {
    fn get(&self, key: &str) -> Option<Value> {
        let inner = self.lock();
        let (changed, value) = inner.entries.get(key)?;
        if inner.return_only_changed_values && !changed {
            return None;
        }
        Some(value.clone())
    }

    fn set(&self, key: &str, value: Value) {
        let (old_value, subscribers) = {
            let mut inner = self.lock();
            let changed = inner.initialization_completed;
            let old_value = inner
                .entries
                .insert(key.to_string(), (changed, value.clone()))
                .map(|(_, old)| old);
            let subscribers: Vec<SubscriptionCallback> = inner
                .subscriptions
                .iter()
                .map(|(_, callback)| callback.clone())
                .collect();
            (old_value, subscribers)
        };
        // Invoked outside the lock so a callback may read or write the store.
        for callback in subscribers {
            callback(key, old_value.as_ref(), &value);
        }
    }

    fn enumerate(&self) -> Vec<(String, Value)> {
        let inner = self.lock();
        inner
            .entries
            .iter()
            .filter(|(_, (changed, _))| !inner.return_only_changed_values || *changed)
            .map(|(key, (_, value))| (key.clone(), value.clone()))
            .collect()
    }

    fn enumerate_keys_for_values_changed_to_null(&self) -> Vec<String> {
        let inner = self.lock();
        inner
            .entries
            .iter()
            .filter(|(_, (changed, value))| *changed && value.is_null())
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn subscribe(
        &self,
        callback: SubscriptionCallback,
        subscription_id: Option<String>,
    ) -> String {
        let id = subscription_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let mut inner = self.lock();
        inner.subscriptions.retain(|(existing, _)| *existing != id);
        inner.subscriptions.push((id.clone(), callback));
        id
    }

    fn unsubscribe(&self, subscription_id: &str) -> bool {
        let mut inner = self.lock();
        let before = inner.subscriptions.len();
        inner
            .subscriptions
            .retain(|(existing, _)| existing != subscription_id);
        inner.subscriptions.len() != before
    }

    fn clear(&self) {
        self.lock().entries.clear();
    }

    fn is_initialization_completed(&self) -> bool {
        self.lock().initialization_completed
    }

    fn set_initialization_completed(&self, value: bool) {
        let mut inner = self.lock();
        inner.initialization_completed = value;
        if !value {
            for (changed, _) in inner.entries.values_mut() {
                *changed = true;
            }
        }
    }

    fn return_only_changed_values(&self) -> bool {
        self.lock().return_only_changed_values
    }

    fn set_return_only_changed_values(&self, value: bool) {
        self.lock().return_only_changed_values = value;
    }
}
