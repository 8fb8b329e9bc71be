use std::sync::Arc;

use serde_json::Value;

/// Callback invoked synchronously on every `set`, in subscription order, with
/// the key, the previous value (`None` when the key was absent) and the new
/// value. Callbacks run inline on the mutating thread and must not block.
pub type SubscriptionCallback = Arc<dyn Fn(&str, Option<&Value>, &Value) + Send + Sync>;

/// Change-tracking key/value store backing a model's fields.
///
/// Every entry carries a changed flag recomputed on each `set`: a write while
/// `is_initialization_completed()` is true marks the entry changed, a write
/// during bulk hydration (initialization not completed) marks it unchanged.
/// `return_only_changed_values` is a read-mode filter applied by `get` and
/// `enumerate`.
///
/// A store instance is owned by exactly one model, created with it and never
/// shared across model instances.
pub trait BackingStore: Send + Sync {
    /// The stored value, or `None` when the key is absent or its changed flag
    /// fails the current read-mode filter. A stored null comes back as
    /// `Some(Value::Null)`, so "explicitly cleared" stays distinguishable
    /// from "never set".
    fn get(&self, key: &str) -> Option<Value>;

    /// Unconditional write. Subscribers are always notified, even when the
    /// new value equals the old one.
    fn set(&self, key: &str, value: Value);

    /// Copy-out snapshot of the store, filtered to changed entries when
    /// `return_only_changed_values` is set. Later mutations do not affect an
    /// already-taken snapshot.
    fn enumerate(&self) -> Vec<(String, Value)>;

    /// Keys whose stored value is null and whose changed flag is set: the
    /// fields a caller deliberately cleared since initialization.
    fn enumerate_keys_for_values_changed_to_null(&self) -> Vec<String>;

    /// Registers a callback, under the given id or a generated one, and
    /// returns the id to use with `unsubscribe`.
    fn subscribe(
        &self,
        callback: SubscriptionCallback,
        subscription_id: Option<String>,
    ) -> String;

    /// Removes a subscription. Unknown ids are a no-op; returns whether a
    /// subscription was actually removed.
    fn unsubscribe(&self, subscription_id: &str) -> bool;

    /// Drops every entry. Subscriptions stay registered and are not invoked.
    fn clear(&self);

    fn is_initialization_completed(&self) -> bool;

    /// Leaving initialization mode (`true`) does not touch existing changed
    /// flags; re-entering it (`false`) re-arms every stored entry as changed
    /// so a subsequent full sync sees them.
    fn set_initialization_completed(&self, value: bool);

    fn return_only_changed_values(&self) -> bool;

    fn set_return_only_changed_values(&self, value: bool);
}
