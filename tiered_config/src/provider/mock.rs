//! In-memory dynamic provider for exercising change callbacks.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::{ChangeCallback, Provider};
use crate::node::Node;
use crate::{ConfigError, ConfigResult, Value};

/// Flat key/value store that notifies one callback per key on change.
///
/// Callbacks run after the store's lock is released, so a callback may read
/// back from the provider.
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use tiered_config::{MockDynamicProvider, Node, Provider};
///
/// let provider = MockDynamicProvider::new("dynamic");
/// let calls = Arc::new(AtomicUsize::new(0));
/// let seen = Arc::clone(&calls);
/// provider.register_change_callback(
///     "level",
///     Arc::new(move |_: &str, _: &str, _: Option<&Node>| {
///         seen.fetch_add(1, Ordering::SeqCst);
///     }),
/// )?;
/// provider.set("level", "debug");
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// assert_eq!(provider.get("level").try_as_string().as_deref(), Some("debug"));
/// # Ok::<_, tiered_config::ConfigError>(())
/// ```
pub struct MockDynamicProvider {
    name: String,
    values: Mutex<HashMap<String, Node>>,
    callbacks: Mutex<HashMap<String, ChangeCallback>>,
    this: Weak<Self>,
}

impl MockDynamicProvider {
    /// Create an empty provider reporting values under `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            name: name.into(),
            values: Mutex::new(HashMap::new()),
            callbacks: Mutex::new(HashMap::new()),
            this: this.clone(),
        })
    }

    fn notify(&self, key: &str, data: Option<&Node>) {
        let callback = self.callbacks.lock().get(key).cloned();
        if let Some(callback) = callback {
            callback(key, &self.name, data);
        }
    }

    /// Store `value` under `key` and notify its callback.
    pub fn set(&self, key: &str, value: impl Into<Node>) {
        let node = value.into();
        self.values.lock().insert(key.to_owned(), node.clone());
        self.notify(key, Some(&node));
    }

    /// Remove `key` and notify its callback with no data.
    pub fn delete(&self, key: &str) {
        self.values.lock().remove(key);
        self.notify(key, None);
    }
}

impl Provider for MockDynamicProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Value {
        let root: Weak<dyn Provider> = self.this.clone();
        let raw = self.values.lock().get(key).cloned();
        Value::new(key, raw, &self.name).with_root(root)
    }

    fn register_change_callback(&self, key: &str, callback: ChangeCallback) -> ConfigResult<()> {
        let mut callbacks = self.callbacks.lock();
        if callbacks.contains_key(key) {
            return Err(ConfigError::CallbackRegistered {
                key: key.to_owned(),
            });
        }
        callbacks.insert(key.to_owned(), callback);
        Ok(())
    }

    fn unregister_change_callback(&self, token: &str) -> ConfigResult<()> {
        self.callbacks
            .lock()
            .remove(token)
            .map(|_| ())
            .ok_or_else(|| ConfigError::CallbackNotRegistered {
                token: token.to_owned(),
            })
    }
}
