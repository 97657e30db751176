//! Fan-out of change callbacks over single-callback providers.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::{ChangeCallback, Provider};
use crate::node::Node;
use crate::{ConfigError, ConfigResult, Value};

type Registry = RwLock<HashMap<String, Vec<ChangeCallback>>>;

/// Accepts any number of callbacks per key.
///
/// The first registration for a key installs one fan-out callback on the
/// inner provider; the fan-out invokes every registered callback in
/// registration order while holding a read lock, so callbacks must not
/// register or unregister on the same provider.
pub struct MultiCallbackProvider {
    inner: Arc<dyn Provider>,
    callbacks: Arc<Registry>,
    this: Weak<Self>,
}

impl MultiCallbackProvider {
    /// Wrap `inner`.
    #[must_use]
    pub fn new(inner: Arc<dyn Provider>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            inner,
            callbacks: Arc::new(RwLock::new(HashMap::new())),
            this: this.clone(),
        })
    }

    fn fan_out(&self, key: &str) -> ChangeCallback {
        let registry = Arc::downgrade(&self.callbacks);
        let registered_key = key.to_owned();
        Arc::new(move |key: &str, source: &str, data: Option<&Node>| {
            let Some(registry) = registry.upgrade() else {
                return;
            };
            if let Some(callbacks) = registry.read().get(&registered_key) {
                for callback in callbacks {
                    callback(key, source, data);
                }
            }
        })
    }
}

impl Provider for MultiCallbackProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn get(&self, key: &str) -> Value {
        let root: Weak<dyn Provider> = self.this.clone();
        self.inner.get(key).with_root(root)
    }

    fn register_change_callback(&self, key: &str, callback: ChangeCallback) -> ConfigResult<()> {
        let mut callbacks = self.callbacks.write();
        if !callbacks.contains_key(key) {
            self.inner
                .register_change_callback(key, self.fan_out(key))?;
        }
        callbacks.entry(key.to_owned()).or_default().push(callback);
        Ok(())
    }

    /// Remove the most recently registered callback for `token`.
    fn unregister_change_callback(&self, token: &str) -> ConfigResult<()> {
        let mut callbacks = self.callbacks.write();
        let Some(registered) = callbacks.get_mut(token) else {
            return Err(ConfigError::CallbackNotRegistered {
                token: token.to_owned(),
            });
        };
        registered.pop();
        if registered.is_empty() {
            callbacks.remove(token);
            self.inner.unregister_change_callback(token)?;
        }
        Ok(())
    }
}
