//! Read-through cache kept fresh by change callbacks.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{trace, warn};

use super::{ChangeCallback, Provider};
use crate::node::Node;
use crate::{ConfigResult, Value};

/// Caches values of a dynamic provider.
///
/// The first lookup of a key registers a change callback with the inner
/// provider and stores the fetched value; later lookups are served from the
/// cache, which the callback updates. If the callback cannot be registered
/// the lookup returns a value with no data that carries the registration
/// error, and nothing is cached.
pub struct CachedProvider {
    inner: Arc<dyn Provider>,
    cache: RwLock<HashMap<String, Value>>,
    this: Weak<Self>,
}

impl CachedProvider {
    /// Cache lookups against `inner`.
    #[must_use]
    pub fn new(inner: Arc<dyn Provider>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            inner,
            cache: RwLock::new(HashMap::new()),
            this: this.clone(),
        })
    }

    fn root(&self) -> Weak<dyn Provider> {
        self.this.clone()
    }

    fn refresh_callback(&self, key: &str) -> ChangeCallback {
        let this = self.this.clone();
        let cached_key = key.to_owned();
        Arc::new(move |_: &str, source: &str, data: Option<&Node>| {
            let Some(cached) = this.upgrade() else {
                return;
            };
            trace!(key = %cached_key, source, "refreshing cached value");
            let value = Value::new(cached_key.clone(), data.cloned(), source).with_root(cached.root());
            cached.cache.write().insert(cached_key.clone(), value);
        })
    }
}

impl Provider for CachedProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn get(&self, key: &str) -> Value {
        if let Some(value) = self.cache.read().get(key) {
            return value.clone();
        }
        let mut cache = self.cache.write();
        if let Some(value) = cache.get(key) {
            return value.clone();
        }
        if let Err(err) = self
            .inner
            .register_change_callback(key, self.refresh_callback(key))
        {
            warn!(key, error = %err, "cannot watch key; value will not be cached");
            return Value::not_found(key, self.name())
                .with_error(err)
                .with_root(self.root());
        }
        let value = self.inner.get(key).with_root(self.root());
        trace!(key, "caching value");
        cache.insert(key.to_owned(), value.clone());
        value
    }

    fn register_change_callback(&self, _key: &str, _callback: ChangeCallback) -> ConfigResult<()> {
        Ok(())
    }

    fn unregister_change_callback(&self, _token: &str) -> ConfigResult<()> {
        Ok(())
    }
}
