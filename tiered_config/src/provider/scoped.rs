//! Prefixing view over another provider.

use std::any::Any;
use std::sync::{Arc, Weak};

use super::{ChangeCallback, Provider};
use crate::node::join_key;
use crate::{ConfigResult, Value};

/// Serves `inner`'s subtree at `prefix` as if it were the whole document.
///
/// `get("port")` on a provider scoped to `server` asks the inner provider for
/// `server.port` and returns the value keyed `port`.
///
/// ```rust
/// use tiered_config::{Provider, ScopedProvider, TreeProvider};
///
/// let tree = TreeProvider::from_yaml_sources("yaml", ["a: {b: {c: 1}}"])?;
/// let scoped = ScopedProvider::new("a", ScopedProvider::new("b", tree));
/// assert_eq!(scoped.get("c").try_as_int(), Some(1));
/// # Ok::<_, tiered_config::ConfigError>(())
/// ```
pub struct ScopedProvider {
    prefix: String,
    inner: Arc<dyn Provider>,
    this: Weak<Self>,
}

impl ScopedProvider {
    /// Scope `inner` to `prefix`.
    ///
    /// Scoping a scoped provider concatenates the prefixes and wraps the
    /// innermost provider directly.
    #[must_use]
    pub fn new(prefix: &str, inner: Arc<dyn Provider>) -> Arc<Self> {
        let nested = (inner.as_ref() as &dyn Any)
            .downcast_ref::<Self>()
            .map(|scoped| (join_key(prefix, &scoped.prefix), Arc::clone(&scoped.inner)));
        let (prefix, inner) = nested.unwrap_or_else(|| (prefix.to_owned(), inner));
        Arc::new_cyclic(|this| Self {
            prefix,
            inner,
            this: this.clone(),
        })
    }

    /// Prefix prepended to every key.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Provider for ScopedProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn get(&self, key: &str) -> Value {
        let root: Weak<dyn Provider> = self.this.clone();
        self.inner
            .get(&join_key(&self.prefix, key))
            .rekeyed(key)
            .with_root(root)
    }

    fn register_change_callback(&self, key: &str, callback: ChangeCallback) -> ConfigResult<()> {
        self.inner
            .register_change_callback(&join_key(&self.prefix, key), callback)
    }

    fn unregister_change_callback(&self, token: &str) -> ConfigResult<()> {
        self.inner
            .unregister_change_callback(&join_key(&self.prefix, token))
    }
}
