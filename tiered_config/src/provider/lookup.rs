//! Provider backed by a lookup function such as the process environment.

use std::sync::{Arc, Weak};

use super::{ChangeCallback, LookupFn, Provider};
use crate::node::{Node, SEPARATOR};
use crate::{ConfigResult, Value};

/// Resolves each key through a function, without caching.
///
/// Found values are string scalars; the decoder coerces them to the
/// destination type.
pub struct LookupProvider {
    name: String,
    lookup: LookupFn,
    this: Weak<Self>,
}

impl LookupProvider {
    /// Wrap `lookup`, reporting values under `name`.
    #[must_use]
    pub fn new<F>(name: impl Into<String>, lookup: F) -> Arc<Self>
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Arc::new_cyclic(|this| Self {
            name: name.into(),
            lookup: Arc::new(lookup),
            this: this.clone(),
        })
    }

    /// Read keys from the process environment.
    ///
    /// Key `server.port` with prefix `APP` reads `APP_SERVER__PORT`; see
    /// [`env_key`].
    #[must_use]
    pub fn env(prefix: &str) -> Arc<Self> {
        let owned = prefix.to_owned();
        Self::new("env", move |key: &str| {
            if key.is_empty() {
                return None;
            }
            std::env::var(env_key(&owned, key)).ok()
        })
    }
}

/// Environment variable name for a dotted key.
///
/// The key is upper-cased with `.` replaced by `__`; a non-empty prefix is
/// joined with a single `_`.
///
/// ```rust
/// use tiered_config::env_key;
///
/// assert_eq!(env_key("APP", "server.port"), "APP_SERVER__PORT");
/// assert_eq!(env_key("app_", "debug"), "APP_DEBUG");
/// assert_eq!(env_key("", "log.level"), "LOG__LEVEL");
/// ```
#[must_use]
pub fn env_key(prefix: &str, key: &str) -> String {
    let body = key.to_uppercase().replace(SEPARATOR, "__");
    let stem = prefix.trim_end_matches('_');
    if stem.is_empty() {
        body
    } else {
        format!("{}_{body}", stem.to_uppercase())
    }
}

impl Provider for LookupProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Value {
        let root: Weak<dyn Provider> = self.this.clone();
        Value::new(key, (self.lookup)(key).map(Node::from), &self.name).with_root(root)
    }

    fn register_change_callback(&self, _key: &str, _callback: ChangeCallback) -> ConfigResult<()> {
        Ok(())
    }

    fn unregister_change_callback(&self, _token: &str) -> ConfigResult<()> {
        Ok(())
    }
}
