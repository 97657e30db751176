//! Ordered, first-match composition of providers.

use std::sync::{Arc, Weak};

use tracing::debug;

use super::{ChangeCallback, Provider};
use crate::{ConfigResult, Value};

/// Providers consulted in priority order, highest first.
///
/// A lookup returns the first result that was actually found; a default
/// attached by a higher-priority provider never hides a real value further
/// down the list. Returned values are rooted on the group, so nested
/// population resolves child keys through every layer again.
///
/// ```rust
/// use std::sync::Arc;
/// use tiered_config::{Provider, ProviderGroup, TreeProvider};
///
/// let overrides = TreeProvider::from_yaml_sources("overrides", ["port: 9090"])?;
/// let base = TreeProvider::from_yaml_sources("base", ["port: 8080\nhost: example.org"])?;
/// let layers: Vec<Arc<dyn Provider>> = vec![overrides, base];
/// let group = ProviderGroup::new("config", layers);
/// assert_eq!(group.get("port").try_as_int(), Some(9090));
/// assert_eq!(group.get("host").source(), "base");
/// # Ok::<_, tiered_config::ConfigError>(())
/// ```
pub struct ProviderGroup {
    name: String,
    providers: Vec<Arc<dyn Provider>>,
    this: Weak<Self>,
}

impl ProviderGroup {
    /// Create a group over `providers`, highest priority first.
    #[must_use]
    pub fn new(name: impl Into<String>, providers: Vec<Arc<dyn Provider>>) -> Arc<Self> {
        let group_name = name.into();
        debug!(group = %group_name, providers = providers.len(), "building provider group");
        Arc::new_cyclic(|this| Self {
            name: group_name,
            providers,
            this: this.clone(),
        })
    }

    /// Member providers in priority order.
    #[must_use]
    pub fn providers(&self) -> &[Arc<dyn Provider>] {
        &self.providers
    }

    fn root(&self) -> Weak<dyn Provider> {
        self.this.clone()
    }
}

impl Provider for ProviderGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Value {
        self.providers
            .iter()
            .map(|provider| provider.get(key))
            .find(|value| value.has_value() && !value.is_default())
            .unwrap_or_else(|| Value::not_found(key, &self.name))
            .with_root(self.root())
    }

    fn register_change_callback(&self, key: &str, callback: ChangeCallback) -> ConfigResult<()> {
        self.providers
            .iter()
            .map(|provider| provider.register_change_callback(key, Arc::clone(&callback)))
            .fold(Ok(()), |first, outcome| first.and(outcome))
    }

    fn unregister_change_callback(&self, token: &str) -> ConfigResult<()> {
        self.providers
            .iter()
            .map(|provider| provider.unregister_change_callback(token))
            .fold(Ok(()), |first, outcome| first.and(outcome))
    }
}
