//! Configuration sources and the wrappers that compose them.
//!
//! Every source implements [`Provider`]. Providers are shared as
//! `Arc<dyn Provider>` and are built through constructors that return an
//! `Arc`, so values can carry a weak reference back to the provider that
//! should resolve their nested keys.

mod cached;
mod cli;
mod expand;
mod group;
mod lookup;
mod mock;
mod multi;
mod scoped;
mod static_data;
mod tree;

use std::any::Any;
use std::sync::Arc;

use crate::node::Node;
use crate::{ConfigResult, Value};

pub use cached::CachedProvider;
pub use cli::{command_line_provider, command_line_provider_from_args};
pub use expand::{ExpandProvider, expand_text};
pub use group::ProviderGroup;
pub use lookup::{LookupProvider, env_key};
pub use mock::MockDynamicProvider;
pub use multi::MultiCallbackProvider;
pub use scoped::ScopedProvider;
pub use static_data::static_provider;
pub use tree::TreeProvider;

/// Callback invoked when the value behind a key changes.
///
/// Arguments are the key, the name of the provider reporting the change and
/// the new node (`None` when the key was removed).
pub type ChangeCallback = Arc<dyn Fn(&str, &str, Option<&Node>) + Send + Sync>;

/// Mapper from a variable name to its replacement text.
pub type LookupFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// A source of configuration values addressed by dotted keys.
///
/// `get` never fails: a missing key produces a [`Value`] whose
/// [`Value::has_value`] is `false`. Callback registration uses the key as
/// the token for unregistering.
pub trait Provider: Any + Send + Sync {
    /// Name reported as the source of produced values.
    fn name(&self) -> &str;

    /// Look up `key`. The empty key addresses the whole document.
    fn get(&self, key: &str) -> Value;

    /// Ask to be notified when the value behind `key` changes.
    ///
    /// # Errors
    ///
    /// Providers that accept a single callback per key return
    /// [`crate::ConfigError::CallbackRegistered`] on a second registration.
    fn register_change_callback(&self, key: &str, callback: ChangeCallback) -> ConfigResult<()>;

    /// Remove the callback registered under `token`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::CallbackNotRegistered`] when the
    /// provider tracks callbacks and none is registered for `token`.
    fn unregister_change_callback(&self, token: &str) -> ConfigResult<()>;
}

/// Provider that never finds anything.
///
/// Useful as a placeholder slot in a [`ProviderGroup`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NopProvider;

impl Provider for NopProvider {
    fn name(&self) -> &str {
        "nop"
    }

    fn get(&self, key: &str) -> Value {
        Value::not_found(key, self.name())
    }

    fn register_change_callback(&self, _key: &str, _callback: ChangeCallback) -> ConfigResult<()> {
        Ok(())
    }

    fn unregister_change_callback(&self, _token: &str) -> ConfigResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests;
