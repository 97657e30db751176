//! Static in-memory data, mostly for tests.

use std::sync::Arc;

use serde::Serialize;

use super::TreeProvider;
use crate::ConfigResult;

/// Build a provider named `static` that serves `data`.
///
/// The data is converted through the same node model documents use, so a
/// struct served this way decodes exactly like the equivalent YAML.
///
/// ```rust
/// use serde::Serialize;
/// use tiered_config::{Provider, static_provider};
///
/// #[derive(Serialize)]
/// struct Limits {
///     max_connections: u32,
/// }
///
/// let provider = static_provider(&Limits { max_connections: 64 })?;
/// assert_eq!(provider.get("max_connections").try_as_int(), Some(64));
/// assert_eq!(provider.name(), "static");
/// # Ok::<_, tiered_config::ConfigError>(())
/// ```
///
/// # Errors
///
/// Returns [`crate::ConfigError::Serialize`] when `data` cannot be serialised.
pub fn static_provider<T: Serialize + ?Sized>(data: &T) -> ConfigResult<Arc<TreeProvider>> {
    TreeProvider::from_serialize("static", data)
}
