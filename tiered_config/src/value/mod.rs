//! Handles to the result of a single provider lookup.

mod coerce;
mod duration;

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, SystemTime};

use crate::decode::{Decoder, Populate};
use crate::error::{ConfigError, DecodeResult};
use crate::node::{Node, join_key};
use crate::provider::{ChangeCallback, Provider};
use crate::ConfigResult;

pub(crate) use coerce::Coerce;
pub use duration::{ParseDurationError, parse_duration};

/// Immutable result of looking up one key.
///
/// A value remembers where it came from: the key, the raw node if the key
/// was found, an optional default, the name of the producing provider and a
/// non-owning reference to the provider that should resolve nested keys
/// (normally the [`crate::ProviderGroup`] the lookup went through).
///
/// ```rust
/// use tiered_config::{Provider, TreeProvider};
///
/// let provider = TreeProvider::from_yaml_sources("yaml", ["server: {port: 8080}"])?;
/// let port = provider.get("server.port");
/// assert!(port.has_value());
/// assert_eq!(port.try_as_int(), Some(8080));
/// assert_eq!(port.source(), "yaml");
///
/// let missing = provider.get("server.host").with_default("localhost");
/// assert!(missing.is_default());
/// assert_eq!(missing.to_string(), "localhost");
/// # Ok::<_, tiered_config::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Value {
    key: String,
    raw: Option<Node>,
    default: Option<Node>,
    source: Arc<str>,
    root: Option<Weak<dyn Provider>>,
    timestamp: SystemTime,
    error: Option<Arc<ConfigError>>,
}

impl Value {
    /// Build a value for `key`; `raw` is `None` when the key was not found.
    #[must_use]
    pub fn new(key: impl Into<String>, raw: Option<Node>, source: &str) -> Self {
        Self {
            key: key.into(),
            raw,
            default: None,
            source: Arc::from(source),
            root: None,
            timestamp: SystemTime::now(),
            error: None,
        }
    }

    /// Build a value recording that `key` was not found.
    #[must_use]
    pub fn not_found(key: impl Into<String>, source: &str) -> Self {
        Self::new(key, None, source)
    }

    /// Attach the provider that nested lookups should go through.
    #[must_use]
    pub fn with_root(mut self, root: Weak<dyn Provider>) -> Self {
        self.root = Some(root);
        self
    }

    /// Return a copy carrying `default` as the fallback value.
    ///
    /// Whether the key was found is unchanged; the default only shows through
    /// [`Value::value`] when the lookup came back empty.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Node>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub(crate) fn with_error(mut self, error: ConfigError) -> Self {
        self.error = Some(Arc::new(error));
        self
    }

    pub(crate) fn rekeyed(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub(crate) fn map_nodes(mut self, mut rewrite: impl FnMut(Node) -> Node) -> Self {
        self.raw = self.raw.map(&mut rewrite);
        self.default = self.default.map(rewrite);
        self
    }

    /// Key this value was looked up with.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw node returned by the provider, ignoring any default.
    #[must_use]
    pub const fn raw(&self) -> Option<&Node> {
        self.raw.as_ref()
    }

    /// Effective node: the raw node if found, otherwise the default.
    #[must_use]
    pub fn value(&self) -> Option<&Node> {
        self.raw.as_ref().or(self.default.as_ref())
    }

    /// Returns `true` when the key was found or a default is attached.
    #[must_use]
    pub const fn has_value(&self) -> bool {
        self.raw.is_some() || self.default.is_some()
    }

    /// Returns `true` when the effective value comes from the default.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.raw.is_none() && self.default.is_some()
    }

    /// Name of the provider that produced the value; empty when none did.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Time the value was produced.
    #[must_use]
    pub const fn last_updated(&self) -> SystemTime {
        self.timestamp
    }

    /// Error recorded while producing the value, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ConfigError> {
        self.error.as_deref()
    }

    fn scalar<T: Coerce>(&self) -> Option<T> {
        self.value()?.as_scalar().and_then(T::coerce)
    }

    /// Effective value rendered as text.
    ///
    /// Scalars render plainly; sequences and mappings render in flow style.
    /// Null and absent values yield `None`.
    #[must_use]
    pub fn try_as_string(&self) -> Option<String> {
        match self.value()? {
            Node::Scalar(scalar) => String::coerce(scalar),
            other => Some(other.to_string()),
        }
    }

    /// Effective value as an `i64`, if it converts without loss.
    #[must_use]
    pub fn try_as_int(&self) -> Option<i64> {
        self.scalar()
    }

    /// Effective value as an `f64`.
    #[must_use]
    pub fn try_as_float(&self) -> Option<f64> {
        self.scalar()
    }

    /// Effective value as a `bool`, accepting `1`, `t`, `true` and their
    /// negative counterparts.
    #[must_use]
    pub fn try_as_bool(&self) -> Option<bool> {
        self.scalar()
    }

    /// Effective value parsed with [`parse_duration`].
    #[must_use]
    pub fn try_as_duration(&self) -> Option<Duration> {
        parse_duration(&self.try_as_string()?).ok()
    }

    #[track_caller]
    fn expect_kind<T>(&self, converted: Option<T>, kind: &str) -> T {
        match converted {
            Some(value) => value,
            None => panic!(
                "key '{}': can't convert {} to {kind}",
                self.key,
                self.value()
                    .map_or_else(|| String::from("<absent>"), |node| format!("\"{node}\"")),
            ),
        }
    }

    /// Effective value as text.
    ///
    /// # Panics
    ///
    /// Panics when [`Value::try_as_string`] returns `None`.
    #[must_use]
    #[track_caller]
    pub fn as_string(&self) -> String {
        self.expect_kind(self.try_as_string(), "string")
    }

    /// Effective value as an `i64`.
    ///
    /// # Panics
    ///
    /// Panics when [`Value::try_as_int`] returns `None`.
    #[must_use]
    #[track_caller]
    pub fn as_int(&self) -> i64 {
        self.expect_kind(self.try_as_int(), "i64")
    }

    /// Effective value as an `f64`.
    ///
    /// # Panics
    ///
    /// Panics when [`Value::try_as_float`] returns `None`.
    #[must_use]
    #[track_caller]
    pub fn as_float(&self) -> f64 {
        self.expect_kind(self.try_as_float(), "f64")
    }

    /// Effective value as a `bool`.
    ///
    /// # Panics
    ///
    /// Panics when [`Value::try_as_bool`] returns `None`.
    #[must_use]
    #[track_caller]
    pub fn as_bool(&self) -> bool {
        self.expect_kind(self.try_as_bool(), "bool")
    }

    /// Stringified keys or indices of the effective value's children.
    #[must_use]
    pub fn child_keys(&self) -> Vec<String> {
        self.value().map(Node::child_keys).unwrap_or_default()
    }

    /// Look up `child` relative to this value's key.
    ///
    /// The lookup goes through the value's root provider so that every layer
    /// of a group is consulted. Detached values (and defaults) resolve
    /// against their own node.
    #[must_use]
    pub fn get(&self, child: &str) -> Self {
        self.resolver().get(&join_key(&self.key, child))
    }

    /// Populate `target` from this value and everything below its key.
    ///
    /// # Errors
    ///
    /// Returns the first [`crate::DecodeError`] raised while walking the
    /// destination. Fields populated before the failure keep their values.
    pub fn populate<T: Populate + ?Sized>(&self, target: &mut T) -> DecodeResult<()> {
        let provider = self.resolver();
        let mut decoder = Decoder::new(provider.as_ref());
        target.populate(&mut decoder, &self.key, None)
    }

    fn resolver(&self) -> Arc<dyn Provider> {
        let root = self
            .root
            .as_ref()
            .filter(|_| !self.is_default())
            .and_then(Weak::upgrade);
        match root {
            Some(provider) => provider,
            None => Arc::new(Detached {
                key: self.key.clone(),
                node: self.value().cloned(),
                source: Arc::clone(&self.source),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(node) => node.fmt(f),
            None => Ok(()),
        }
    }
}

/// Serves one value's node at its key when no live root is available.
struct Detached {
    key: String,
    node: Option<Node>,
    source: Arc<str>,
}

impl Detached {
    fn relative<'a>(&self, key: &'a str) -> Option<&'a str> {
        if self.key.is_empty() {
            return Some(key);
        }
        if key == self.key {
            return Some("");
        }
        key.strip_prefix(self.key.as_str())?.strip_prefix('.')
    }
}

impl Provider for Detached {
    fn name(&self) -> &str {
        &self.source
    }

    fn get(&self, key: &str) -> Value {
        let found = self
            .relative(key)
            .and_then(|path| self.node.as_ref()?.find(path))
            .cloned();
        Value::new(key, found, &self.source)
    }

    fn register_change_callback(&self, _key: &str, _callback: ChangeCallback) -> ConfigResult<()> {
        Ok(())
    }

    fn unregister_change_callback(&self, _token: &str) -> ConfigResult<()> {
        Ok(())
    }
}
