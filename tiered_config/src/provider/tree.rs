//! Provider backed by a merged document tree.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use camino::Utf8Path;
use figment::Figment;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

use super::{ChangeCallback, Provider};
use crate::node::{Node, merge_documents};
use crate::{ConfigError, ConfigResult, Value};

/// Serves values out of an immutable node tree.
///
/// Values are memoized per exact key string. Change callbacks are accepted
/// and ignored because the tree never changes after construction.
pub struct TreeProvider {
    name: String,
    root: Node,
    memo: Mutex<HashMap<String, Value>>,
    this: Weak<Self>,
}

impl TreeProvider {
    /// Wrap an existing tree.
    #[must_use]
    pub fn from_node(name: impl Into<String>, root: Node) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            name: name.into(),
            root,
            memo: Mutex::new(HashMap::new()),
            this: this.clone(),
        })
    }

    /// Parse YAML documents and merge them left to right.
    ///
    /// Later documents override earlier ones key by key. Each document must
    /// have a mapping at its root; an empty document counts as an empty
    /// mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`], [`ConfigError::NonMappingRoot`] or
    /// [`ConfigError::MergeConflict`]. Nothing is built when any document
    /// fails.
    pub fn from_yaml_sources<I, S>(name: &str, sources: I) -> ConfigResult<Arc<Self>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let documents = sources
            .into_iter()
            .enumerate()
            .map(|(index, text)| {
                let label = format!("{name}[{index}]");
                let node = Node::from_yaml_str(&label, text.as_ref())?;
                Ok((label, node))
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(Self::from_node(name, merge_documents(documents)?))
    }

    /// Read YAML files and merge them left to right, later files winning.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::File`] when a file cannot be read, and the
    /// errors of [`TreeProvider::from_yaml_sources`] otherwise.
    pub fn from_yaml_files<I, P>(name: &str, paths: I) -> ConfigResult<Arc<Self>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Utf8Path>,
    {
        let documents = paths
            .into_iter()
            .map(|candidate| {
                let path = candidate.as_ref();
                debug!(path = %path, "reading configuration file");
                let contents =
                    std::fs::read_to_string(path).map_err(|source| ConfigError::File {
                        path: path.to_path_buf(),
                        source,
                    })?;
                Ok((path.to_string(), Node::from_yaml_str(path.as_str(), &contents)?))
            })
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(Self::from_node(name, merge_documents(documents)?))
    }

    /// Serve any serialisable value through the same node model YAML uses.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] when `data` cannot be serialised.
    pub fn from_serialize<T: Serialize + ?Sized>(
        name: impl Into<String>,
        data: &T,
    ) -> ConfigResult<Arc<Self>> {
        Ok(Self::from_node(name, Node::from_serialize(data)?))
    }

    /// Extract a [`Figment`] into a tree.
    ///
    /// This lets any Figment stack (TOML files, JSON, prefixed environment
    /// variables) take part in a [`crate::ProviderGroup`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Gathering`] when extraction fails.
    pub fn from_figment(name: impl Into<String>, figment: &Figment) -> ConfigResult<Arc<Self>> {
        let root: Node = figment.extract()?;
        Ok(Self::from_node(name, root))
    }

    /// The merged tree.
    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }
}

impl Provider for TreeProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Value {
        let mut memo = self.memo.lock();
        if let Some(value) = memo.get(key) {
            return value.clone();
        }
        let root: Weak<dyn Provider> = self.this.clone();
        let value = Value::new(key, self.root.find(key).cloned(), &self.name).with_root(root);
        memo.insert(key.to_owned(), value.clone());
        value
    }

    fn register_change_callback(&self, _key: &str, _callback: ChangeCallback) -> ConfigResult<()> {
        Ok(())
    }

    fn unregister_change_callback(&self, _token: &str) -> ConfigResult<()> {
        Ok(())
    }
}
