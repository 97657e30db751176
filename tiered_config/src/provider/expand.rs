//! Variable substitution in string values.

use std::sync::{Arc, Weak};

use super::{ChangeCallback, LookupFn, Provider};
use crate::node::{Mapping, Node, Scalar};
use crate::{ConfigResult, Value};

/// Rewrites `${NAME}`, `${NAME:default}` and `$NAME` in string values.
///
/// Every string scalar of a returned value is rewritten, however deeply it
/// is nested, as is the data passed to change callbacks. Other scalars keep
/// their type, so `port: 8080` is still an integer.
///
/// ```rust
/// use std::sync::Arc;
/// use tiered_config::{ExpandProvider, Provider, TreeProvider};
///
/// let tree = TreeProvider::from_yaml_sources("yaml", ["{a: \"${1}\", b: 2}"])?;
/// let expanded = ExpandProvider::new(tree, |name: &str| (name == "1").then(|| "one".to_owned()));
/// assert_eq!(expanded.get("").to_string(), "{a: one, b: 2}");
/// # Ok::<_, tiered_config::ConfigError>(())
/// ```
pub struct ExpandProvider {
    inner: Arc<dyn Provider>,
    mapper: LookupFn,
    this: Weak<Self>,
}

impl ExpandProvider {
    /// Expand values of `inner` using `mapper`.
    #[must_use]
    pub fn new<F>(inner: Arc<dyn Provider>, mapper: F) -> Arc<Self>
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self::with_lookup(inner, Arc::new(mapper))
    }

    /// Expand values of `inner` from the process environment.
    #[must_use]
    pub fn env(inner: Arc<dyn Provider>) -> Arc<Self> {
        Self::new(inner, |name: &str| std::env::var(name).ok())
    }

    pub(crate) fn with_lookup(inner: Arc<dyn Provider>, mapper: LookupFn) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            inner,
            mapper,
            this: this.clone(),
        })
    }
}

impl Provider for ExpandProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn get(&self, key: &str) -> Value {
        let root: Weak<dyn Provider> = self.this.clone();
        self.inner
            .get(key)
            .map_nodes(|node| expand_node(node, self.mapper.as_ref()))
            .with_root(root)
    }

    fn register_change_callback(&self, key: &str, callback: ChangeCallback) -> ConfigResult<()> {
        let mapper = Arc::clone(&self.mapper);
        let expanding: ChangeCallback =
            Arc::new(move |key: &str, source: &str, data: Option<&Node>| {
                let expanded = data.cloned().map(|node| expand_node(node, mapper.as_ref()));
                callback(key, source, expanded.as_ref());
            });
        self.inner.register_change_callback(key, expanding)
    }

    fn unregister_change_callback(&self, token: &str) -> ConfigResult<()> {
        self.inner.unregister_change_callback(token)
    }
}

fn expand_node(node: Node, mapper: &(dyn Fn(&str) -> Option<String> + Send + Sync)) -> Node {
    match node {
        Node::Scalar(Scalar::String(text)) => Node::from(expand_text(&text, mapper)),
        Node::Scalar(_) => node,
        Node::Sequence(items) => items
            .iter()
            .map(|item| expand_node(item.clone(), mapper))
            .collect::<Vec<_>>()
            .into(),
        Node::Mapping(mapping) => mapping
            .iter()
            .map(|(key, value)| (key.clone(), expand_node(value.clone(), mapper)))
            .collect::<Mapping>()
            .into(),
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Substitute variables in `text`.
///
/// `${NAME}` and `$NAME` are replaced by `mapper(NAME)`. `${NAME:default}`
/// falls back to `default` when the mapper has no value, and `$$` yields a
/// literal `$`. References the mapper cannot resolve are left untouched, as
/// is an unterminated `${`.
///
/// ```rust
/// use tiered_config::expand_text;
///
/// let mapper = |name: &str| (name == "HOME").then(|| "/home/app".to_owned());
/// assert_eq!(expand_text("$HOME/cfg", &mapper), "/home/app/cfg");
/// assert_eq!(expand_text("${PORT:8080}", &mapper), "8080");
/// assert_eq!(expand_text("$$HOME ${MISSING}", &mapper), "$HOME ${MISSING}");
/// ```
pub fn expand_text(text: &str, mapper: &dyn Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some((before, after)) = rest.split_once('$') {
        out.push_str(before);
        if let Some(tail) = after.strip_prefix('$') {
            out.push('$');
            rest = tail;
        } else if let Some(braced) = after.strip_prefix('{') {
            let Some((body, tail)) = braced.split_once('}') else {
                out.push('$');
                rest = after;
                continue;
            };
            let (name, default) = match body.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (body, None),
            };
            match mapper(name).or_else(|| default.map(str::to_owned)) {
                Some(replacement) => out.push_str(&replacement),
                None => {
                    out.push_str("${");
                    out.push_str(body);
                    out.push('}');
                }
            }
            rest = tail;
        } else {
            let end = after.find(|c: char| !is_name_char(c)).unwrap_or(after.len());
            let (name, tail) = after.split_at(end);
            match (name.is_empty(), mapper(name)) {
                (false, Some(replacement)) => out.push_str(&replacement),
                _ => {
                    out.push('$');
                    out.push_str(name);
                }
            }
            rest = tail;
        }
    }
    out.push_str(rest);
    out
}
