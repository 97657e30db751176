//! Generic document tree shared by every provider.
//!
//! Parsed documents, environment lookups and command-line flags all end up as
//! [`Node`] values. A node is a scalar, an ordered sequence, or a mapping whose
//! keys are scalars. Nodes are immutable once built and cheap to clone: the
//! children of sequences and mappings live behind an [`Arc`], so handing a raw
//! node out of a provider shares the original storage instead of copying it.
//!
//! Dotted paths are resolved with [`Node::find`], which matches each segment
//! case-insensitively against the children of the current node.

mod merge;
mod parse;
mod render;

use std::sync::{Arc, OnceLock};

use uncased::UncasedStr;

pub use merge::merge;
pub(crate) use merge::merge_documents;
pub use render::format_float;

/// Separator between segments of a key path.
pub const SEPARATOR: char = '.';

/// Key addressing the root of a document.
pub const ROOT: &str = "";

/// Join a parent key and a child segment with [`SEPARATOR`].
///
/// An empty parent yields the child unchanged and an empty child yields the
/// parent, so joining against [`ROOT`] never produces a leading dot.
///
/// # Examples
///
/// ```rust
/// use tiered_config::join_key;
///
/// assert_eq!(join_key("server", "port"), "server.port");
/// assert_eq!(join_key("", "port"), "port");
/// assert_eq!(join_key("server", ""), "server");
/// ```
#[must_use]
pub fn join_key(parent: &str, child: &str) -> String {
    match (parent.is_empty(), child.is_empty()) {
        (true, _) => child.to_owned(),
        (false, true) => parent.to_owned(),
        (false, false) => format!("{parent}{SEPARATOR}{child}"),
    }
}

/// Untyped leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Explicit null (`~`, `null`, or an absent optional in static data).
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Integer that fits in an `i64`.
    Int(i64),
    /// Positive integer above `i64::MAX`.
    UInt(u64),
    /// Floating-point literal.
    Float(f64),
    /// Any other text.
    String(String),
}

impl Scalar {
    /// Short name of the scalar kind used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    /// Returns `true` for [`Scalar::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Structural classification of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A leaf value.
    Scalar,
    /// An ordered list of nodes.
    Sequence,
    /// Scalar-keyed entries.
    Mapping,
}

/// A node of a parsed configuration document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Leaf value.
    Scalar(Scalar),
    /// Ordered children addressed by index.
    Sequence(Arc<[Node]>),
    /// Keyed children.
    Mapping(Arc<Mapping>),
}

impl Node {
    /// The null node.
    #[must_use]
    pub const fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    /// An empty mapping, the starting point of every merged document.
    #[must_use]
    pub fn empty_mapping() -> Self {
        Self::Mapping(Arc::new(Mapping::default()))
    }

    /// Structural kind of the node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Scalar(_) => NodeKind::Scalar,
            Self::Sequence(_) => NodeKind::Sequence,
            Self::Mapping(_) => NodeKind::Mapping,
        }
    }

    /// Short name of the node kind used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(scalar) => scalar.type_name(),
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    /// Returns `true` for a null scalar.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }

    /// Borrow the scalar payload, if any.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Borrow the sequence payload, if any.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the mapping payload, if any.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Borrow the text of a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(text)) => Some(text),
            _ => None,
        }
    }

    /// Resolve a dotted path relative to this node.
    ///
    /// The empty path returns the node itself. Each segment is compared
    /// case-insensitively with the stringified keys of a mapping, or with the
    /// decimal indices of a sequence. Lookup stops as soon as a segment has no
    /// match or the current node is a scalar.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tiered_config::Node;
    ///
    /// let doc = Node::from_yaml_str("inline", "Server:\n  Hosts: [a, b]\n")?;
    /// let host = doc.find("server.hosts.1").and_then(Node::as_str);
    /// assert_eq!(host, Some("b"));
    /// assert!(doc.find("server.port").is_none());
    /// # Ok::<_, tiered_config::ConfigError>(())
    /// ```
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Self> {
        if path.is_empty() {
            return Some(self);
        }
        path.split(SEPARATOR)
            .try_fold(self, |node, segment| node.child(segment))
    }

    fn child(&self, segment: &str) -> Option<&Self> {
        match self {
            Self::Scalar(_) => None,
            Self::Sequence(items) => {
                let index: usize = segment.parse().ok()?;
                // "01" and "+1" are not the rendering of any index.
                if index.to_string() != segment {
                    return None;
                }
                items.get(index)
            }
            Self::Mapping(mapping) => mapping.find_child(segment),
        }
    }

    /// Stringified keys (for mappings) or indices (for sequences) of the
    /// node's direct children, in document order.
    #[must_use]
    pub fn child_keys(&self) -> Vec<String> {
        match self {
            Self::Scalar(_) => Vec::new(),
            Self::Sequence(items) => (0..items.len()).map(|i| i.to_string()).collect(),
            Self::Mapping(mapping) => mapping.children().iter().map(|(k, _)| k.clone()).collect(),
        }
    }
}

/// Mapping entries with lazily stringified keys.
///
/// Entries keep their document order. The `(stringified key, child)` view
/// used for path matching is computed on first use and cached for the
/// lifetime of the mapping.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: Vec<(Scalar, Node)>,
    children: OnceLock<Vec<(String, Node)>>,
}

impl Mapping {
    /// Create an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            children: OnceLock::new(),
        }
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the mapping has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate the raw entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&Scalar, &Node)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Entries keyed by their rendered key, computed once and memoized.
    #[must_use]
    pub fn children(&self) -> &[(String, Node)] {
        self.children.get_or_init(|| {
            self.entries
                .iter()
                .map(|(key, value)| (render::scalar_text(key), value.clone()))
                .collect()
        })
    }

    /// Look up an entry whose rendered key equals `key` exactly.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.children()
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }

    fn find_child(&self, segment: &str) -> Option<&Node> {
        let wanted = UncasedStr::new(segment);
        self.children()
            .iter()
            .find(|(name, _)| UncasedStr::new(name) == wanted)
            .map(|(_, node)| node)
    }

    /// Insert or replace the entry whose rendered key matches `key`.
    pub fn insert(&mut self, key: impl Into<Scalar>, value: impl Into<Node>) {
        let scalar = key.into();
        let rendered = render::scalar_text(&scalar);
        let node = value.into();
        self.children = OnceLock::new();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| render::scalar_text(existing) == rendered)
        {
            Some(slot) => slot.1 = node,
            None => self.entries.push((scalar, node)),
        }
    }

    /// Entry matching `key` case-insensitively, as lookups do.
    pub(crate) fn entry_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.children = OnceLock::new();
        let wanted = UncasedStr::new(key);
        self.entries
            .iter_mut()
            .find(|(existing, _)| UncasedStr::new(&render::scalar_text(existing)) == wanted)
            .map(|(_, node)| node)
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K, V> FromIterator<(K, V)> for Mapping
where
    K: Into<Scalar>,
    V: Into<Node>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or(Self::UInt(value), Self::Int)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

macro_rules! node_from_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for Node {
            fn from(value: $ty) -> Self {
                Self::Scalar(Scalar::from(value))
            }
        }
    )*};
}

node_from_scalar!(&str, String, bool, i64, u64, f64);

impl From<Mapping> for Node {
    fn from(value: Mapping) -> Self {
        Self::Mapping(Arc::new(value))
    }
}

impl From<Vec<Self>> for Node {
    fn from(value: Vec<Self>) -> Self {
        Self::Sequence(value.into())
    }
}

#[cfg(test)]
mod tests;
