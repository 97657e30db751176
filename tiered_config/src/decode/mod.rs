//! Type-directed population of destinations from providers.
//!
//! Each destination type implements [`Populate`], which fixes its [`Shape`]
//! at compile time and knows how to fill itself from the value at a key.
//! Composite types recurse into their children by calling back into the
//! [`Decoder`] with child keys, so every nested lookup goes through the
//! complete provider precedence chain.

mod collections;
mod generic;
mod pointer;
mod record;
mod scalar;
mod text;

use std::iter;

use crate::error::{DecodeError, DecodeResult};
use crate::node::{Node, join_key};
use crate::provider::Provider;
use crate::value::{Coerce, Value};

pub use record::{FieldDescriptor, Record, RecordDescriptor, Validate};
pub use text::populate_from_str;

/// Structural category of a destination type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A single primitive value.
    Scalar,
    /// A value that may be absent or is reached through a pointer.
    Optional,
    /// A struct with named fields.
    Record,
    /// A growable list.
    Sequence,
    /// An array of fixed length.
    FixedSequence,
    /// Keyed entries.
    Map,
    /// A type parsed from its text form.
    CustomText,
    /// A raw node taken as is.
    Generic,
}

/// A destination that can be filled from the value at a key.
///
/// Implementations leave `self` untouched when the key has no value and no
/// default applies. Use `#[derive(Populate)]` for structs and unit enums.
pub trait Populate {
    /// Structural category of the type.
    const SHAPE: Shape;

    /// Fill `self` from the value at `key`.
    ///
    /// `default` is the field-level default literal, used by scalar and
    /// textual destinations when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns the first [`DecodeError`] encountered. Children populated
    /// before the failure keep their new values.
    fn populate(
        &mut self,
        decoder: &mut Decoder<'_>,
        key: &str,
        default: Option<&str>,
    ) -> DecodeResult<()>;

    /// Build a value straight from a raw node.
    ///
    /// Only generic destinations support this; others return `None` and are
    /// populated field by field instead.
    fn from_raw(_key: &str, _raw: &Node) -> Option<DecodeResult<Self>>
    where
        Self: Sized,
    {
        None
    }
}

/// State of one top-level populate call.
///
/// Holds the provider that resolves every key and the identities of shared
/// pointers already entered, which is how cycles in the destination graph
/// are detected.
pub struct Decoder<'p> {
    provider: &'p dyn Provider,
    visited: Vec<(usize, String)>,
}

impl<'p> Decoder<'p> {
    /// Start a decode against `provider`.
    #[must_use]
    pub fn new(provider: &'p dyn Provider) -> Self {
        Self {
            provider,
            visited: Vec::new(),
        }
    }

    /// Look up `key` through the provider.
    #[must_use]
    pub fn get(&self, key: &str) -> Value {
        self.provider.get(key)
    }

    /// Effective node at `key`, treating null as absent.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<Node> {
        self.get(key).value().filter(|node| !node.is_null()).cloned()
    }

    /// Text form of the value at `key`, falling back to `default`.
    ///
    /// Scalars render plainly and composite nodes render in flow style.
    #[must_use]
    pub fn text(&self, key: &str, default: Option<&str>) -> Option<String> {
        match self.lookup(key) {
            Some(Node::Scalar(scalar)) => String::coerce(&scalar),
            Some(other) => Some(other.to_string()),
            None => default.map(str::to_owned),
        }
    }

    pub(crate) fn scalar<T: Coerce>(
        &self,
        key: &str,
        default: Option<&str>,
    ) -> DecodeResult<Option<T>> {
        let node = match (self.lookup(key), default) {
            (Some(node), _) => node,
            (None, Some(literal)) => Node::from(literal),
            (None, None) => return Ok(None),
        };
        node.as_scalar()
            .and_then(T::coerce)
            .map(Some)
            .ok_or_else(|| DecodeError::Conversion {
                key: key.to_owned(),
                literal: node.to_string(),
                source_kind: node.type_name(),
                target_kind: T::KIND,
            })
    }

    /// Record entry into the pointer at address `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Cycle`] when the address was already entered
    /// during this populate call.
    pub fn enter(&mut self, identity: usize, key: &str) -> DecodeResult<()> {
        if identity != 0 && self.visited.iter().any(|(seen, _)| *seen == identity) {
            let chain = self
                .visited
                .iter()
                .map(|(address, path)| format!("{path}@{address:#x}"))
                .chain(iter::once(format!("{key}@{identity:#x}")))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(DecodeError::Cycle {
                key: key.to_owned(),
                chain,
            });
        }
        self.visited.push((identity, key.to_owned()));
        Ok(())
    }

    /// Check that every required field of a record has a value.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Validation`] naming the first missing field.
    pub fn check_required(&self, key: &str, descriptor: &RecordDescriptor) -> DecodeResult<()> {
        for field in descriptor.fields.iter().filter(|field| field.required) {
            let field_key = join_key(key, field.key);
            if self.lookup(&field_key).is_none() && field.default.is_none() {
                return Err(DecodeError::validation(
                    &field_key,
                    format!("{} requires field '{}'", descriptor.name, field.field),
                ));
            }
        }
        Ok(())
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
