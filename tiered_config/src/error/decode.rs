//! Errors raised while populating a destination from providers.

use std::error::Error as StdError;

use thiserror::Error;

/// Result alias returned by [`crate::Populate`] implementations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Failures reported by the decoder.
///
/// Every variant stops the current populate call. Fields assigned before the
/// failing field keep their new values.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// A source value cannot be represented by the destination type.
    #[error("key '{key}': can't convert \"{literal}\" ({source_kind}) to {target_kind}")]
    Conversion {
        /// Dotted key of the value.
        key: String,
        /// Rendered source value.
        literal: String,
        /// Kind of the source node.
        source_kind: &'static str,
        /// Name of the destination type.
        target_kind: &'static str,
    },

    /// A textual parser rejected the value; `message` is the parser's own text.
    #[error("key '{key}': {message}")]
    Parse {
        /// Dotted key of the value.
        key: String,
        /// Message produced by the parser.
        message: String,
    },

    /// A map destination received something other than a mapping.
    #[error("key '{key}': expected a mapping, found {found}")]
    ExpectedMapping {
        /// Dotted key of the value.
        key: String,
        /// Kind of node found instead.
        found: &'static str,
    },

    /// A mapping entry rendered to an empty key, which cannot be addressed.
    #[error("key '{key}': mapping contains an empty key, which is ambiguous")]
    EmptyMapKey {
        /// Dotted key of the parent mapping.
        key: String,
    },

    /// The destination graph revisits a pointer that was already populated.
    #[error("cycle detected while populating '{key}': {chain}")]
    Cycle {
        /// Dotted key at which the revisit happened.
        key: String,
        /// Visited identities in order, rendered as `key@address`.
        chain: String,
    },

    /// A generic destination requires a node kind the source does not have.
    #[error("key '{key}': {found} doesn't implement required capability {required}")]
    Capability {
        /// Dotted key of the value.
        key: String,
        /// Capability the destination needs.
        required: &'static str,
        /// Kind of the source node.
        found: &'static str,
    },

    /// A shared destination is borrowed elsewhere and cannot be written.
    #[error("key '{key}': destination is already borrowed")]
    Borrowed {
        /// Dotted key of the value.
        key: String,
    },

    /// A populated record was rejected by its validator.
    #[error("validation failed for '{key}': {source}")]
    Validation {
        /// Dotted key of the record or field.
        key: String,
        /// Error returned by the validator, unchanged.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl DecodeError {
    /// Wrap a parser error, keeping its message verbatim.
    #[must_use]
    pub fn parse(key: &str, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            key: key.to_owned(),
            message: err.to_string(),
        }
    }

    /// Wrap a validator error.
    #[must_use]
    pub fn validation(key: &str, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Validation {
            key: key.to_owned(),
            source: source.into(),
        }
    }
}
