//! Primary error enum for provider construction and callback management.

use camino::Utf8PathBuf;
use thiserror::Error;

use super::DecodeError;

/// Result alias used by constructors and provider callback methods.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while assembling configuration sources.
///
/// Construction failures (malformed documents, conflicting merges, bad flag
/// sets) indicate an authoring or deployment mistake; callers are expected to
/// abort start-up when they see one.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A document could not be parsed into a node tree.
    #[error("failed to parse {source_name}: {message}")]
    Parse {
        /// Name of the document source (file path or inline label).
        source_name: String,
        /// Parser diagnostic.
        message: String,
    },

    /// A configuration file could not be read.
    #[error("failed to read configuration file '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A document that takes part in merging did not have a mapping root.
    #[error("document '{source_name}' must have a mapping at its root, found {found}")]
    NonMappingRoot {
        /// Name of the offending document.
        source_name: String,
        /// Kind of node found at the root.
        found: &'static str,
    },

    /// Two documents disagree about the shape of the node at `path`.
    #[error("can't merge {source_kind} into {destination_kind} at '{path}'")]
    MergeConflict {
        /// Dotted path of the conflicting node.
        path: String,
        /// Kind of the incoming node.
        source_kind: &'static str,
        /// Kind of the node already present.
        destination_kind: &'static str,
    },

    /// Command-line arguments could not be parsed.
    #[error("failed to parse command-line arguments: {0}")]
    CommandLine(#[from] Box<clap::Error>),

    /// Static data could not be serialised into the document model.
    #[error("failed to serialize static configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A Figment instance could not be extracted into a node tree.
    #[error("failed to gather configuration: {0}")]
    Gathering(#[from] Box<figment::Error>),

    /// A provider that accepts a single callback per key already has one.
    #[error("a change callback is already registered for key '{key}'")]
    CallbackRegistered {
        /// Key the callback was registered for.
        key: String,
    },

    /// No callback is registered under the supplied token.
    #[error("there is no registered callback for token '{token}'")]
    CallbackNotRegistered {
        /// Token passed to the unregister call.
        token: String,
    },

    /// Populating a destination failed.
    #[error("failed to populate configuration: {0}")]
    Decode(#[from] DecodeError),
}

impl From<clap::Error> for ConfigError {
    fn from(e: clap::Error) -> Self {
        Self::CommandLine(Box::new(e))
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Gathering(Box::new(e))
    }
}

impl ConfigError {
    /// Construct a [`ConfigError::Parse`] from any displayable diagnostic.
    #[must_use]
    pub fn parse(source_name: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }
}
