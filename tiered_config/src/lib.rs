//! Layered configuration with a type-directed decoder.
//!
//! Configuration is read through [`Provider`]s. Each provider answers key
//! lookups (dotted paths such as `server.tls.cert`) with a [`Value`], and a
//! [`ProviderGroup`] stacks providers so the first one holding a real value
//! wins. Providers can be wrapped to scope keys under a prefix
//! ([`ScopedProvider`]), cache answers until the source reports a change
//! ([`CachedProvider`]), expand `${VAR}` references ([`ExpandProvider`]) or
//! share a single change notification between many listeners
//! ([`MultiCallbackProvider`]).
//!
//! Values are decoded into Rust types with [`Value::populate`]. The decoder
//! walks the destination type, resolving each field through the full
//! provider chain, so a flag on the command line overrides a single nested
//! field of a struct otherwise filled from YAML. Derive [`Populate`] for
//! records and unit enums, or implement it by hand.
//!
//! [`ConfigLoader`] assembles the common stack of YAML files, environment
//! variables, command-line flags and serialised defaults.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use tiered_config::{Populate, Provider, ProviderGroup, ROOT, TreeProvider};
//!
//! #[derive(Debug, Default, Populate)]
//! struct Database {
//!     url: String,
//!     #[config(default = "5")]
//!     pool_size: u32,
//! }
//!
//! let defaults = TreeProvider::from_yaml_sources("defaults", ["url: postgres://localhost/app"])?;
//! let site = TreeProvider::from_yaml_sources("site", ["pool_size: 20"])?;
//! let layers: Vec<Arc<dyn Provider>> = vec![site, defaults];
//! let group = ProviderGroup::new("app", layers);
//!
//! let mut database = Database::default();
//! group.get(ROOT).populate(&mut database)?;
//! assert_eq!(database.url, "postgres://localhost/app");
//! assert_eq!(database.pool_size, 20);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

extern crate self as tiered_config;

pub use tiered_config_macros::Populate;

mod decode;
mod error;
mod loader;
mod node;
mod provider;
mod value;

pub use decode::{
    Decoder, FieldDescriptor, Populate, Record, RecordDescriptor, Shape, Validate,
    populate_from_str,
};
pub use error::{ConfigError, ConfigResult, DecodeError, DecodeResult};
pub use loader::ConfigLoader;
pub use node::{Mapping, Node, NodeKind, ROOT, SEPARATOR, Scalar, format_float, join_key, merge};
pub use provider::{
    CachedProvider, ChangeCallback, ExpandProvider, LookupFn, LookupProvider,
    MockDynamicProvider, MultiCallbackProvider, NopProvider, Provider, ProviderGroup,
    ScopedProvider, TreeProvider, command_line_provider, command_line_provider_from_args,
    env_key, expand_text, static_provider,
};
pub use value::{ParseDurationError, Value, parse_duration};
