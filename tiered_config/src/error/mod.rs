//! Error types produced while building providers and populating values.

mod decode;
mod types;

pub use decode::{DecodeError, DecodeResult};
pub use types::{ConfigError, ConfigResult};
