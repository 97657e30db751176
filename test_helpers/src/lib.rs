//! Test helpers shared across crates in the `tiered_config` workspace.
//!
//! - [`env`] serialises process environment mutation and restores prior
//!   values when a scope ends.
//! - [`fixtures`] writes YAML documents into a temporary directory and hands
//!   back UTF-8 paths.

pub mod env;
pub mod fixtures;
