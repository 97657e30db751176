//! Procedural macros for `tiered_config`.
//!
//! `#[derive(Populate)]` teaches the decoder how to fill a type from
//! configuration:
//!
//! - structs with named fields become records, with one key per field and a
//!   static field descriptor table;
//! - tuple structs with a single field forward to that field;
//! - enums whose variants carry no data are parsed from text, matching
//!   variant names case-insensitively.
//!
//! Attributes live under `#[config(...)]`. Fields accept `name = "..."`,
//! `default = ...`, `required` and `skip`; containers accept
//! `rename_all = "..."`, `validate`, `from_str` and `crate = "..."`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `tiered_config::Populate`.
#[proc_macro_derive(Populate, attributes(config))]
pub fn derive_populate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
