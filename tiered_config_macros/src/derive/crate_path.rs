//! Crate path resolution for dependency aliasing support.
//!
//! Converts the optional `#[config(crate = "...")]` attribute value into the
//! tokens that prefix every `tiered_config` item in generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolve the crate path from the parsed container attribute.
///
/// Defaults to `::tiered_config`. An override is used exactly as written, so
/// a renamed dependency (`cfg = { package = "tiered_config" }`) can be
/// reached with `#[config(crate = "cfg")]`.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ::tiered_config }, |path| quote! { #path })
}
