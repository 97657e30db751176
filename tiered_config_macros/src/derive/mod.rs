//! Expansion entry point for `#[derive(Populate)]`.

mod crate_path;
pub(crate) mod generate;
pub(crate) mod parse;

use proc_macro2::TokenStream;

use parse::{Input, parse_input};

/// Expand a derive input into `Populate` (and, for records, `Record`) impls.
pub(crate) fn expand(input: &syn::DeriveInput) -> syn::Result<TokenStream> {
    let parsed = parse_input(input)?;
    let krate = crate_path::resolve(parsed.attrs().crate_path.as_ref());
    Ok(match &parsed {
        Input::Record(record) => generate::record(&krate, record),
        Input::Newtype(newtype) => generate::newtype(&krate, newtype),
        Input::Variants(variants) => generate::variants(&krate, variants),
        Input::FromStr(target) => generate::from_str(&krate, target),
    })
}
