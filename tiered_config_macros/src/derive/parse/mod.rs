//! Attribute parsing for `#[derive(Populate)]`.
//!
//! Every `#[config(...)]` attribute is visited once. Unlike serde-style
//! lenient parsing, unknown keys are rejected so a misspelt `defualt` fails
//! the build instead of silently dropping a default.

use syn::Attribute;
use syn::meta::ParseNestedMeta;

mod input;
mod literals;
mod rename;
#[cfg(test)]
mod tests;

pub(crate) use input::{Input, NewtypeInput, RecordField, RecordInput, Target, VariantsInput, parse_input};
use literals::{default_literal, flag, lit_str};
pub(crate) use rename::RenameRule;

/// Container-level options.
#[derive(Default, Clone)]
pub(crate) struct ContainerAttrs {
    pub rename_all: Option<RenameRule>,
    pub validate: bool,
    pub from_str: bool,
    /// Overrides the generated crate path for dependency aliasing.
    pub crate_path: Option<syn::Path>,
}

/// Field-level options.
///
/// - `name` replaces the key segment the field is read from.
/// - `default` is a literal used when no provider has a value; it goes
///   through the same coercion as configured text.
/// - `required` fails population when the key has no value and no default.
/// - `skip` leaves the field untouched and out of the descriptor table.
#[derive(Default, Clone)]
pub(crate) struct FieldAttrs {
    pub name: Option<String>,
    pub default: Option<String>,
    pub required: bool,
    pub skip: bool,
}

/// Iterate all `#[config(...)]` attributes once and apply a callback.
fn parse_config<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("config")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

fn unknown(meta: &ParseNestedMeta, allowed: &str) -> syn::Error {
    let name = meta
        .path
        .get_ident()
        .map_or_else(|| "attribute".to_owned(), ToString::to_string);
    meta.error(format!("unknown config key `{name}`; expected one of {allowed}"))
}

/// Extract `#[config(...)]` metadata applied to a struct or enum.
pub(crate) fn parse_container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut out = ContainerAttrs::default();
    parse_config(attrs, |meta| {
        match meta.path.get_ident().map(ToString::to_string).as_deref() {
            Some("rename_all") => {
                let s = lit_str(meta, "rename_all")?;
                out.rename_all = Some(RenameRule::parse(&s.value(), s.span())?);
            }
            Some("validate") => out.validate = flag(meta)?,
            Some("from_str") => out.from_str = flag(meta)?,
            Some("crate") => {
                let s = lit_str(meta, "crate")?;
                let path: syn::Path =
                    syn::parse_str(&s.value()).map_err(|e| syn::Error::new(s.span(), e))?;
                out.crate_path = Some(path);
            }
            _ => return Err(unknown(meta, "`rename_all`, `validate`, `from_str`, `crate`")),
        }
        Ok(())
    })?;
    Ok(out)
}

/// Extract `#[config(...)]` metadata applied to a named field.
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_config(attrs, |meta| {
        match meta.path.get_ident().map(ToString::to_string).as_deref() {
            Some("name") => out.name = Some(lit_str(meta, "name")?.value()),
            Some("default") => out.default = Some(default_literal(meta)?),
            Some("required") => out.required = flag(meta)?,
            Some("skip") => out.skip = flag(meta)?,
            _ => return Err(unknown(meta, "`name`, `default`, `required`, `skip`")),
        }
        Ok(())
    })?;
    Ok(out)
}

/// Extract the optional `#[config(name = "...")]` of an enum variant.
pub(crate) fn parse_variant_name(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut name = None;
    parse_config(attrs, |meta| {
        if meta.path.is_ident("name") {
            name = Some(lit_str(meta, "name")?.value());
            return Ok(());
        }
        Err(unknown(meta, "`name`"))
    })?;
    Ok(name)
}
