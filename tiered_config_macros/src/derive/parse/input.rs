//! Input classification for the `Populate` derive.
//!
//! The derive input is sorted into one of four shapes and all attributes are
//! parsed up front, so expansion fails fast with a spanned error.

use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields};

use super::{
    ContainerAttrs, FieldAttrs, parse_container_attrs, parse_field_attrs, parse_variant_name,
};

/// What every generated impl needs to know about the deriving type.
pub(crate) struct Target {
    pub ident: syn::Ident,
    pub generics: syn::Generics,
    pub attrs: ContainerAttrs,
}

/// A named field and the key segment it is read from.
pub(crate) struct RecordField {
    pub ident: syn::Ident,
    pub key: String,
    pub attrs: FieldAttrs,
}

pub(crate) struct RecordInput {
    pub target: Target,
    pub fields: Vec<RecordField>,
}

pub(crate) struct NewtypeInput {
    pub target: Target,
    pub ty: syn::Type,
}

/// A fieldless enum: each variant with the name it is matched by.
pub(crate) struct VariantsInput {
    pub target: Target,
    pub variants: Vec<(syn::Ident, String)>,
}

pub(crate) enum Input {
    Record(RecordInput),
    Newtype(NewtypeInput),
    Variants(VariantsInput),
    /// Any type opting into `#[config(from_str)]`.
    FromStr(Target),
}

impl Input {
    pub(crate) const fn attrs(&self) -> &ContainerAttrs {
        match self {
            Self::Record(record) => &record.target.attrs,
            Self::Newtype(newtype) => &newtype.target.attrs,
            Self::Variants(variants) => &variants.target.attrs,
            Self::FromStr(target) => &target.attrs,
        }
    }
}

fn renamed(attrs: &ContainerAttrs, explicit: Option<&String>, ident: &syn::Ident) -> String {
    if let Some(name) = explicit {
        return name.clone();
    }
    let bare = ident.unraw().to_string();
    attrs.rename_all.map_or_else(|| bare.clone(), |rule| rule.apply(&bare))
}

/// Parse and classify the derive input.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<Input> {
    let attrs = parse_container_attrs(&input.attrs)?;
    let target = Target {
        ident: input.ident.clone(),
        generics: input.generics.clone(),
        attrs,
    };
    if target.attrs.from_str {
        return Ok(Input::FromStr(target));
    }
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => {
                let mut fields = Vec::with_capacity(named.named.len());
                for field in &named.named {
                    let Some(ident) = field.ident.clone() else {
                        continue;
                    };
                    let field_attrs = parse_field_attrs(&field.attrs)?;
                    if field_attrs.skip
                        && (field_attrs.required || field_attrs.default.is_some())
                    {
                        return Err(syn::Error::new_spanned(
                            field,
                            "`skip` cannot be combined with `required` or `default`",
                        ));
                    }
                    let key = renamed(&target.attrs, field_attrs.name.as_ref(), &ident);
                    fields.push(RecordField {
                        ident,
                        key,
                        attrs: field_attrs,
                    });
                }
                Ok(Input::Record(RecordInput { target, fields }))
            }
            Fields::Unnamed(unnamed) if unnamed.unnamed.len() == 1 => {
                let Some(field) = unnamed.unnamed.first() else {
                    return Err(syn::Error::new_spanned(unnamed, "expected one field"));
                };
                Ok(Input::Newtype(NewtypeInput {
                    target,
                    ty: field.ty.clone(),
                }))
            }
            _ => Err(syn::Error::new_spanned(
                data.struct_token,
                "Populate requires named fields or exactly one unnamed field; \
                 use #[config(from_str)] for other structs",
            )),
        },
        Data::Enum(data) => {
            let mut variants = Vec::with_capacity(data.variants.len());
            for variant in &data.variants {
                if !matches!(variant.fields, Fields::Unit) {
                    return Err(syn::Error::new_spanned(
                        variant,
                        "Populate can only be derived for enums without variant data; \
                         use #[config(from_str)] instead",
                    ));
                }
                let explicit = parse_variant_name(&variant.attrs)?;
                let name = renamed(&target.attrs, explicit.as_ref(), &variant.ident);
                if variants
                    .iter()
                    .any(|(_, seen): &(syn::Ident, String)| seen.to_lowercase() == name.to_lowercase())
                {
                    return Err(syn::Error::new_spanned(
                        variant,
                        format!("variant name '{name}' is used more than once (names ignore case)"),
                    ));
                }
                variants.push((variant.ident.clone(), name));
            }
            if variants.is_empty() {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Populate requires at least one enum variant",
                ));
            }
            Ok(Input::Variants(VariantsInput { target, variants }))
        }
        Data::Union(data) => Err(syn::Error::new_spanned(
            data.union_token,
            "Populate cannot be derived for unions",
        )),
    }
}
