//! Token generation for each input shape.

mod record;
mod variants;

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive::parse::{NewtypeInput, Target};

pub(crate) use record::record;
pub(crate) use variants::variants;

/// Render an optional default literal as `Option<&'static str>` tokens.
pub(crate) fn option_tokens(value: Option<&str>) -> TokenStream {
    value.map_or_else(
        || quote! { ::core::option::Option::None },
        |text| quote! { ::core::option::Option::Some(#text) },
    )
}

/// Clone the target's generics, bounding every type parameter by `bound`.
pub(crate) fn bounded_generics(target: &Target, bound: &syn::TypeParamBound) -> syn::Generics {
    let mut generics = target.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(bound.clone());
    }
    generics
}

/// Newtype structs forward everything to their single field.
pub(crate) fn newtype(krate: &TokenStream, input: &NewtypeInput) -> TokenStream {
    let ident = &input.target.ident;
    let ty = &input.ty;
    let mut generics = input.target.generics.clone();
    generics
        .make_where_clause()
        .predicates
        .push(syn::parse_quote! { #ty: #krate::Populate });
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    quote! {
        impl #impl_generics #krate::Populate for #ident #ty_generics #where_clause {
            const SHAPE: #krate::Shape = <#ty as #krate::Populate>::SHAPE;

            fn populate(
                &mut self,
                decoder: &mut #krate::Decoder<'_>,
                key: &str,
                default: ::core::option::Option<&str>,
            ) -> #krate::DecodeResult<()> {
                #krate::Populate::populate(&mut self.0, decoder, key, default)
            }

            fn from_raw(
                key: &str,
                raw: &#krate::Node,
            ) -> ::core::option::Option<#krate::DecodeResult<Self>> {
                <#ty as #krate::Populate>::from_raw(key, raw).map(|result| result.map(Self))
            }
        }
    }
}

/// `#[config(from_str)]` types parse their text form with `FromStr`.
pub(crate) fn from_str(krate: &TokenStream, target: &Target) -> TokenStream {
    let ident = &target.ident;
    let (impl_generics, ty_generics, where_clause) = target.generics.split_for_impl();
    quote! {
        impl #impl_generics #krate::Populate for #ident #ty_generics #where_clause {
            const SHAPE: #krate::Shape = #krate::Shape::CustomText;

            fn populate(
                &mut self,
                decoder: &mut #krate::Decoder<'_>,
                key: &str,
                default: ::core::option::Option<&str>,
            ) -> #krate::DecodeResult<()> {
                #krate::populate_from_str(self, decoder, key, default)
            }
        }
    }
}
