//! `Populate` and `Record` impls for structs with named fields.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;

use super::{bounded_generics, option_tokens};
use crate::derive::parse::{RecordField, RecordInput};

fn descriptor_entry(krate: &TokenStream, field: &RecordField) -> TokenStream {
    let name = field.ident.unraw().to_string();
    let key = &field.key;
    let default = option_tokens(field.attrs.default.as_deref());
    let required = field.attrs.required;
    quote! {
        #krate::FieldDescriptor {
            field: #name,
            key: #key,
            default: #default,
            required: #required,
        }
    }
}

fn populate_field(krate: &TokenStream, field: &RecordField) -> TokenStream {
    let member = &field.ident;
    let key = &field.key;
    let default = option_tokens(field.attrs.default.as_deref());
    quote! {
        #krate::Populate::populate(
            &mut self.#member,
            decoder,
            &#krate::join_key(key, #key),
            #default,
        )?;
    }
}

/// Generate the field table and the field-by-field populate body.
///
/// Fields are populated in declaration order. Required fields are checked
/// afterwards, then the optional validator runs.
pub(crate) fn record(krate: &TokenStream, input: &RecordInput) -> TokenStream {
    let ident = &input.target.ident;
    let name = ident.unraw().to_string();
    let bound: syn::TypeParamBound = syn::parse_quote! { #krate::Populate };
    let generics = bounded_generics(&input.target, &bound);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let active: Vec<&RecordField> = input.fields.iter().filter(|f| !f.attrs.skip).collect();
    let entries = active.iter().map(|field| descriptor_entry(krate, field));
    let populate_fields = active.iter().map(|field| populate_field(krate, field));
    let validate = input.target.attrs.validate.then(|| {
        quote! {
            #krate::Validate::validate(self)
                .map_err(|source| #krate::DecodeError::validation(key, source))?;
        }
    });

    quote! {
        impl #impl_generics #krate::Record for #ident #ty_generics #where_clause {
            fn descriptor() -> &'static #krate::RecordDescriptor {
                static DESCRIPTOR: #krate::RecordDescriptor = #krate::RecordDescriptor {
                    name: #name,
                    fields: &[#(#entries),*],
                };
                &DESCRIPTOR
            }
        }

        impl #impl_generics #krate::Populate for #ident #ty_generics #where_clause {
            const SHAPE: #krate::Shape = #krate::Shape::Record;

            fn populate(
                &mut self,
                decoder: &mut #krate::Decoder<'_>,
                key: &str,
                _default: ::core::option::Option<&str>,
            ) -> #krate::DecodeResult<()> {
                #(#populate_fields)*
                decoder.check_required(key, <Self as #krate::Record>::descriptor())?;
                #validate
                ::core::result::Result::Ok(())
            }
        }
    }
}
