//! `Populate` impls for fieldless enums.

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive::parse::VariantsInput;

/// Match the text at the key against each variant name, ignoring case.
pub(crate) fn variants(krate: &TokenStream, input: &VariantsInput) -> TokenStream {
    let ident = &input.target.ident;
    let (impl_generics, ty_generics, where_clause) = input.target.generics.split_for_impl();
    let arms = input.variants.iter().map(|(variant, name)| {
        let lowered = name.to_lowercase();
        quote! { #lowered => Self::#variant, }
    });
    let expected = input
        .variants
        .iter()
        .map(|(_, name)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    quote! {
        impl #impl_generics #krate::Populate for #ident #ty_generics #where_clause {
            const SHAPE: #krate::Shape = #krate::Shape::CustomText;

            fn populate(
                &mut self,
                decoder: &mut #krate::Decoder<'_>,
                key: &str,
                default: ::core::option::Option<&str>,
            ) -> #krate::DecodeResult<()> {
                let ::core::option::Option::Some(text) = decoder.text(key, default) else {
                    return ::core::result::Result::Ok(());
                };
                *self = match text.to_lowercase().as_str() {
                    #(#arms)*
                    _ => {
                        return ::core::result::Result::Err(#krate::DecodeError::parse(
                            key,
                            ::std::format!("unknown variant '{}', expected one of: {}", text, #expected),
                        ));
                    }
                };
                ::core::result::Result::Ok(())
            }
        }
    }
}
