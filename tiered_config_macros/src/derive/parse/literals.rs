//! Literal parsing helpers for derive attributes.

use syn::meta::ParseNestedMeta;
use syn::{Expr, ExprLit, ExprUnary, Lit, LitStr, Token, UnOp};

/// Parse `key = "..."`.
pub(crate) fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    match meta.value()?.parse::<Lit>()? {
        Lit::Str(s) => Ok(s),
        other => Err(syn::Error::new(other.span(), format!("{key} must be a string"))),
    }
}

/// Accept both `key` and `key = true|false`.
pub(crate) fn flag(meta: &ParseNestedMeta) -> syn::Result<bool> {
    if meta.input.peek(Token![=]) {
        return Ok(meta.value()?.parse::<syn::LitBool>()?.value);
    }
    Ok(true)
}

/// Parse a default value into the text handed to the decoder.
///
/// Strings are taken verbatim; numbers keep their written digits (without
/// suffix) and may be negated; booleans and chars use their display form.
pub(crate) fn default_literal(meta: &ParseNestedMeta) -> syn::Result<String> {
    let expr = meta.value()?.parse::<Expr>()?;
    literal_text(&expr).ok_or_else(|| {
        syn::Error::new_spanned(&expr, "default must be a string, number, boolean or char literal")
    })
}

fn literal_text(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => match lit {
            Lit::Str(s) => Some(s.value()),
            Lit::Int(i) => Some(i.base10_digits().to_owned()),
            Lit::Float(f) => Some(f.base10_digits().to_owned()),
            Lit::Bool(b) => Some(b.value.to_string()),
            Lit::Char(c) => Some(c.value().to_string()),
            _ => None,
        },
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_),
            expr: inner,
            ..
        }) => match inner.as_ref() {
            Expr::Lit(ExprLit {
                lit: Lit::Int(i), ..
            }) => Some(format!("-{}", i.base10_digits())),
            Expr::Lit(ExprLit {
                lit: Lit::Float(f), ..
            }) => Some(format!("-{}", f.base10_digits())),
            _ => None,
        },
        _ => None,
    }
}
