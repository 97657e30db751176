//! Tests for `#[config(...)]` parsing and input classification.

use super::*;
use anyhow::{Result, anyhow, bail, ensure};
use rstest::rstest;
use syn::{DeriveInput, parse_quote};

fn record(input: &DeriveInput) -> Result<RecordInput> {
    match parse_input(input).map_err(|err| anyhow!(err))? {
        Input::Record(record) => Ok(record),
        _ => bail!("expected a record input"),
    }
}

#[test]
fn parses_field_attributes() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Server {
            #[config(name = "listen-port", default = 8080, required)]
            port: u16,
            #[config(skip)]
            cache: Vec<u8>,
            host: String,
        }
    };
    let parsed = record(&input)?;
    let [port, cache, host] = parsed.fields.as_slice() else {
        bail!("expected three fields");
    };
    ensure!(port.key == "listen-port", "unexpected key {}", port.key);
    ensure!(port.attrs.default.as_deref() == Some("8080"), "default not parsed");
    ensure!(port.attrs.required, "required not parsed");
    ensure!(cache.attrs.skip, "skip not parsed");
    ensure!(host.key == "host", "unexpected key {}", host.key);
    Ok(())
}

#[rstest]
#[case::string(quote::quote!("fast"), "fast")]
#[case::integer(quote::quote!(42u8), "42")]
#[case::negative(quote::quote!(-3), "-3")]
#[case::float(quote::quote!(0.5), "0.5")]
#[case::boolean(quote::quote!(true), "true")]
#[case::character(quote::quote!('x'), "x")]
fn renders_default_literals(
    #[case] literal: proc_macro2::TokenStream,
    #[case] expected: &str,
) -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Demo {
            #[config(default = #literal)]
            value: String,
        }
    };
    let parsed = record(&input)?;
    let default = parsed
        .fields
        .first()
        .and_then(|field| field.attrs.default.clone())
        .ok_or_else(|| anyhow!("missing default"))?;
    ensure!(default == expected, "expected {expected}, got {default}");
    Ok(())
}

#[rstest]
#[case::kebab("kebab-case", "max_retries", "max-retries")]
#[case::camel("camelCase", "max_retries", "maxRetries")]
#[case::pascal("PascalCase", "max_retries", "MaxRetries")]
#[case::screaming("SCREAMING_SNAKE_CASE", "max_retries", "MAX_RETRIES")]
#[case::lower("lowercase", "max_retries", "max_retries")]
fn applies_rename_rules(
    #[case] rule: &str,
    #[case] field: &str,
    #[case] expected: &str,
) -> Result<()> {
    let input: DeriveInput = syn::parse_str(&format!(
        r#"
        #[config(rename_all = "{rule}")]
        struct Demo {{
            {field}: u32,
        }}
        "#
    ))?;
    let parsed = record(&input)?;
    let key = parsed
        .fields
        .first()
        .map(|field| field.key.clone())
        .ok_or_else(|| anyhow!("missing field"))?;
    ensure!(key == expected, "expected {expected}, got {key}");
    Ok(())
}

#[test]
fn explicit_name_beats_rename_rule() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[config(rename_all = "kebab-case")]
        struct Demo {
            #[config(name = "timeout_ms")]
            request_timeout: u64,
            r#type: String,
        }
    };
    let parsed = record(&input)?;
    let keys: Vec<&str> = parsed.fields.iter().map(|f| f.key.as_str()).collect();
    ensure!(keys == ["timeout_ms", "type"], "unexpected keys {keys:?}");
    Ok(())
}

#[test]
fn parses_container_flags() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[config(validate, crate = "cfg")]
        struct Demo {
            value: u32,
        }
    };
    let parsed = record(&input)?;
    ensure!(parsed.target.attrs.validate, "validate not parsed");
    let path = parsed
        .target
        .attrs
        .crate_path
        .as_ref()
        .ok_or_else(|| anyhow!("crate path missing"))?;
    ensure!(path.is_ident("cfg"), "unexpected crate path");
    Ok(())
}

#[test]
fn classifies_shapes() -> Result<()> {
    let newtype: DeriveInput = parse_quote! { struct Port(u16); };
    let variants: DeriveInput = parse_quote! {
        enum Level {
            #[config(name = "warning")]
            Warn,
            Error,
        }
    };
    let custom: DeriveInput = parse_quote! {
        #[config(from_str)]
        struct Address(String, u16);
    };
    ensure!(
        matches!(parse_input(&newtype), Ok(Input::Newtype(_))),
        "single-field tuple struct should forward"
    );
    let Ok(Input::Variants(parsed)) = parse_input(&variants) else {
        bail!("fieldless enum should parse as variants");
    };
    let names: Vec<&str> = parsed.variants.iter().map(|(_, n)| n.as_str()).collect();
    ensure!(names == ["warning", "Error"], "unexpected names {names:?}");
    ensure!(
        matches!(parse_input(&custom), Ok(Input::FromStr(_))),
        "from_str should win over the struct shape"
    );
    Ok(())
}

#[rstest]
#[case::unknown_field_key(parse_quote! { struct Demo { #[config(defualt = 1)] value: u32 } }, "unknown config key")]
#[case::unknown_container_key(parse_quote! { #[config(prefix = "X")] struct Demo { value: u32 } }, "unknown config key")]
#[case::bad_rule(parse_quote! { #[config(rename_all = "Title Case")] struct Demo { value: u32 } }, "unknown rename_all rule")]
#[case::skip_with_default(parse_quote! { struct Demo { #[config(skip, default = 1)] value: u32 } }, "cannot be combined")]
#[case::tuple_struct(parse_quote! { struct Pair(u8, u8); }, "exactly one unnamed field")]
#[case::data_enum(parse_quote! { enum Shape { Circle(f64) } }, "without variant data")]
#[case::empty_enum(parse_quote! { enum Never {} }, "at least one enum variant")]
#[case::duplicate_variant(parse_quote! { enum Mode { Fast, #[config(name = "FAST")] Quick } }, "more than once")]
#[case::bad_default(parse_quote! { struct Demo { #[config(default = [1])] value: u32 } }, "default must be")]
fn rejects_invalid_input(#[case] input: DeriveInput, #[case] fragment: &str) -> Result<()> {
    let Err(err) = parse_input(&input) else {
        bail!("expected an error containing {fragment}");
    };
    ensure!(
        err.to_string().contains(fragment),
        "error '{err}' should contain '{fragment}'"
    );
    Ok(())
}
