//! trybuild coverage for `#[config(crate = "...")]`.
//!
//! Generated code must compile when the runtime crate is reachable only
//! through an alias.

#[test]
fn crate_path_alias_compiles() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/crate_path_alias.rs");
    t.pass("tests/trybuild/crate_path_default.rs");
}
