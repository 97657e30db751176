//! Unit tests for provider composition and callback handling.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, ensure};
use clap::{Arg, ArgAction, Command};
use rstest::{fixture, rstest};

use super::{
    CachedProvider, ChangeCallback, ExpandProvider, LookupProvider, MockDynamicProvider,
    MultiCallbackProvider, NopProvider, Provider, ProviderGroup, ScopedProvider, TreeProvider,
    command_line_provider_from_args, expand_text,
};
use crate::ConfigError;
use crate::node::Node;

#[fixture]
fn tree() -> Arc<TreeProvider> {
    TreeProvider::from_yaml_sources("yaml", ["a:\n  b:\n    c: 1\n    d: text\nport: 80\n"])
        .expect("fixture YAML must parse")
}

fn counter() -> (Arc<AtomicUsize>, ChangeCallback) {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let callback: ChangeCallback = Arc::new(move |_: &str, _: &str, _: Option<&Node>| {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    (count, callback)
}

#[rstest]
fn tree_memoizes_lookups(tree: Arc<TreeProvider>) {
    let first = tree.get("a.b.c");
    let second = tree.get("a.b.c");
    assert_eq!(first.last_updated(), second.last_updated());
    assert_eq!(second.try_as_int(), Some(1));
}

#[rstest]
fn tree_lookups_are_case_insensitive(tree: Arc<TreeProvider>) {
    assert_eq!(tree.get("A.B.D").try_as_string().as_deref(), Some("text"));
}

#[rstest]
fn later_sources_win_when_key_case_differs() -> Result<()> {
    let tree = TreeProvider::from_yaml_sources("yaml", ["Port: 1\n", "port: 2\n"])?;
    let port = tree.get("port");
    ensure!(port.try_as_int() == Some(2), "port was {port}");
    ensure!(tree.get("PORT").try_as_int() == Some(2));
    Ok(())
}

#[rstest]
fn group_prefers_earlier_providers(tree: Arc<TreeProvider>) -> Result<()> {
    let high = TreeProvider::from_yaml_sources("high", ["port: 443\n"])?;
    let layers: Vec<Arc<dyn Provider>> = vec![high, tree, Arc::new(NopProvider)];
    let group = ProviderGroup::new("group", layers);
    let port = group.get("port");
    ensure!(port.try_as_int() == Some(443), "port was {port}");
    ensure!(port.source() == "high", "source was {}", port.source());
    ensure!(group.get("a.b.c").source() == "yaml", "fallback layer not used");
    let missing = group.get("nope");
    ensure!(!missing.has_value() && missing.source() == "group");
    Ok(())
}

#[rstest]
fn nested_scopes_compose(tree: Arc<TreeProvider>) {
    let inner = ScopedProvider::new("b", Arc::clone(&tree) as Arc<dyn Provider>);
    let outer = ScopedProvider::new("a", inner);
    assert_eq!(outer.prefix(), "a.b");
    let composed = outer.get("c");
    let direct = tree.get("a.b.c");
    assert_eq!(composed.raw(), direct.raw());
    assert_eq!(composed.key(), "c");
}

#[rstest]
fn empty_prefix_passes_keys_through(tree: Arc<TreeProvider>) {
    let scoped = ScopedProvider::new("", tree);
    assert_eq!(scoped.get("port").try_as_int(), Some(80));
}

#[rstest]
fn cached_values_follow_callbacks() {
    let dynamic = MockDynamicProvider::new("dynamic");
    dynamic.set("level", "info");
    let cached = CachedProvider::new(Arc::clone(&dynamic) as Arc<dyn Provider>);
    assert_eq!(cached.get("level").try_as_string().as_deref(), Some("info"));

    dynamic.set("level", "debug");
    assert_eq!(cached.get("level").try_as_string().as_deref(), Some("debug"));

    dynamic.delete("level");
    assert!(!cached.get("level").has_value());
}

#[rstest]
fn cached_registration_failure_is_reported() -> Result<()> {
    let dynamic = MockDynamicProvider::new("dynamic");
    dynamic.set("level", "info");
    let (_, callback) = counter();
    dynamic.register_change_callback("level", callback)?;

    let cached = CachedProvider::new(dynamic);
    let value = cached.get("level");
    ensure!(!value.has_value(), "value should be empty");
    ensure!(
        matches!(value.error(), Some(ConfigError::CallbackRegistered { .. })),
        "unexpected error {:?}",
        value.error()
    );
    Ok(())
}

#[rstest]
fn mock_rejects_second_callback() {
    let dynamic = MockDynamicProvider::new("dynamic");
    let (_, first) = counter();
    let (_, second) = counter();
    assert!(dynamic.register_change_callback("k", first).is_ok());
    assert!(matches!(
        dynamic.register_change_callback("k", second),
        Err(ConfigError::CallbackRegistered { .. })
    ));
}

#[rstest]
fn multi_callback_fans_out_and_unwinds() -> Result<()> {
    let dynamic = MockDynamicProvider::new("dynamic");
    let multi = MultiCallbackProvider::new(Arc::clone(&dynamic) as Arc<dyn Provider>);
    let (first_count, first) = counter();
    let (second_count, second) = counter();
    multi.register_change_callback("k", first)?;
    multi.register_change_callback("k", second)?;

    dynamic.set("k", 1_i64);
    ensure!(first_count.load(Ordering::SeqCst) == 1);
    ensure!(second_count.load(Ordering::SeqCst) == 1);

    multi.unregister_change_callback("k")?;
    dynamic.set("k", 2_i64);
    ensure!(first_count.load(Ordering::SeqCst) == 2, "older callback kept");
    ensure!(second_count.load(Ordering::SeqCst) == 1, "newest callback removed");

    multi.unregister_change_callback("k")?;
    // The inner slot is free again once the last callback is gone.
    let (_, replacement) = counter();
    dynamic.register_change_callback("k", replacement)?;
    ensure!(matches!(
        multi.unregister_change_callback("k"),
        Err(ConfigError::CallbackNotRegistered { .. })
    ));
    Ok(())
}

#[rstest]
fn callbacks_run_outside_the_mock_lock() -> Result<()> {
    let dynamic = MockDynamicProvider::new("dynamic");
    let reader = Arc::clone(&dynamic);
    let observed = Arc::new(parking_lot::Mutex::new(None));
    let sink = Arc::clone(&observed);
    dynamic.register_change_callback(
        "k",
        Arc::new(move |key: &str, _: &str, _: Option<&Node>| {
            *sink.lock() = reader.get(key).try_as_int();
        }),
    )?;
    dynamic.set("k", 7_i64);
    ensure!(*observed.lock() == Some(7));
    Ok(())
}

#[rstest]
fn expand_rewrites_nested_strings_only() -> Result<()> {
    let tree = TreeProvider::from_yaml_sources("yaml", ["{a: \"${1}\", b: 2, c: [\"$1-x\"]}"])?;
    let expanded = ExpandProvider::new(tree, |name: &str| (name == "1").then(|| "one".to_owned()));
    let root = expanded.get("");
    ensure!(root.to_string() == "{a: one, b: 2, c: [one-x]}", "expanded {root}");
    ensure!(expanded.get("b").raw() == Some(&Node::from(2_i64)));
    Ok(())
}

#[rstest]
fn expand_applies_to_callback_payloads() -> Result<()> {
    let dynamic = MockDynamicProvider::new("dynamic");
    let expanded = ExpandProvider::new(Arc::clone(&dynamic) as Arc<dyn Provider>, |_: &str| Some("x".to_owned()));
    let observed = Arc::new(parking_lot::Mutex::new(String::new()));
    let sink = Arc::clone(&observed);
    expanded.register_change_callback(
        "k",
        Arc::new(move |_: &str, _: &str, data: Option<&Node>| {
            *sink.lock() = data.map(ToString::to_string).unwrap_or_default();
        }),
    )?;
    dynamic.set("k", "${V}/y");
    ensure!(*observed.lock() == "x/y");
    Ok(())
}

#[rstest]
#[case("${A:fallback}", "fallback")]
#[case("${A:}", "")]
#[case("$$", "$")]
#[case("${unclosed", "${unclosed")]
#[case("$", "$")]
#[case("cost: $5", "cost: $5")]
fn expansion_edge_cases(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(expand_text(input, &|_: &str| None), expected);
}

#[rstest]
fn lookup_provider_wraps_functions() {
    let provider = LookupProvider::new("fn", |key: &str| (key == "a.b").then(|| "v".to_owned()));
    assert_eq!(provider.get("a.b").try_as_string().as_deref(), Some("v"));
    assert!(!provider.get("a").has_value());
}

fn demo_command() -> Command {
    Command::new("demo")
        .arg(Arg::new("server.port").long("port"))
        .arg(Arg::new("server.host").long("host").default_value("localhost"))
        .arg(
            Arg::new("tags")
                .long("tag")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::SetTrue),
        )
}

#[rstest]
fn command_line_nests_dotted_ids() -> Result<()> {
    let provider = command_line_provider_from_args(
        &demo_command(),
        ["demo", "--port", "8080", "--tag", "a", "--tag", "b", "--verbose"],
    )?;
    ensure!(provider.get("server.port").try_as_int() == Some(8080));
    ensure!(!provider.get("server.host").has_value(), "defaults must stay absent");
    ensure!(provider.get("tags.1").try_as_string().as_deref() == Some("b"));
    ensure!(provider.get("verbose").try_as_bool() == Some(true));
    ensure!(provider.name() == "cmd");
    Ok(())
}

#[rstest]
fn bad_flags_fail_construction() {
    let err = command_line_provider_from_args(&demo_command(), ["demo", "--unknown"])
        .err()
        .expect("unknown flag must fail");
    assert!(matches!(err, ConfigError::CommandLine(_)));
}
