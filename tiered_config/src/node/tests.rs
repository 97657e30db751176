//! Unit tests for path lookup, merging and rendering of node trees.

use anyhow::{Result, ensure};
use rstest::rstest;

use super::{Mapping, Node, NodeKind, Scalar, format_float, join_key, merge, merge_documents};
use crate::ConfigError;

fn yaml(text: &str) -> Node {
    Node::from_yaml_str("test", text).expect("test YAML must parse")
}

#[rstest]
#[case("", "port", "port")]
#[case("server", "", "server")]
#[case("server", "port", "server.port")]
fn joins_keys(#[case] parent: &str, #[case] child: &str, #[case] expected: &str) {
    assert_eq!(join_key(parent, child), expected);
}

#[rstest]
fn find_is_case_insensitive() -> Result<()> {
    let doc = yaml("Foo:\n  BAR:\n    baz: hello\n");
    let found = doc.find("foo.bar.BAZ").and_then(Node::as_str);
    ensure!(found == Some("hello"), "unexpected lookup result {found:?}");
    Ok(())
}

#[rstest]
#[case("list.0", Some("a"))]
#[case("list.2", Some("c"))]
#[case("list.3", None)]
#[case("list.01", None)]
#[case("list.x", None)]
#[case("list.0.deeper", None)]
fn find_indexes_sequences(#[case] path: &str, #[case] expected: Option<&str>) {
    let doc = yaml("list: [a, b, c]\n");
    assert_eq!(doc.find(path).and_then(Node::as_str), expected);
}

#[rstest]
fn empty_path_returns_root() {
    let doc = yaml("a: 1\n");
    assert_eq!(doc.find(""), Some(&doc));
}

#[rstest]
fn integer_keys_are_addressable() {
    let doc = yaml("ports:\n  80: http\n  443: https\n");
    assert_eq!(doc.find("ports.443").and_then(Node::as_str), Some("https"));
    assert_eq!(doc.child_keys(), vec!["ports".to_owned()]);
    assert_eq!(
        doc.find("ports").map(Node::child_keys),
        Some(vec!["80".to_owned(), "443".to_owned()])
    );
}

#[rstest]
#[case("")]
#[case("# only a comment\n")]
#[case("---\n")]
#[case("~\n")]
fn empty_documents_become_empty_mappings(#[case] text: &str) {
    let doc = yaml(text);
    assert_eq!(doc.kind(), NodeKind::Mapping);
    assert!(doc.child_keys().is_empty());
}

#[rstest]
fn strict_booleans_keep_yes_as_text() {
    let doc = yaml("a: yes\nb: true\n");
    assert_eq!(doc.find("a").and_then(Node::as_str), Some("yes"));
    assert_eq!(doc.find("b"), Some(&Node::from(true)));
}

#[rstest]
fn malformed_yaml_names_its_source() {
    let err = Node::from_yaml_str("broken.yaml", "a: [1, 2\n").expect_err("must fail");
    match err {
        ConfigError::Parse { source_name, .. } => assert_eq!(source_name, "broken.yaml"),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[rstest]
fn merge_deep_merges_mappings() -> Result<()> {
    let mut base = yaml("a:\n  keep: 1\n  override: 0\n");
    merge(&mut base, yaml("a:\n  override: 2\n"))?;
    ensure!(base == yaml("a:\n  keep: 1\n  override: 2\n"), "merged {base}");
    Ok(())
}

#[rstest]
fn scalar_replaces_mapping() -> Result<()> {
    let mut base = yaml("a:\n  b: 1\n");
    merge(&mut base, yaml("a: 5\n"))?;
    ensure!(base.find("a") == Some(&Node::from(5_i64)), "merged {base}");
    Ok(())
}

#[rstest]
fn sequence_replaces_sequence() -> Result<()> {
    let mut base = yaml("a: [1, 2, 3]\n");
    merge(&mut base, yaml("a: [9]\n"))?;
    ensure!(base.to_string() == "{a: [9]}", "merged {base}");
    Ok(())
}

#[rstest]
#[case("a:\n  b: 1\n", "a: [1]\n", "sequence", "mapping")]
#[case("a: 1\n", "a:\n  b: 1\n", "mapping", "int")]
#[case("a: [1]\n", "a:\n  b: 1\n", "mapping", "sequence")]
fn structural_conflicts_are_errors(
    #[case] first: &str,
    #[case] second: &str,
    #[case] source: &str,
    #[case] destination: &str,
) {
    let mut base = yaml(first);
    let err = merge(&mut base, yaml(second)).expect_err("conflict expected");
    match err {
        ConfigError::MergeConflict {
            path,
            source_kind,
            destination_kind,
        } => {
            assert_eq!(path, "a");
            assert_eq!(source_kind, source);
            assert_eq!(destination_kind, destination);
        }
        other => panic!("expected merge conflict, got {other:?}"),
    }
}

#[rstest]
fn later_keys_override_regardless_of_case() -> Result<()> {
    let mut base = yaml("Port: 1\nServer: {Host: a}\n");
    merge(&mut base, yaml("port: 2\nserver: {host: b, tls: true}\n"))?;
    ensure!(base.child_keys() == ["Port", "Server"], "merged {base}");
    let port = base.find("port").map(ToString::to_string);
    ensure!(port.as_deref() == Some("2"), "later document should win, got {port:?}");
    ensure!(base.to_string() == "{Port: 2, Server: {Host: b, tls: true}}", "merged {base}");
    Ok(())
}

#[rstest]
fn documents_merge_left_to_right() -> Result<()> {
    let merged = merge_documents([
        ("base".to_owned(), yaml("a: 1\nb: 1\n")),
        ("env".to_owned(), yaml("b: 2\nc: 2\n")),
        ("secrets".to_owned(), yaml("c: 3\n")),
    ])?;
    ensure!(merged.to_string() == "{a: 1, b: 2, c: 3}", "merged {merged}");
    Ok(())
}

#[rstest]
fn non_mapping_documents_are_rejected() {
    let err = merge_documents([("list".to_owned(), yaml("- 1\n- 2\n"))])
        .expect_err("sequence root must fail");
    assert!(matches!(
        err,
        ConfigError::NonMappingRoot {
            found: "sequence",
            ..
        }
    ));
}

#[rstest]
fn renders_flow_style() {
    let doc = yaml("foo:\n  bar:\n    baz: hello\n  list: [1, 2.5, null]\n");
    assert_eq!(doc.to_string(), "{foo: {bar: {baz: hello}, list: [1, 2.5, null]}}");
}

#[rstest]
#[case(f64::MAX, "1.7976931348623157e+308")]
#[case(1e21, "1e+21")]
#[case(123_456.0, "123456")]
#[case(0.25, "0.25")]
#[case(1e-5, "1e-5")]
#[case(f64::INFINITY, "+Inf")]
fn formats_floats(#[case] value: f64, #[case] expected: &str) {
    assert_eq!(format_float(value), expected);
}

#[rstest]
fn large_unsigned_values_stay_unsigned() {
    assert_eq!(Scalar::from(u64::MAX), Scalar::UInt(u64::MAX));
    assert_eq!(Scalar::from(7_u64), Scalar::Int(7));
}

#[rstest]
fn serialisable_data_matches_parsed_yaml() -> Result<()> {
    #[derive(serde::Serialize)]
    struct Server {
        host: &'static str,
        ports: Vec<u16>,
        ratio: f64,
        backup: Option<bool>,
    }
    let node = Node::from_serialize(&Server {
        host: "localhost",
        ports: vec![80, 443],
        ratio: 0.5,
        backup: None,
    })?;
    let expected = yaml("host: localhost\nports: [80, 443]\nratio: 0.5\nbackup: null\n");
    ensure!(node == expected, "static data produced {node}");
    Ok(())
}

#[rstest]
fn mapping_insert_replaces_by_rendered_key() {
    let mut mapping: Mapping = [("1", "a")].into_iter().collect();
    mapping.insert(1_i64, "b");
    assert_eq!(mapping.len(), 1);
    assert_eq!(mapping.get("1").and_then(Node::as_str), Some("b"));
}
