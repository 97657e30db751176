//! Decoding a record from static data built out of the same record.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::PathBuf;

use anyhow::{Result, ensure};
use rstest::rstest;
use serde::Serialize;
use tiered_config::{Populate, Provider, ROOT, static_provider};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Populate)]
#[serde(rename_all = "lowercase")]
enum Tier {
    #[default]
    Free,
    Pro,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Populate)]
struct Endpoint {
    host: String,
    port: u16,
    secure: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Populate)]
struct Limit(u32);

#[derive(Debug, Default, Clone, PartialEq, Serialize, Populate)]
struct Settings {
    name: String,
    initial: char,
    small: i8,
    wide: i64,
    huge: u64,
    ratio: f64,
    scale: f32,
    tier: Tier,
    limit: Limit,
    primary: Endpoint,
    backup: Option<Endpoint>,
    absent: Option<Endpoint>,
    boxed: Box<Endpoint>,
    mirrors: Vec<Endpoint>,
    queue: VecDeque<String>,
    checksum: [u8; 4],
    weights: HashMap<String, f64>,
    ports: BTreeMap<u16, String>,
    nickname: Option<String>,
    home: PathBuf,
}

fn sample() -> Settings {
    let endpoint = |host: &str, port: u16| Endpoint {
        host: host.to_owned(),
        port,
        secure: port == 443,
    };
    Settings {
        name: "edge".to_owned(),
        initial: 'e',
        small: -8,
        wide: -9_000_000_000,
        huge: u64::MAX,
        ratio: 0.25,
        scale: 1.5,
        tier: Tier::Pro,
        limit: Limit(64),
        primary: endpoint("a.example", 443),
        backup: Some(endpoint("b.example", 8080)),
        absent: None,
        boxed: Box::new(endpoint("c.example", 80)),
        mirrors: vec![endpoint("m1.example", 443), endpoint("m2.example", 80)],
        queue: VecDeque::from(["first".to_owned(), "second".to_owned()]),
        checksum: [1, 2, 3, 255],
        weights: HashMap::from([("east".to_owned(), 0.75), ("west".to_owned(), 0.25)]),
        ports: BTreeMap::from([(80, "http".to_owned()), (443, "https".to_owned())]),
        nickname: Some("e1".to_owned()),
        home: PathBuf::from("/srv/edge"),
    }
}

#[rstest]
fn decode_of_serialised_record_is_identity() -> Result<()> {
    let original = sample();
    let provider = static_provider(&original)?;

    let mut decoded = Settings::default();
    provider.get(ROOT).populate(&mut decoded)?;

    ensure!(decoded == original, "round trip changed the record: {decoded:#?}");
    Ok(())
}

#[rstest]
fn decode_into_existing_record_keeps_unconfigured_fields() -> Result<()> {
    let provider = static_provider(&serde_json::json!({ "name": "patched" }))?;
    let mut settings = sample();

    provider.get(ROOT).populate(&mut settings)?;

    let mut expected = sample();
    expected.name = "patched".to_owned();
    ensure!(settings == expected);
    Ok(())
}
