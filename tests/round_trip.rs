use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use vertiline::io::snapshot::{deserialize, serialize};
use vertiline::model::event::TimelineData;
use vertiline::ops::expansion::ExpansionSet;
use vertiline::ops::tree_ops;

fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Could not read fixture {}: {}", name, e))
}

fn parse_fixture(name: &str) -> TimelineData {
    deserialize(&load_fixture(name)).unwrap_or_else(|e| panic!("Could not parse fixture {}: {}", name, e))
}

#[test]
fn timeline_round_trips_byte_for_byte() {
    let source = load_fixture("timeline.json");
    let doc = deserialize(&source).unwrap();
    let output = serialize(&doc).unwrap();
    assert_eq!(output.trim_end(), source.trim_end());
}

#[test]
fn unknown_meta_keys_survive() {
    let doc = parse_fixture("timeline.json");
    assert_eq!(doc.meta.app_name(), Some("VertiLine"));
    assert_eq!(
        doc.meta.get("exportDate").and_then(|v| v.as_str()),
        Some("2024-03-02T10:30:00.000Z")
    );
}

#[test]
fn fixture_shape() {
    let doc = parse_fixture("timeline.json");
    assert_eq!(doc.event_count(), 5);

    let flat = tree_ops::flatten(&doc.events);
    let depths: Vec<usize> = flat.iter().map(|e| e.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 1, 0]);

    let coins = tree_ops::find(&doc.events, "lr3k9x1c2h6i7j").unwrap();
    assert_eq!(coins.images.len(), 1);
    assert_eq!(
        tree_ops::find_parent_id(&doc.events, "lr3k9x1c2h6i7j").as_deref(),
        Some("lr3k9x1b1e4f5g")
    );
}

#[test]
fn edits_survive_a_round_trip() {
    let doc = parse_fixture("timeline.json");
    let mut wall = tree_ops::find(&doc.events, "lr3k9x1d3k8l9m").unwrap().clone();
    wall.title = "长城".into();
    let events = tree_ops::save(&doc.events, wall, Some("lr3k9x1e4n0o1p"));
    let moved = TimelineData {
        meta: doc.meta.clone(),
        events,
    };

    let reloaded = deserialize(&serialize(&moved).unwrap()).unwrap();
    assert_eq!(reloaded, moved);
    assert_eq!(
        tree_ops::find_parent_id(&reloaded.events, "lr3k9x1d3k8l9m").as_deref(),
        Some("lr3k9x1e4n0o1p")
    );
    assert_eq!(ExpansionSet::initial(&reloaded.events).len(), 3);
}
