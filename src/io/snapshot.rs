use serde_json::Value;

use crate::model::event::TimelineData;

/// Error type for converting documents to and from JSON text
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("could not parse timeline JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("invalid timeline format: {0}")]
    InvalidFormat(String),
    #[error("could not serialize timeline: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Render a document as JSON text. Used for storage and export alike.
pub fn serialize(doc: &TimelineData) -> Result<String, SnapshotError> {
    serde_json::to_string_pretty(doc).map_err(SnapshotError::Serialize)
}

/// Parse JSON text into a document.
///
/// The top level must be an object with an `events` array; anything else is
/// [`SnapshotError::InvalidFormat`].
pub fn deserialize(text: &str) -> Result<TimelineData, SnapshotError> {
    let value: Value = serde_json::from_str(text).map_err(SnapshotError::Parse)?;
    match value.get("events") {
        Some(Value::Array(_)) => {}
        Some(_) => return Err(SnapshotError::InvalidFormat("`events` is not a list".into())),
        None => return Err(SnapshotError::InvalidFormat("missing `events` list".into())),
    }
    serde_json::from_value(value).map_err(|e| SnapshotError::InvalidFormat(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::TimelineEvent;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn sample() -> TimelineData {
        let mut qin = TimelineEvent::with_id("qin", "-000221-01-01", "秦统一六国");
        qin.content = "## 背景\n\n战国七雄".into();
        qin.tags = vec!["朝代".into(), "战争".into()];
        qin.link = Some("https://example.com/qin".into());
        qin.images = vec!["data:image/png;base64,iVBORw0KGgo=".into()];
        qin.children = vec![TimelineEvent::with_id("wall", "-000214-01-01", "修筑长城")];
        TimelineData {
            meta: serde_json::from_str(
                r#"{"appName":"VertiLine","version":"5.1","createdAt":"2024-01-01T00:00:00Z"}"#,
            )
            .unwrap(),
            events: vec![qin, TimelineEvent::with_id("han", "-000202-01-01", "汉朝建立")],
        }
    }

    #[test]
    fn round_trip_nested_document() {
        let doc = sample();
        let text = serialize(&doc).unwrap();
        assert_eq!(deserialize(&text).unwrap(), doc);
    }

    #[test]
    fn serialized_shape_matches_document_format() {
        let value: Value = serde_json::from_str(&serialize(&sample()).unwrap()).unwrap();
        assert_eq!(value["meta"]["appName"], "VertiLine");
        assert_eq!(value["meta"]["createdAt"], "2024-01-01T00:00:00Z");
        assert_eq!(value["events"][0]["children"][0]["id"], "wall");
        // childless events omit `children`
        assert!(value["events"][1].get("children").is_none());
        assert!(value["events"][1].get("link").is_none());
    }

    #[test]
    fn rejects_unparsable_text() {
        assert!(matches!(deserialize("not json {{{"), Err(SnapshotError::Parse(_))));
    }

    #[test]
    fn rejects_missing_events() {
        let err = deserialize(r#"{"meta":{}}"#).unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidFormat(_)));
        assert!(err.to_string().contains("events"));
    }

    #[test]
    fn rejects_non_list_events() {
        assert!(matches!(
            deserialize(r#"{"events":{"id":"x"}}"#),
            Err(SnapshotError::InvalidFormat(_))
        ));
        assert!(matches!(deserialize("[]"), Err(SnapshotError::InvalidFormat(_))));
    }

    #[test]
    fn rejects_malformed_event() {
        assert!(matches!(
            deserialize(r#"{"events":[{"title":"no id"}]}"#),
            Err(SnapshotError::InvalidFormat(_))
        ));
    }

    #[test]
    fn missing_meta_gets_defaults() {
        let doc = deserialize(r#"{"events":[]}"#).unwrap();
        assert!(doc.events.is_empty());
        assert_eq!(doc.meta.app_name(), Some("VertiLine"));
    }

    #[test]
    fn accepts_meta_of_any_shape() {
        let text = r#"{"meta":{"appName":"VertiLine","version":5.1,"createdAt":null},"events":[{"id":"a","date":"2000-01-01","title":"A"}]}"#;
        let doc = deserialize(text).unwrap();
        assert_eq!(doc.events.len(), 1);
        let back: Value = serde_json::from_str(&serialize(&doc).unwrap()).unwrap();
        assert_eq!(back["meta"]["version"], 5.1);
        assert!(back["meta"]["createdAt"].is_null());
    }

    fn arb_event(depth: u32) -> BoxedStrategy<TimelineEvent> {
        let leaf = (
            "[a-z0-9]{4,10}",
            (any::<bool>(), 1i64..3000, 1i64..=12, 1i64..=28),
            "\\PC{0,12}",
            "\\PC{0,30}",
            prop::collection::vec("[a-z]{1,6}", 0..3),
            prop::option::of("https://[a-z]{3,8}\\.com"),
            prop::collection::vec("data:image/png;base64,[A-Za-z0-9+/]{4,12}", 0..2),
        )
            .prop_map(|(id, (bc, y, m, d), title, content, tags, link, images)| TimelineEvent {
                id,
                date: crate::util::date::format_parts(&crate::util::date::DateParts::new(y, m, d, bc)),
                title,
                content,
                images,
                tags,
                link,
                children: Vec::new(),
            });
        if depth == 0 {
            return leaf.boxed();
        }
        (leaf, prop::collection::vec(arb_event(depth - 1), 0..3))
            .prop_map(|(event, children)| event.with_children(children))
            .boxed()
    }

    proptest! {
        #[test]
        fn any_document_round_trips(events in prop::collection::vec(arb_event(2), 0..4)) {
            let doc = TimelineData { meta: sample().meta, events };
            let text = serialize(&doc).unwrap();
            prop_assert_eq!(deserialize(&text).unwrap(), doc);
        }
    }
}
