use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Application name written into fresh documents
pub const APP_NAME: &str = "VertiLine";
/// Document format version written into fresh documents
pub const DOC_VERSION: &str = "5.1";

/// A single event on the timeline, with its nested sub-events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Opaque unique ID, fixed at creation
    pub id: String,
    /// Signed date string, e.g. `2000-03-15` or `-000221-01-01`
    pub date: String,
    pub title: String,
    /// Markdown body
    #[serde(default)]
    pub content: String,
    /// Encoded pictures in display order
    #[serde(default)]
    pub images: Vec<String>,
    /// Tags in insertion order
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Sub-events, owned by this event. Stored in insertion order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TimelineEvent>,
}

impl TimelineEvent {
    /// Create a childless event with the given ID
    pub fn with_id(id: impl Into<String>, date: impl Into<String>, title: impl Into<String>) -> Self {
        TimelineEvent {
            id: id.into(),
            date: date.into(),
            title: title.into(),
            content: String::new(),
            images: Vec::new(),
            tags: Vec::new(),
            link: None,
            children: Vec::new(),
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Builder-style child attachment, mostly for fixtures
    pub fn with_children(mut self, children: Vec<TimelineEvent>) -> Self {
        self.children = children;
        self
    }

    /// Number of events in this subtree, including this one
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(TimelineEvent::subtree_len).sum::<usize>()
    }
}

/// Document metadata. Carried through as-is: any JSON object is accepted
/// and written back with its keys in their original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimelineMeta(Map<String, Value>);

impl TimelineMeta {
    /// Metadata for a document created now
    pub fn fresh(app_name: &str, version: &str) -> Self {
        let mut map = Map::new();
        map.insert("appName".into(), Value::from(app_name));
        map.insert("version".into(), Value::from(version));
        map.insert("createdAt".into(), Value::from(Utc::now().to_rfc3339()));
        TimelineMeta(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// `appName` when it is a string
    pub fn app_name(&self) -> Option<&str> {
        self.get("appName").and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for TimelineMeta {
    fn from(map: Map<String, Value>) -> Self {
        TimelineMeta(map)
    }
}

impl Default for TimelineMeta {
    fn default() -> Self {
        TimelineMeta::fresh(APP_NAME, DOC_VERSION)
    }
}

/// The persisted document: metadata plus the event forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TimelineData {
    #[serde(default)]
    pub meta: TimelineMeta,
    pub events: Vec<TimelineEvent>,
}

impl TimelineData {
    /// An empty document with the given metadata
    pub fn empty(meta: TimelineMeta) -> Self {
        TimelineData {
            meta,
            events: Vec::new(),
        }
    }

    /// Total number of events at every depth
    pub fn event_count(&self) -> usize {
        self.events.iter().map(TimelineEvent::subtree_len).sum()
    }
}
