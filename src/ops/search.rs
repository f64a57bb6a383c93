use std::collections::HashSet;

use regex::Regex;

use crate::model::event::TimelineEvent;
use crate::ops::tree_ops::{FlatEntry, find, flatten, subtree_ids};

/// Which field of an event matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Title,
    Tag,
    Content,
}

/// A search hit on one event
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub field: MatchField,
}

/// Events that may become the parent of `editing`.
///
/// The event being edited and its descendants are left out so an event can
/// never end up under itself. `pattern` filters by title; `None` keeps all.
pub fn parent_candidates(
    events: &[TimelineEvent],
    pattern: Option<&Regex>,
    editing: Option<&str>,
) -> Vec<FlatEntry> {
    let excluded: HashSet<String> = editing
        .and_then(|id| find(events, id))
        .map(|event| subtree_ids(event).into_iter().collect())
        .unwrap_or_default();

    flatten(events)
        .into_iter()
        .filter(|entry| !excluded.contains(&entry.id))
        .filter(|entry| pattern.is_none_or(|re| re.is_match(&entry.title)))
        .collect()
}

/// Search titles, tags, and content of every event, in pre-order.
pub fn search_events(events: &[TimelineEvent], re: &Regex) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    search_into(events, re, &mut hits);
    hits
}

fn search_into(events: &[TimelineEvent], re: &Regex, hits: &mut Vec<SearchHit>) {
    for event in events {
        let mut hit = |field| {
            hits.push(SearchHit {
                id: event.id.clone(),
                field,
            })
        };
        if re.is_match(&event.title) {
            hit(MatchField::Title);
        }
        for _ in event.tags.iter().filter(|tag| re.is_match(tag)) {
            hit(MatchField::Tag);
        }
        if re.is_match(&event.content) {
            hit(MatchField::Content);
        }
        search_into(&event.children, re, hits);
    }
}
