use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::event::TimelineEvent;

/// IDs of events whose children are shown.
///
/// IDs that no longer name an event with children are tolerated; they simply
/// never match. [`ExpansionSet::prune`] drops them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionSet(BTreeSet<String>);

impl ExpansionSet {
    pub fn new() -> Self {
        ExpansionSet::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Flip one ID in or out.
    pub fn toggle(&self, id: &str) -> Self {
        let mut next = self.0.clone();
        if !next.remove(id) {
            next.insert(id.to_string());
        }
        ExpansionSet(next)
    }

    /// Add `id` regardless of its current state.
    pub fn ensure_expanded(&self, id: &str) -> Self {
        let mut next = self.0.clone();
        next.insert(id.to_string());
        ExpansionSet(next)
    }

    /// Every event, at any depth, that has at least one child.
    pub fn expand_all(events: &[TimelineEvent]) -> Self {
        let mut ids = BTreeSet::new();
        collect_expandable(events, &mut ids);
        ExpansionSet(ids)
    }

    pub fn collapse_all() -> Self {
        ExpansionSet::default()
    }

    /// Expansion applied when a document is first loaded or imported.
    pub fn initial(events: &[TimelineEvent]) -> Self {
        ExpansionSet::expand_all(events)
    }

    /// Keep only IDs that still name an event with children.
    pub fn prune(&self, events: &[TimelineEvent]) -> Self {
        let expandable = ExpansionSet::expand_all(events);
        ExpansionSet(self.0.intersection(&expandable.0).cloned().collect())
    }
}

impl FromIterator<String> for ExpansionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        ExpansionSet(iter.into_iter().collect())
    }
}

fn collect_expandable(events: &[TimelineEvent], ids: &mut BTreeSet<String>) {
    for event in events {
        if event.has_children() {
            ids.insert(event.id.clone());
            collect_expandable(&event.children, ids);
        }
    }
}
