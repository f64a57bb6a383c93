//! The timeline controller.
//!
//! [`Timeline`] owns the document and the expansion set together. Every entry
//! point computes a new forest with the pure operations in
//! [`crate::ops::tree_ops`] and swaps it in whole, then brings the expansion
//! set in line with the new shape.

use crate::model::event::{TimelineData, TimelineEvent};
use crate::ops::draft::{DraftError, EventDraft};
use crate::ops::expansion::ExpansionSet;
use crate::ops::sort::date_after;
use crate::ops::tree_ops::{self, SaveAction};

/// What a save did to the forest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Updated,
    Moved,
    Inserted,
    /// The selected parent does not exist; nothing changed
    MissingParent(String),
    /// The selected parent is the event itself or one of its descendants;
    /// nothing changed
    WouldCycle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    data: TimelineData,
    expanded: ExpansionSet,
}

impl Timeline {
    /// Wrap a freshly loaded document. Every event with children starts
    /// expanded.
    pub fn new(data: TimelineData) -> Self {
        let expanded = ExpansionSet::initial(&data.events);
        Timeline { data, expanded }
    }

    /// Wrap a document with a previously saved expansion set.
    pub fn with_expansion(data: TimelineData, expanded: ExpansionSet) -> Self {
        Timeline { data, expanded }
    }

    pub fn data(&self) -> &TimelineData {
        &self.data
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.data.events
    }

    pub fn expanded(&self) -> &ExpansionSet {
        &self.expanded
    }

    pub fn find(&self, id: &str) -> Option<&TimelineEvent> {
        tree_ops::find(&self.data.events, id)
    }

    pub fn parent_of(&self, id: &str) -> Option<String> {
        tree_ops::find_parent_id(&self.data.events, id)
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    /// Save an event under `parent` (`None` = root).
    ///
    /// Existing events are updated in place when the parent is unchanged and
    /// moved otherwise; unknown IDs are inserted. The parent is expanded when
    /// the event lands under it.
    pub fn save_event(&mut self, event: TimelineEvent, parent: Option<&str>) -> SaveOutcome {
        let events = &self.data.events;
        if let Some(parent_id) = parent {
            if !tree_ops::contains(events, parent_id) {
                tracing::warn!(id = %event.id, parent = parent_id, "save ignored: parent not found");
                return SaveOutcome::MissingParent(parent_id.to_string());
            }
            if tree_ops::is_within(events, &event.id, parent_id) {
                tracing::warn!(id = %event.id, parent = parent_id, "save ignored: event cannot nest under itself");
                return SaveOutcome::WouldCycle;
            }
        }

        let action = tree_ops::plan_save(events, &event.id, parent);
        tracing::debug!(id = %event.id, parent = ?parent, ?action, "saving event");
        let next = tree_ops::save(events, event, parent);
        self.data.events = next;

        if let Some(parent_id) = parent
            && action != SaveAction::Update
        {
            self.expanded = self.expanded.ensure_expanded(parent_id);
        }
        if action == SaveAction::Move {
            self.expanded = self.expanded.prune(&self.data.events);
        }

        match action {
            SaveAction::Update => SaveOutcome::Updated,
            SaveAction::Move => SaveOutcome::Moved,
            SaveAction::Insert => SaveOutcome::Inserted,
        }
    }

    /// Build the event from a form draft and save it. Returns the outcome and
    /// the saved event's ID.
    pub fn save_draft(
        &mut self,
        draft: &EventDraft,
        parent: Option<&str>,
    ) -> Result<(SaveOutcome, String), DraftError> {
        let event = draft.build()?;
        let id = event.id.clone();
        Ok((self.save_event(event, parent), id))
    }

    /// Delete an event and its subtree. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        if !tree_ops::contains(&self.data.events, id) {
            return false;
        }
        self.data.events = tree_ops::delete_subtree(&self.data.events, id);
        self.expanded = self.expanded.prune(&self.data.events);
        tracing::debug!(id, "deleted subtree");
        true
    }

    /// Remove every event. Metadata is kept.
    pub fn clear(&mut self) {
        self.data.events = Vec::new();
        self.expanded = ExpansionSet::collapse_all();
    }

    /// Replace the whole document, resetting expansion to the load default.
    pub fn import(&mut self, data: TimelineData) {
        self.expanded = ExpansionSet::initial(&data.events);
        self.data = data;
    }

    // -----------------------------------------------------------------------
    // Expansion
    // -----------------------------------------------------------------------

    /// Flip expansion of one event. Returns whether it is now expanded.
    pub fn toggle(&mut self, id: &str) -> bool {
        self.expanded = self.expanded.toggle(id);
        self.expanded.contains(id)
    }

    pub fn expand_all(&mut self) {
        self.expanded = ExpansionSet::expand_all(&self.data.events);
    }

    pub fn collapse_all(&mut self) {
        self.expanded = ExpansionSet::collapse_all();
    }

    // -----------------------------------------------------------------------
    // Placement
    // -----------------------------------------------------------------------

    /// Parent and proposed date for a new event placed right after `sibling_id`
    /// in display order.
    pub fn slot_after(&self, sibling_id: &str) -> Option<(Option<String>, String)> {
        let parent = self.parent_of(sibling_id);
        let siblings = match &parent {
            Some(pid) => &self.find(pid)?.children,
            None => &self.data.events,
        };
        let date = date_after(siblings, sibling_id)?;
        Some((parent, date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::event::TimelineMeta;
    use crate::util::date::DateParts;
    use pretty_assertions::assert_eq;

    fn ev(id: &str, date: &str) -> TimelineEvent {
        TimelineEvent::with_id(id, date, id.to_uppercase())
    }

    fn sample() -> Timeline {
        Timeline::new(TimelineData {
            meta: TimelineMeta::default(),
            events: vec![
                ev("qin", "-000221-01-01").with_children(vec![
                    ev("unify", "-000221-06-01").with_children(vec![ev("coins", "-000220-01-01")]),
                    ev("wall", "-000214-01-01"),
                ]),
                ev("han", "-000202-01-01"),
            ],
        })
    }

    #[test]
    fn new_expands_every_parent() {
        let timeline = sample();
        let expanded: Vec<&str> = timeline.expanded().iter().collect();
        assert_eq!(expanded, vec!["qin", "unify"]);
    }

    #[test]
    fn insert_under_parent_expands_it() {
        let mut timeline = sample();
        let outcome = timeline.save_event(ev("liu", "-000206-01-01"), Some("han"));
        assert_eq!(outcome, SaveOutcome::Inserted);
        assert!(timeline.expanded().contains("han"));
        assert_eq!(timeline.parent_of("liu").as_deref(), Some("han"));
    }

    #[test]
    fn insert_under_missing_parent_reports_and_keeps_forest() {
        let mut timeline = sample();
        let before = timeline.clone();
        let outcome = timeline.save_event(ev("lost", "2000-01-01"), Some("nonexistent-id"));
        assert_eq!(outcome, SaveOutcome::MissingParent("nonexistent-id".into()));
        assert_eq!(timeline, before);
    }

    #[test]
    fn edit_same_parent_updates_in_place() {
        let mut timeline = sample();
        let mut wall = timeline.find("wall").unwrap().clone();
        wall.title = "Great Wall".into();
        let outcome = timeline.save_event(wall, Some("qin"));
        assert_eq!(outcome, SaveOutcome::Updated);
        let qin = timeline.find("qin").unwrap();
        assert_eq!(qin.children[1].title, "Great Wall");
    }

    #[test]
    fn edit_new_parent_moves_with_children() {
        let mut timeline = sample();
        let unify = timeline.find("unify").unwrap().clone();
        let outcome = timeline.save_event(unify, Some("han"));
        assert_eq!(outcome, SaveOutcome::Moved);
        assert_eq!(timeline.parent_of("unify").as_deref(), Some("han"));
        assert_eq!(timeline.parent_of("coins").as_deref(), Some("unify"));
        assert!(timeline.expanded().contains("han"));
        assert!(timeline.expanded().contains("unify"));
    }

    #[test]
    fn move_under_own_descendant_is_refused() {
        let mut timeline = sample();
        let before = timeline.clone();
        let qin = timeline.find("qin").unwrap().clone();
        assert_eq!(timeline.save_event(qin, Some("coins")), SaveOutcome::WouldCycle);
        assert_eq!(timeline, before);
    }

    #[test]
    fn save_draft_validates_title() {
        let mut timeline = sample();
        let draft = EventDraft::new(Some("2000-01-01"));
        assert_eq!(timeline.save_draft(&draft, None), Err(DraftError::EmptyTitle));
    }

    #[test]
    fn save_draft_inserts_root() {
        let mut timeline = sample();
        let mut draft = EventDraft::new(None);
        draft.date = DateParts::new(618, 6, 18, false);
        draft.title = "Tang founded".into();
        let (outcome, id) = timeline.save_draft(&draft, None).unwrap();
        assert_eq!(outcome, SaveOutcome::Inserted);
        assert_eq!(timeline.find(&id).unwrap().date, "0618-06-18");
        assert_eq!(timeline.events().len(), 3);
    }

    #[test]
    fn delete_prunes_expansion() {
        let mut timeline = sample();
        assert!(timeline.delete("coins"));
        assert!(!timeline.expanded().contains("unify"));
        assert!(timeline.expanded().contains("qin"));
        assert!(!timeline.delete("coins"));
    }

    #[test]
    fn toggle_and_bulk_expansion() {
        let mut timeline = sample();
        assert!(!timeline.toggle("qin"));
        assert!(timeline.toggle("qin"));
        timeline.collapse_all();
        assert!(timeline.expanded().is_empty());
        timeline.expand_all();
        assert_eq!(timeline.expanded().len(), 2);
    }

    #[test]
    fn import_resets_expansion() {
        let mut timeline = sample();
        timeline.collapse_all();
        let doc = TimelineData {
            meta: TimelineMeta::default(),
            events: vec![ev("a", "2000-01-01").with_children(vec![ev("b", "2000-02-01")])],
        };
        timeline.import(doc.clone());
        assert_eq!(timeline.data(), &doc);
        assert_eq!(timeline.expanded().iter().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn clear_keeps_meta() {
        let mut timeline = sample();
        let meta = timeline.data().meta.clone();
        timeline.clear();
        assert!(timeline.events().is_empty());
        assert!(timeline.expanded().is_empty());
        assert_eq!(timeline.data().meta, meta);
    }

    #[test]
    fn slot_after_uses_parent_siblings() {
        let timeline = sample();
        let (parent, date) = timeline.slot_after("unify").unwrap();
        assert_eq!(parent.as_deref(), Some("qin"));
        // between -221-06 and -214-01
        assert_eq!(date, "-000218-09-15");
        let (parent, _) = timeline.slot_after("han").unwrap();
        assert_eq!(parent, None);
        assert!(timeline.slot_after("ghost").is_none());
    }
}
