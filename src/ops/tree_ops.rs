//! Pure operations over the event forest.
//!
//! Every mutating operation takes the current forest by reference and
//! returns a new one. Inputs are never modified; callers replace their held
//! forest with the result.

use crate::model::event::TimelineEvent;

/// One row of a pre-order walk over the forest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry {
    pub id: String,
    pub title: String,
    /// Nesting depth (0 = root)
    pub depth: usize,
}

/// Which branch a save takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAction {
    /// Same parent: replace fields, keep position and children
    Update,
    /// Existing event under a different parent
    Move,
    /// New event
    Insert,
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Depth-first search for an event by ID.
pub fn find<'a>(events: &'a [TimelineEvent], id: &str) -> Option<&'a TimelineEvent> {
    for event in events {
        if event.id == id {
            return Some(event);
        }
        if let Some(found) = find(&event.children, id) {
            return Some(found);
        }
    }
    None
}

pub fn contains(events: &[TimelineEvent], id: &str) -> bool {
    find(events, id).is_some()
}

/// ID of the direct parent of `id`. `None` for roots and for unknown IDs.
pub fn find_parent_id(events: &[TimelineEvent], id: &str) -> Option<String> {
    for event in events {
        if event.children.iter().any(|c| c.id == id) {
            return Some(event.id.clone());
        }
        if let Some(parent) = find_parent_id(&event.children, id) {
            return Some(parent);
        }
    }
    None
}

/// Pre-order listing of every event at every depth.
pub fn flatten(events: &[TimelineEvent]) -> Vec<FlatEntry> {
    let mut out = Vec::new();
    flatten_into(events, 0, &mut out);
    out
}

fn flatten_into(events: &[TimelineEvent], depth: usize, out: &mut Vec<FlatEntry>) {
    for event in events {
        out.push(FlatEntry {
            id: event.id.clone(),
            title: event.title.clone(),
            depth,
        });
        flatten_into(&event.children, depth + 1, out);
    }
}

/// IDs of `event` and all of its descendants, pre-order.
pub fn subtree_ids(event: &TimelineEvent) -> Vec<String> {
    let mut ids = vec![event.id.clone()];
    ids.extend(flatten(&event.children).into_iter().map(|e| e.id));
    ids
}

/// True if `id` is `ancestor_id` itself or one of its descendants.
pub fn is_within(events: &[TimelineEvent], ancestor_id: &str, id: &str) -> bool {
    find(events, ancestor_id).is_some_and(|ancestor| find(std::slice::from_ref(ancestor), id).is_some())
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Attach `event` under `parent_id`, or as a new root when `parent_id` is
/// `None`. An unknown parent leaves the forest unchanged.
pub fn insert(
    events: &[TimelineEvent],
    event: TimelineEvent,
    parent_id: Option<&str>,
) -> Vec<TimelineEvent> {
    let Some(parent_id) = parent_id else {
        tracing::debug!(id = %event.id, "insert root event");
        let mut next = events.to_vec();
        next.push(event);
        return next;
    };

    if !contains(events, parent_id) {
        tracing::warn!(id = %event.id, parent = parent_id, "insert skipped: parent not found");
        return events.to_vec();
    }

    tracing::debug!(id = %event.id, parent = parent_id, "insert child event");
    let mut pending = Some(event);
    insert_under(events, parent_id, &mut pending)
}

fn insert_under(
    events: &[TimelineEvent],
    parent_id: &str,
    pending: &mut Option<TimelineEvent>,
) -> Vec<TimelineEvent> {
    events
        .iter()
        .map(|event| {
            if pending.is_none() {
                return event.clone();
            }
            let mut children = insert_under(&event.children, parent_id, pending);
            if event.id == parent_id
                && let Some(child) = pending.take()
            {
                children.push(child);
            }
            TimelineEvent {
                children,
                ..clone_fields(event)
            }
        })
        .collect()
}

/// Remove the event with `id` together with its whole subtree. Unknown IDs
/// leave the forest unchanged.
pub fn delete_subtree(events: &[TimelineEvent], id: &str) -> Vec<TimelineEvent> {
    events
        .iter()
        .filter(|event| event.id != id)
        .map(|event| TimelineEvent {
            children: delete_subtree(&event.children, id),
            ..clone_fields(event)
        })
        .collect()
}

/// Replace every field of the stored event with `event.id` except its
/// children, keeping its position among its siblings.
pub fn update_in_place(events: &[TimelineEvent], event: &TimelineEvent) -> Vec<TimelineEvent> {
    events
        .iter()
        .map(|existing| {
            if existing.id == event.id {
                TimelineEvent {
                    children: existing.children.clone(),
                    ..clone_fields(event)
                }
            } else {
                TimelineEvent {
                    children: update_in_place(&existing.children, event),
                    ..clone_fields(existing)
                }
            }
        })
        .collect()
}

/// Re-parent `event` under `new_parent_id`, carrying its stored children.
///
/// The stored subtree is removed and `event` is attached at the new location
/// with those children. A missing parent, or a parent inside the moved
/// subtree, leaves the forest unchanged.
pub fn move_event(
    events: &[TimelineEvent],
    event: &TimelineEvent,
    new_parent_id: Option<&str>,
) -> Vec<TimelineEvent> {
    if let Some(parent_id) = new_parent_id {
        if !contains(events, parent_id) {
            tracing::warn!(id = %event.id, parent = parent_id, "move skipped: parent not found");
            return events.to_vec();
        }
        if is_within(events, &event.id, parent_id) {
            tracing::warn!(id = %event.id, parent = parent_id, "move skipped: parent is inside moved subtree");
            return events.to_vec();
        }
    }

    let children = find(events, &event.id)
        .map(|existing| existing.children.clone())
        .unwrap_or_default();
    tracing::debug!(id = %event.id, parent = ?new_parent_id, "move event");

    let pruned = delete_subtree(events, &event.id);
    let moved = TimelineEvent {
        children,
        ..clone_fields(event)
    };
    insert(&pruned, moved, new_parent_id)
}

// ---------------------------------------------------------------------------
// Save decision
// ---------------------------------------------------------------------------

/// Decide how a saved event lands in the forest.
pub fn plan_save(events: &[TimelineEvent], id: &str, selected_parent: Option<&str>) -> SaveAction {
    if !contains(events, id) {
        return SaveAction::Insert;
    }
    if find_parent_id(events, id).as_deref() == selected_parent {
        SaveAction::Update
    } else {
        SaveAction::Move
    }
}

/// Apply a saved event: update in place when the parent is unchanged, move
/// when it changed, insert when the event is new.
pub fn save(
    events: &[TimelineEvent],
    event: TimelineEvent,
    selected_parent: Option<&str>,
) -> Vec<TimelineEvent> {
    match plan_save(events, &event.id, selected_parent) {
        SaveAction::Update => update_in_place(events, &event),
        SaveAction::Move => move_event(events, &event, selected_parent),
        SaveAction::Insert => insert(events, event, selected_parent),
    }
}

/// Copy of an event without its children
fn clone_fields(event: &TimelineEvent) -> TimelineEvent {
    TimelineEvent {
        id: event.id.clone(),
        date: event.date.clone(),
        title: event.title.clone(),
        content: event.content.clone(),
        images: event.images.clone(),
        tags: event.tags.clone(),
        link: event.link.clone(),
        children: Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
