use serde::Serialize;

use crate::model::event::TimelineEvent;
use crate::ops::expansion::ExpansionSet;
use crate::ops::search::{MatchField, SearchHit};
use crate::ops::sort::sorted_siblings;
use crate::ops::tree_ops::FlatEntry;
use crate::util::date::display_date;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct EventJson {
    pub id: String,
    pub date: String,
    pub display_date: String,
    pub title: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    pub images: usize,
    pub expanded: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EventJson>,
}

#[derive(Serialize)]
pub struct EventDetailJson {
    #[serde(flatten)]
    pub event: EventJson,
    pub parent: Option<String>,
}

#[derive(Serialize)]
pub struct FlatEntryJson {
    pub id: String,
    pub title: String,
    pub depth: usize,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub id: String,
    pub title: String,
    pub field: &'static str,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Convert an event and its sorted subtree
pub fn event_to_json(event: &TimelineEvent, expanded: &ExpansionSet) -> EventJson {
    EventJson {
        id: event.id.clone(),
        date: event.date.clone(),
        display_date: display_date(&event.date),
        title: event.title.clone(),
        tags: event.tags.clone(),
        link: event.link.clone(),
        content: event.content.clone(),
        images: event.images.len(),
        expanded: expanded.contains(&event.id),
        children: tree_to_json(&event.children, expanded),
    }
}

pub fn tree_to_json(events: &[TimelineEvent], expanded: &ExpansionSet) -> Vec<EventJson> {
    sorted_siblings(events)
        .into_iter()
        .map(|e| event_to_json(e, expanded))
        .collect()
}

pub fn flat_entry_to_json(entry: &FlatEntry) -> FlatEntryJson {
    FlatEntryJson {
        id: entry.id.clone(),
        title: entry.title.clone(),
        depth: entry.depth,
    }
}

pub fn match_field_name(field: MatchField) -> &'static str {
    match field {
        MatchField::Title => "title",
        MatchField::Tag => "tag",
        MatchField::Content => "content",
    }
}

pub fn search_hit_to_json(hit: &SearchHit, title: &str) -> SearchHitJson {
    SearchHitJson {
        id: hit.id.clone(),
        title: title.to_string(),
        field: match_field_name(hit.field),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Render the forest as an indented outline in display order.
///
/// `▾` marks an expanded event, `▸` a collapsed one (with its hidden child
/// count), `•` an event without children. With `show_all` the expansion set
/// is ignored.
pub fn render_tree(events: &[TimelineEvent], expanded: &ExpansionSet, show_all: bool) -> String {
    let mut lines = Vec::new();
    render_level(events, expanded, show_all, 0, &mut lines);
    lines.join("\n")
}

fn render_level(
    events: &[TimelineEvent],
    expanded: &ExpansionSet,
    show_all: bool,
    depth: usize,
    lines: &mut Vec<String>,
) {
    for event in sorted_siblings(events) {
        let open = show_all || expanded.contains(&event.id);
        let marker = match (event.has_children(), open) {
            (false, _) => "•",
            (true, true) => "▾",
            (true, false) => "▸",
        };
        let mut line = format!(
            "{}{} {}  {}",
            "  ".repeat(depth),
            marker,
            display_date(&event.date),
            event.title
        );
        for tag in &event.tags {
            line.push_str(&format!(" #{}", tag));
        }
        line.push_str(&format!("  [{}]", event.id));
        if event.has_children() && !open {
            line.push_str(&format!(" (+{})", event.children.len()));
        }
        lines.push(line);

        if event.has_children() && open {
            render_level(&event.children, expanded, show_all, depth + 1, lines);
        }
    }
}

/// Full text view of one event
pub fn format_event_detail(event: &TimelineEvent, parent: Option<&str>) -> String {
    let mut out = format!("{}  [{}]\n", event.title, event.id);
    out.push_str(&format!("date:     {} ({})\n", display_date(&event.date), event.date));
    out.push_str(&format!("parent:   {}\n", parent.unwrap_or("-")));
    if !event.tags.is_empty() {
        out.push_str(&format!("tags:     {}\n", event.tags.join(", ")));
    }
    if let Some(link) = &event.link {
        out.push_str(&format!("link:     {}\n", link));
    }
    if !event.images.is_empty() {
        out.push_str(&format!("images:   {}\n", event.images.len()));
    }
    if event.has_children() {
        out.push_str(&format!("children: {}\n", event.children.len()));
    }
    if !event.content.is_empty() {
        out.push('\n');
        out.push_str(&event.content);
        if !event.content.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

/// One line per parent candidate, indented by depth
pub fn format_flat_entry(entry: &FlatEntry) -> String {
    format!("{}{}  [{}]", "  ".repeat(entry.depth), entry.title, entry.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn ev(id: &str, date: &str, title: &str) -> TimelineEvent {
        TimelineEvent::with_id(id, date, title)
    }

    fn sample() -> Vec<TimelineEvent> {
        let mut qin = ev("qin", "-000221-01-01", "秦统一六国");
        qin.tags = vec!["朝代".into()];
        qin.children = vec![
            ev("wall", "-000214-01-01", "修筑长城"),
            ev("unify", "-000221-06-01", "统一度量衡")
                .with_children(vec![ev("coins", "-000220-01-01", "统一货币")]),
        ];
        vec![ev("tang", "0618-06-18", "唐朝建立"), qin]
    }

    #[test]
    fn tree_fully_expanded() {
        let events = sample();
        let expanded = ExpansionSet::expand_all(&events);
        assert_snapshot!(render_tree(&events, &expanded, false), @r"
        ▾ 前221年  秦统一六国 #朝代  [qin]
          ▾ 前221年6月1日  统一度量衡  [unify]
            • 前220年  统一货币  [coins]
          • 前214年  修筑长城  [wall]
        • 618年6月18日  唐朝建立  [tang]
        ");
    }

    #[test]
    fn tree_collapsed_shows_child_counts() {
        let events = sample();
        assert_snapshot!(render_tree(&events, &ExpansionSet::new(), false), @r"
        ▸ 前221年  秦统一六国 #朝代  [qin] (+2)
        • 618年6月18日  唐朝建立  [tang]
        ");
    }

    #[test]
    fn show_all_ignores_expansion() {
        let events = sample();
        let out = render_tree(&events, &ExpansionSet::new(), true);
        assert!(out.contains("统一货币"));
    }

    #[test]
    fn json_tree_is_sorted_and_flags_expansion() {
        let events = sample();
        let expanded = ExpansionSet::new().ensure_expanded("qin");
        let json = serde_json::to_value(tree_to_json(&events, &expanded)).unwrap();
        assert_eq!(json[0]["id"], "qin");
        assert_eq!(json[0]["expanded"], true);
        assert_eq!(json[0]["display_date"], "前221年");
        assert_eq!(json[0]["children"][0]["id"], "unify");
        assert_eq!(json[1]["id"], "tang");
        assert!(json[1].get("children").is_none());
    }

    #[test]
    fn detail_lists_present_fields() {
        let mut event = ev("qin", "-000221-01-01", "秦统一六国");
        event.link = Some("https://example.com".into());
        event.content = "战国结束".into();
        let out = format_event_detail(&event, None);
        assert!(out.starts_with("秦统一六国  [qin]\n"));
        assert!(out.contains("date:     前221年 (-000221-01-01)\n"));
        assert!(out.contains("parent:   -\n"));
        assert!(out.contains("link:     https://example.com\n"));
        assert!(!out.contains("tags:"));
        assert!(out.ends_with("\n战国结束\n"));
    }
}
